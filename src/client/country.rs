//! Typed client for the country lookup service.

use axum::http::Uri;

use crate::client::{ClientError, SoapClient};
use crate::config::ClientConfig;
use crate::country::Country;
use crate::soap::{GetCountryRequest, GetCountryResponse};
use crate::transport::{default_sender, DefaultSender, MessageSender};

/// SOAP action of `getCountry`. The service dispatches on the payload, so it is empty.
const GET_COUNTRY_ACTION: &str = "";

#[derive(Debug, Clone)]
pub struct CountryClient<S = DefaultSender> {
    soap: SoapClient<S>,
    endpoint: Uri,
}

impl CountryClient<DefaultSender> {
    /// Client with the default transport stack, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = config
            .endpoint
            .parse::<Uri>()
            .map_err(|_| ClientError::InvalidUri(config.endpoint.clone()))?;
        Ok(Self::new(default_sender(config), endpoint))
    }
}

impl<S: MessageSender> CountryClient<S> {
    pub fn new(sender: S, endpoint: Uri) -> Self {
        Self {
            soap: SoapClient::new(sender),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Look up a country by exact name. `Ok(None)` when the service knows no such country.
    pub async fn get_country(&self, name: &str) -> Result<Option<Country>, ClientError> {
        tracing::info!(name = %name, endpoint = %self.endpoint, "Requesting country");

        let response: GetCountryResponse = self
            .soap
            .send_and_receive(&self.endpoint, GET_COUNTRY_ACTION, &GetCountryRequest::new(name))
            .await?;

        Ok(response.country)
    }
}
