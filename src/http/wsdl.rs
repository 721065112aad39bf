//! WSDL publication.
//!
//! The document is static. Only the service address is filled in per
//! request, from the `Host` header when present.

use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use crate::soap::SOAP_CONTENT_TYPE;

const WSDL_TEMPLATE: &str = include_str!("../../resources/countries.wsdl");
const LOCATION_PLACEHOLDER: &str = "{{location}}";

/// Path the SOAP endpoint is served on.
pub const SERVICE_PATH: &str = "/services";

/// Render the WSDL with its service address.
pub fn render(host: Option<&str>) -> String {
    let location = match host {
        Some(host) => format!("http://{host}{SERVICE_PATH}"),
        None => SERVICE_PATH.to_string(),
    };
    WSDL_TEMPLATE.replace(LOCATION_PLACEHOLDER, &location)
}

pub async fn wsdl_handler(headers: HeaderMap) -> impl IntoResponse {
    let host = headers.get(HOST).and_then(|v| v.to_str().ok());
    ([(CONTENT_TYPE, SOAP_CONTENT_TYPE)], render(host))
}
