//! Request/response exchange over a [`MessageSender`].
//!
//! One call drives one connection through its operations in order:
//!
//! ```text
//! add_request_header → send → has_error → [has_fault | error_message] → receive → close
//! ```
//!
//! `close` runs whatever the outcome of the earlier steps.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::Uri;

use crate::client::ClientError;
use crate::soap::{self, SoapEnvelope, SoapPayload, SOAP_CONTENT_TYPE};
use crate::transport::{MessageSender, WebServiceConnection};

const SOAP_ACTION: &str = "SOAPAction";

#[derive(Debug, Clone)]
pub struct SoapClient<S> {
    sender: S,
}

impl<S: MessageSender> SoapClient<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Send `request` to `uri` and decode the response payload.
    ///
    /// `soap_action` is sent quoted in the `SOAPAction` header; an empty
    /// action is sent as `""`.
    pub async fn send_and_receive<Req, Res>(
        &self,
        uri: &Uri,
        soap_action: &str,
        request: &Req,
    ) -> Result<Res, ClientError>
    where
        Req: SoapPayload,
        Res: SoapPayload,
    {
        let body = soap::encode(request)?;
        let mut connection = self.sender.create_connection(uri)?;

        let result = exchange(&mut connection, soap_action, Bytes::from(body)).await;

        if let Err(e) = connection.close().await {
            tracing::debug!(uri = %uri, error = %e, "Failed to close connection");
        }

        let response = result?;
        Ok(soap::decode(&response)?)
    }
}

async fn exchange<C: WebServiceConnection>(
    connection: &mut C,
    soap_action: &str,
    body: Bytes,
) -> Result<Bytes, ClientError> {
    connection.add_request_header(CONTENT_TYPE.as_str(), SOAP_CONTENT_TYPE)?;
    connection.add_request_header(SOAP_ACTION, &format!("\"{soap_action}\""))?;
    connection.send(body).await?;

    if connection.has_error().await? {
        if connection.has_fault().await? {
            let body = connection.receive().await?.ok_or(ClientError::EmptyResponse)?;
            let envelope = SoapEnvelope::parse(&body)?;
            if let Some(fault) = envelope.fault() {
                return Err(ClientError::Fault(fault));
            }
        }
        return Err(ClientError::Status(connection.error_message().await?));
    }

    connection
        .receive()
        .await?
        .ok_or(ClientError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::{FaultCode, GetCountryRequest, GetCountryResponse, SoapFault};
    use crate::transport::testing::{ScriptedConnection, ScriptedFailure, ScriptedSender};
    use crate::transport::{Operation, TimeoutClassifyingSender, TransportError};
    use axum::http::StatusCode;

    const EMPTY_RESPONSE: &[u8] = br#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Body><ns2:getCountryResponse xmlns:ns2="http://example.com/springwsserverdemo/services/country"/></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;

    const FAULT_RESPONSE: &[u8] = br#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Body><SOAP-ENV:Fault><faultcode>SOAP-ENV:Client</faultcode><faultstring>name must not be empty</faultstring></SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;

    fn uri() -> Uri {
        Uri::from_static("http://scripted.test/services")
    }

    async fn call(
        template: ScriptedConnection,
    ) -> Result<GetCountryResponse, ClientError> {
        let client = SoapClient::new(ScriptedSender::new(template));
        client
            .send_and_receive(&uri(), "", &GetCountryRequest::new("Spain"))
            .await
    }

    #[tokio::test]
    async fn sends_request_envelope() {
        let template = ScriptedConnection::ok(EMPTY_RESPONSE);
        let sent = template.sent();

        let response = call(template).await.unwrap();
        assert_eq!(response.country, None);

        let body = sent.lock().unwrap().clone().unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("getCountryRequest"));
        assert!(text.contains(">Spain<"));
    }

    #[tokio::test]
    async fn drives_operations_in_order_and_closes() {
        let template = ScriptedConnection::ok(EMPTY_RESPONSE);
        let calls = template.calls();
        call(template).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                Operation::AddRequestHeader,
                Operation::AddRequestHeader,
                Operation::Send,
                Operation::HasError,
                Operation::Receive,
                Operation::Close,
            ]
        );
    }

    #[tokio::test]
    async fn fault_response_becomes_fault_error() {
        let template = ScriptedConnection::with_response(StatusCode::INTERNAL_SERVER_ERROR, FAULT_RESPONSE);
        let err = call(template).await.unwrap_err();
        match err {
            ClientError::Fault(SoapFault { code, message }) => {
                assert_eq!(code, FaultCode::Client);
                assert_eq!(message, "name must not be empty");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_without_fault_is_status_error() {
        let template = ScriptedConnection::with_response(StatusCode::NOT_FOUND, b"");
        let calls = template.calls();
        let err = call(template).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(ref s) if s == "404 Not Found"));
        assert_eq!(calls.lock().unwrap().last(), Some(&Operation::Close));
    }

    #[tokio::test]
    async fn empty_body_is_empty_response() {
        let err = call(ScriptedConnection::ok(b"")).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyResponse));
    }

    #[tokio::test]
    async fn close_runs_after_transport_failure() {
        let template = ScriptedConnection::ok(EMPTY_RESPONSE)
            .failing_on(Operation::Receive, ScriptedFailure::Timeout);
        let calls = template.calls();
        let client = SoapClient::new(TimeoutClassifyingSender::new(ScriptedSender::new(template)));

        let err = client
            .send_and_receive::<_, GetCountryResponse>(&uri(), "", &GetCountryRequest::new("Spain"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(TransportError::ReadTimeout(_))));
        assert_eq!(err.timeout_phase(), Some(crate::transport::TimeoutPhase::Read));
        assert_eq!(calls.lock().unwrap().last(), Some(&Operation::Close));
    }
}
