//! SOAP endpoint.
//!
//! # Responsibilities
//! - Parse the request envelope
//! - Dispatch on the qualified name of the payload root element
//! - Answer with a response envelope or a SOAP fault
//!
//! # Status Codes
//! ```text
//! 200  response envelope
//! 400  body is not a SOAP envelope (plain text)
//! 404  no operation for the payload root element
//! 500  SOAP fault (Client: invalid request, Server: encoding failure)
//! ```

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::soap::payload::read_payload;
use crate::soap::{
    encode, GetCountryRequest, GetCountryResponse, SoapEnvelope, SoapFault, SoapPayload,
    XmlElement, COUNTRY_NS, SOAP_CONTENT_TYPE,
};

const UNMAPPED: &str = "unmapped";

pub async fn soap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let envelope = match SoapEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected malformed SOAP request");
            metrics::record_request(UNMAPPED, 400, start);
            return (StatusCode::BAD_REQUEST, format!("Invalid SOAP request: {e}")).into_response();
        }
    };
    let payload = match envelope.payload() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected SOAP request without payload");
            metrics::record_request(UNMAPPED, 400, start);
            return (StatusCode::BAD_REQUEST, format!("Invalid SOAP request: {e}")).into_response();
        }
    };

    if payload.is(COUNTRY_NS, GetCountryRequest::ELEMENT) {
        let response = match get_country(&state, payload) {
            Ok(response) => encode(&response).map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Failed to encode response");
                SoapFault::server(e.to_string())
            }),
            Err(fault) => Err(fault),
        };
        let reply = match response {
            Ok(xml) => soap_response(StatusCode::OK, xml),
            Err(fault) => fault_response(&fault),
        };
        metrics::record_request(GetCountryRequest::ELEMENT, reply.status().as_u16(), start);
        return reply;
    }

    let qualified = format!(
        "{{{}}}{}",
        payload.namespace.as_deref().unwrap_or_default(),
        payload.local_name
    );
    tracing::warn!(request_id = %request_id, payload = %qualified, "No endpoint mapping found");
    metrics::record_request(UNMAPPED, 404, start);
    (
        StatusCode::NOT_FOUND,
        format!("No endpoint mapping found for {qualified}"),
    )
        .into_response()
}

fn get_country(state: &AppState, payload: &XmlElement) -> Result<GetCountryResponse, SoapFault> {
    let request: GetCountryRequest =
        read_payload(payload).map_err(|e| SoapFault::client(e.to_string()))?;

    tracing::info!(name = %request.name, "Received country name");
    if request.name.is_empty() {
        return Err(SoapFault::client("name must not be empty"));
    }

    let country = state.repository.find_country(&request.name).cloned();
    metrics::record_lookup(country.is_some());
    Ok(GetCountryResponse { country })
}

fn soap_response(status: StatusCode, xml: String) -> Response {
    (status, [(CONTENT_TYPE, SOAP_CONTENT_TYPE)], xml).into_response()
}

fn fault_response(fault: &SoapFault) -> Response {
    match fault.to_envelope() {
        Ok(xml) => soap_response(StatusCode::INTERNAL_SERVER_ERROR, xml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode SOAP fault");
            (StatusCode::INTERNAL_SERVER_ERROR, fault.to_string()).into_response()
        }
    }
}
