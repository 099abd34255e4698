//! JSON body helpers for HTTP transport adapters.

use crate::model::document::{Document, DocumentAttrs, DocumentRecord};
use crate::transport::error::{ErrorEnvelope, TransportError, TransportResult};
use serde_json::Value;

/// Decodes a GET/CREATE/UPDATE response body.
pub fn decode_record(body: &str) -> TransportResult<DocumentRecord> {
    Document::parse_transport_response(body)
}

/// Decodes a LIST response body.
///
/// Accepts a bare array or an `{"error": ...}` envelope.
pub fn decode_list(body: &str) -> TransportResult<Vec<DocumentRecord>> {
    let value: Value = serde_json::from_str(body).map_err(|_| TransportError::from_body(body))?;

    if value.get("error").is_some() {
        return Err(serde_json::from_value::<ErrorEnvelope>(value)
            .map(|envelope| envelope.error.into())
            .unwrap_or_else(|_| TransportError::new(body)));
    }

    serde_json::from_value(value)
        .map_err(|err| TransportError::new(format!("malformed document list: {err}")))
}

/// Decodes a DELETE response body; empty bodies mean success.
pub fn decode_empty(body: &str) -> TransportResult<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Err(envelope.error.into()),
        Err(_) => Ok(()),
    }
}

/// Encodes a CREATE/UPDATE request body.
pub fn encode_attrs(attrs: &DocumentAttrs) -> String {
    // Three string fields; serialization cannot fail.
    serde_json::to_string(attrs).unwrap_or_default()
}
