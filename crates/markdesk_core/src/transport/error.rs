//! Transport error value.
//!
//! # Invariants
//! - `message` is always user-presentable (never empty).
//! - `fields` is preserved as sent by the API, even when not rendered.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransportResult<T> = Result<T, TransportError>;

/// Error reported by the document API or by the transport itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    /// Single human-readable message shown to the user.
    pub message: String,
    /// Per-attribute detail, keyed by attribute name.
    pub fields: BTreeMap<String, Value>,
}

/// Wire shape of `{"error": {"message": ..., "fields": {...}}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) fields: BTreeMap<String, Value>,
}

impl From<ErrorPayload> for TransportError {
    fn from(value: ErrorPayload) -> Self {
        Self {
            message: value.message,
            fields: value.fields,
        }
    }
}

impl TransportError {
    /// Creates an error without per-field detail.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds one field detail entry.
    pub fn with_field(mut self, field: impl Into<String>, detail: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), detail.into());
        self
    }

    /// Builds an error from a raw failed response body.
    ///
    /// Structured `{"error": {...}}` bodies keep message and fields; anything
    /// else becomes the message verbatim.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.into(),
            Err(_) if body.trim().is_empty() => Self::new("empty response from document API"),
            Err(_) => Self::new(body),
        }
    }

    /// Returns the detail recorded for one attribute.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for TransportError {}
