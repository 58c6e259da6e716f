//! Error types for the KYC API client.
//!
//! # Design
//! Only HTTP 400 is reinterpreted: the service uses it to report invalid
//! request fields, and its decoded body is handed to the caller verbatim as
//! `InvalidFields`. Every other transport failure is returned untouched in
//! `Transport` so callers see the same status and body the transport saw.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `KycApiClient`.
#[derive(Debug, Error)]
pub enum KycError {
    /// A start-session request was issued without session data. No request
    /// was sent.
    #[error("start session request must have session data")]
    MissingSessionData,

    /// The service rejected the request with HTTP 400. Holds the decoded
    /// error body, or `Value::Null` if the body was not JSON.
    #[error("service rejected request fields: {0}")]
    InvalidFields(serde_json::Value),

    /// Any transport failure other than HTTP 400.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A successful response body was not a JSON object.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl KycError {
    /// The decoded 400 payload, if this is a validation error.
    pub fn invalid_fields(&self) -> Option<&serde_json::Value> {
        match self {
            KycError::InvalidFields(payload) => Some(payload),
            _ => None,
        }
    }
}
