//! Error types for endpoint dispatch.
//!
//! # Design
//! `Failure` is the only error a dispatch ever returns. It is a value with the
//! wire shape `{"error": "<message>"}`, not a category tree: transport errors,
//! caught panics and undecodable responses all collapse into one message.
//! Callers that need finer handling inspect the message.
//!
//! `HttpTransportError` is what the bundled reqwest transport raises before
//! the dispatcher folds it into a `Failure`. A 404 maps to `NotFound`, whose
//! message is `resource not found`.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An unsuccessful dispatch, returned in place of a success value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{error}")]
pub struct Failure {
    pub error: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.error
    }

    /// Build a failure from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "dispatch panicked".to_string()
        };
        Self::new(message)
    }
}

/// Whether an untyped value has the failure shape: an `error` field is
/// present, whatever its value (`null` included).
pub fn is_failure_value(value: &Value) -> bool {
    value.get("error").is_some()
}

/// The value could not be turned into an argument record.
#[derive(Debug, Error)]
#[error("argument serialization failed: {0}")]
pub struct ArgumentError(#[from] serde_json::Error);

/// Errors raised by `HttpTransport`.
#[derive(Debug, Error)]
pub enum HttpTransportError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A query-string or form payload that is neither an object nor `null`.
    #[error("{channel} payload must be an object")]
    NonObjectPayload { channel: &'static str },

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body is not JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}
