//! Request and response transformers.
//!
//! # Design
//! A `Transformers<Res>` holds an optional request shaper and the response
//! shaper. The request default unwraps `form` or `data` bodies and passes
//! plain records through. The response side is always present: a fresh pair
//! returns the wire value unchanged (`Res = Value`), `decoded` swaps in
//! [`decode`] for any `DeserializeOwned` result type, and `with_response`
//! installs an arbitrary mapping. Response shapers are fallible so a wire
//! value that does not fit becomes a `Failure` instead of a made-up result.
//!
//! Transformers are expected to be pure. They are stored behind `Arc` and
//! must be `Send + Sync`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::argument::Argument;
use crate::error::Failure;

/// Shapes an argument into the payload sent over the wire.
pub type RequestTransformer = Arc<dyn Fn(&Argument) -> Value + Send + Sync>;

/// Shapes a raw wire response into the endpoint's result type.
pub type ResponseTransformer<Res> = Arc<dyn Fn(Value) -> Result<Res, Failure> + Send + Sync>;

/// The request/response transformer pair of an endpoint.
pub struct Transformers<Res = Value> {
    request: Option<RequestTransformer>,
    response: ResponseTransformer<Res>,
    custom_response: bool,
}

impl Transformers<Value> {
    /// Default request shaping and an identity response.
    pub fn new() -> Self {
        Self {
            request: None,
            response: Arc::new(identity),
            custom_response: false,
        }
    }
}

impl<Res> Transformers<Res> {
    pub fn with_request<F>(mut self, f: F) -> Self
    where
        F: Fn(&Argument) -> Value + Send + Sync + 'static,
    {
        self.request = Some(Arc::new(f));
        self
    }

    /// Replace the response shaper, possibly changing the result type.
    pub fn with_response<R, F>(self, f: F) -> Transformers<R>
    where
        F: Fn(Value) -> Result<R, Failure> + Send + Sync + 'static,
    {
        Transformers {
            request: self.request,
            response: Arc::new(f),
            custom_response: true,
        }
    }

    /// Decode the wire value into `R` instead.
    pub fn decoded<R: DeserializeOwned + 'static>(self) -> Transformers<R> {
        Transformers {
            request: self.request,
            response: Arc::new(decode::<R>),
            custom_response: false,
        }
    }

    pub fn has_request(&self) -> bool {
        self.request.is_some()
    }

    pub fn has_response(&self) -> bool {
        self.custom_response
    }

    /// Run the effective request transformer.
    pub fn transform_request(&self, argument: &Argument) -> Value {
        match &self.request {
            Some(f) => f(argument),
            None => default_request(argument),
        }
    }

    /// Run the response transformer.
    pub fn transform_response(&self, wire: Value) -> Result<Res, Failure> {
        (self.response)(wire)
    }
}

impl Default for Transformers<Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Res> Clone for Transformers<Res> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            response: self.response.clone(),
            custom_response: self.custom_response,
        }
    }
}

impl<Res> fmt::Debug for Transformers<Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformers")
            .field("request", &self.request.as_ref().map(|_| "custom"))
            .field("response", &if self.custom_response { "custom" } else { "default" })
            .finish()
    }
}

fn identity(wire: Value) -> Result<Value, Failure> {
    Ok(wire)
}

/// Default response decoding: the wire value deserialized into `T`.
pub fn decode<T: DeserializeOwned>(wire: Value) -> Result<T, Failure> {
    serde_json::from_value(wire).map_err(|e| Failure::new(format!("response decoding failed: {e}")))
}

/// Default request shaping: the `form` body, else the `data` body, else the
/// record unchanged.
pub fn default_request(argument: &Argument) -> Value {
    match argument {
        Argument::Form { form, .. } => form.clone(),
        Argument::Postable { data, .. } => data.clone(),
        Argument::Plain(value) => value.clone(),
    }
}
