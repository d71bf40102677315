//! Plain-data description of one resolved HTTP invocation.
//!
//! # Design
//! An `InvocationPlan` is everything a transport needs to perform a call:
//! method, rendered path, the channel carrying the payload, the payload and
//! any static headers. It is built fresh for every dispatch and handed to the
//! transport by value, so concurrent dispatches never share one.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::Channel;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved invocation, handed to a `Transport`.
///
/// `channel` is `None` for `DELETE`, in which case `payload` is `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationPlan {
    pub method: HttpMethod,
    pub path: String,
    pub channel: Option<Channel>,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
}
