//! A `Transport` over HTTP, backed by `reqwest`.
//!
//! # Design
//! `HttpTransport` holds a base URL, headers sent with every call (typically
//! an already-obtained `Authorization` header) and a `reqwest::Client`. It
//! carries no per-call state. Each plan is mapped onto a request as follows:
//!
//! - query-string channel: the payload record is flattened into query
//!   parameters, nested values using bracket notation (`filter[limit]=5`);
//! - form channel: each top-level field becomes a multipart text part;
//! - for both, a `null` payload sends nothing and any other non-object
//!   payload is rejected before the request goes out;
//! - JSON channel: the payload is the JSON body;
//! - no channel: no body.
//!
//! Any non-2xx status is an error. A 2xx response with an empty body decodes
//! to `null`. No retries, no timeouts beyond those configured on the client.

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

use crate::channel::Channel;
use crate::error::HttpTransportError;
use crate::http::InvocationPlan;
use crate::template::display_value;
use crate::transport::{Transport, TransportError};

/// Environment variable read by [`HttpTransport::from_env`].
pub const BASE_URL_ENV: &str = "DISPATCH_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Stateless HTTP transport bound to a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Vec::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from `DISPATCH_BASE_URL`, falling back to a local server.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use a preconfigured client (proxies, timeouts, TLS roots).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, plan: InvocationPlan) -> Result<reqwest::RequestBuilder, HttpTransportError> {
        let url = format!("{}{}", self.base_url, plan.path);
        let mut request = self.client.request(plan.method.into(), url);
        for (name, value) in self.headers.iter().chain(plan.headers.iter()) {
            request = request.header(name, value);
        }
        Ok(match plan.channel {
            Some(Channel::QueryString) => request.query(&query_pairs(&plan.payload)?),
            Some(Channel::Form) => request.multipart(multipart_form(plan.payload)?),
            Some(Channel::Json) => request.json(&plan.payload),
            None => request,
        })
    }

    async fn call(&self, plan: InvocationPlan) -> Result<Value, HttpTransportError> {
        let response = self.build(plan)?.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        check_status(status.as_u16(), &body)?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, plan: InvocationPlan) -> Result<Value, TransportError> {
        Ok(self.call(plan).await?)
    }
}

/// Map non-success status codes to the matching `HttpTransportError`.
fn check_status(status: u16, body: &[u8]) -> Result<(), HttpTransportError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 404 {
        return Err(HttpTransportError::NotFound);
    }
    Err(HttpTransportError::Status {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Flatten a payload record into query parameters.
///
/// Nested objects and arrays use bracket keys; `null` fields are skipped.
fn query_pairs(payload: &Value) -> Result<Vec<(String, String)>, HttpTransportError> {
    let mut pairs = Vec::new();
    match payload {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(key.clone(), value, &mut pairs);
            }
        }
        _ => {
            return Err(HttpTransportError::NonObjectPayload {
                channel: "query string",
            })
        }
    }
    Ok(pairs)
}

fn flatten_into(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (child, v) in map {
                flatten_into(format!("{key}[{child}]"), v, pairs);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(format!("{key}[{i}]"), v, pairs);
            }
        }
        scalar => pairs.push((key, display_value(scalar))),
    }
}

/// One text part per top-level field. Structured fields are sent as JSON.
fn multipart_form(payload: Value) -> Result<multipart::Form, HttpTransportError> {
    let map = match payload {
        Value::Null => return Ok(multipart::Form::new()),
        Value::Object(map) => map,
        _ => return Err(HttpTransportError::NonObjectPayload { channel: "form" }),
    };
    let mut form = multipart::Form::new();
    for (name, value) in map {
        let text = match value {
            Value::Null => continue,
            Value::Object(_) | Value::Array(_) => value.to_string(),
            scalar => display_value(&scalar),
        };
        form = form.text(name, text);
    }
    Ok(form)
}
