//! Endpoint descriptors and the dispatcher.
//!
//! # Design
//! An `Endpoint` is declared once, typically by a resource module, and never
//! mutated: builder methods consume and return a new value. It holds the
//! method, the path template, the transformer pair and static headers. The
//! request type `Req` is anything convertible into an `Argument`; the result
//! type `Res` is what the response transformer produces. `declare` yields an
//! endpoint returning the raw `Value`; `decoded` and `with_response` change
//! the result type.
//!
//! Dispatch is split in two. `plan` is pure: it renders the path, shapes the
//! payload and picks the channel. `execute` hands that plan to a transport
//! and turns whatever happens, including a panicking transport or
//! transformer, into either the transformed result or a `Failure`. Nothing
//! escapes `execute` as a panic or a foreign error type, and a failed call is
//! never retried.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::argument::Argument;
use crate::channel::select_channel;
use crate::error::Failure;
use crate::http::{HttpMethod, InvocationPlan};
use crate::template::{PathTemplate, TemplateSyntax};
use crate::transform::Transformers;
use crate::transport::Transport;

/// Immutable description of one remote operation.
pub struct Endpoint<Req = Value, Res = Value> {
    method: HttpMethod,
    template: PathTemplate,
    transformers: Transformers<Res>,
    headers: Vec<(String, String)>,
    _request: PhantomData<fn(Req)>,
}

/// Declare an endpoint with default transformers.
pub fn declare<Req>(method: HttpMethod, template: impl Into<PathTemplate>) -> Endpoint<Req> {
    Endpoint::declare(method, template)
}

impl<Req> Endpoint<Req, Value> {
    /// A new endpoint whose result is the raw wire value.
    pub fn declare(method: HttpMethod, template: impl Into<PathTemplate>) -> Self {
        Self {
            method,
            template: template.into(),
            transformers: Transformers::new(),
            headers: Vec::new(),
            _request: PhantomData,
        }
    }
}

impl<Req, Res> Endpoint<Req, Res> {
    pub fn with_transformers<R>(self, transformers: Transformers<R>) -> Endpoint<Req, R> {
        Endpoint {
            method: self.method,
            template: self.template,
            transformers,
            headers: self.headers,
            _request: PhantomData,
        }
    }

    pub fn with_request<F>(mut self, f: F) -> Self
    where
        F: Fn(&Argument) -> Value + Send + Sync + 'static,
    {
        self.transformers = self.transformers.with_request(f);
        self
    }

    /// Map the wire value into the result with `f`. An `Err` from `f` is
    /// returned from `execute` as is.
    pub fn with_response<R, F>(self, f: F) -> Endpoint<Req, R>
    where
        F: Fn(Value) -> Result<R, Failure> + Send + Sync + 'static,
    {
        let transformers = self.transformers.clone();
        self.with_transformers(transformers.with_response(f))
    }

    /// Decode the wire value into `R`.
    pub fn decoded<R: DeserializeOwned + 'static>(self) -> Endpoint<Req, R> {
        let transformers = self.transformers.clone();
        self.with_transformers(transformers.decoded())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Re-parse the template with different placeholder delimiters.
    pub fn with_syntax(mut self, syntax: TemplateSyntax) -> Self {
        self.template = PathTemplate::with_syntax(self.template.as_str(), syntax);
        self
    }

    /// The same endpoint with `hook=false` in its query string, which asks the
    /// remote API not to fire webhooks for this call.
    ///
    /// Existing query parameters are kept (sorted by key); an existing `hook`
    /// parameter is replaced.
    pub fn no_hook(mut self) -> Self {
        let (path, query) = match self.template.as_str().split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (self.template.as_str().to_string(), String::new()),
        };
        let mut params: BTreeMap<&str, &str> = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .collect();
        params.insert("hook", "false");
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let syntax = self.template.syntax().clone();
        self.template = PathTemplate::with_syntax(format!("{path}?{query}"), syntax);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn transformers(&self) -> &Transformers<Res> {
        &self.transformers
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl<Req, Res> Endpoint<Req, Res>
where
    Req: Into<Argument>,
{
    /// Resolve an invocation without performing it.
    ///
    /// A missing argument behaves as an empty record.
    pub fn plan(&self, argument: Option<Req>) -> InvocationPlan {
        let argument = argument.map(Into::into).unwrap_or_default();
        let path = self.template.render(&argument.to_value());
        let channel = select_channel(self.method, &argument);
        let payload = match channel {
            Some(_) => self.transformers.transform_request(&argument),
            None => Value::Null,
        };
        InvocationPlan {
            method: self.method,
            path,
            channel,
            payload,
            headers: self.headers.clone(),
        }
    }

    /// Perform the invocation through `transport`.
    ///
    /// Returns the transformed response, or a `Failure` carrying the error
    /// message. A panic in a transformer or in the transport is caught and
    /// returned as a `Failure` as well.
    pub async fn execute<T>(&self, argument: Option<Req>, transport: &T) -> Result<Res, Failure>
    where
        T: Transport + ?Sized,
    {
        let plan = match panic::catch_unwind(AssertUnwindSafe(|| self.plan(argument))) {
            Ok(plan) => plan,
            Err(payload) => {
                let failure = Failure::from_panic(payload);
                tracing::warn!(
                    method = %self.method,
                    template = self.template.as_str(),
                    error = %failure,
                    "request transformer panicked"
                );
                return Err(failure);
            }
        };
        let method = plan.method;
        let path = plan.path.clone();
        tracing::debug!(%method, %path, channel = ?plan.channel, "dispatching");

        let outcome = AssertUnwindSafe(transport.send(plan)).catch_unwind().await;
        let wire = match outcome {
            Ok(Ok(wire)) => wire,
            Ok(Err(err)) => {
                let failure = Failure::new(err.to_string());
                tracing::warn!(%method, %path, error = %failure, "transport failed");
                return Err(failure);
            }
            Err(payload) => {
                let failure = Failure::from_panic(payload);
                tracing::warn!(%method, %path, error = %failure, "transport panicked");
                return Err(failure);
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.transformers.transform_response(wire))) {
            Ok(result) => result.inspect_err(|failure| {
                tracing::warn!(%method, %path, error = %failure, "response rejected");
            }),
            Err(payload) => {
                let failure = Failure::from_panic(payload);
                tracing::warn!(%method, %path, error = %failure, "response transformer panicked");
                Err(failure)
            }
        }
    }
}

impl<Req, Res> Clone for Endpoint<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            template: self.template.clone(),
            transformers: self.transformers.clone(),
            headers: self.headers.clone(),
            _request: PhantomData,
        }
    }
}

impl<Req, Res> fmt::Debug for Endpoint<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("transformers", &self.transformers)
            .field("headers", &self.headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use serde_json::json;

    #[test]
    fn plan_renders_path_and_unwraps_data() {
        let endpoint: Endpoint = declare(HttpMethod::Post, "/item/{{item_id}}");
        let plan = endpoint.plan(Some(json!({ "item_id": 42, "data": { "title": "x" } })));
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(plan.path, "/item/42");
        assert_eq!(plan.channel, Some(Channel::Json));
        assert_eq!(plan.payload, json!({ "title": "x" }));
    }

    #[test]
    fn plan_without_argument_uses_empty_record() {
        let endpoint: Endpoint = declare(HttpMethod::Get, "/app");
        let plan = endpoint.plan(None);
        assert_eq!(plan.path, "/app");
        assert_eq!(plan.channel, Some(Channel::QueryString));
        assert_eq!(plan.payload, json!({}));
    }

    #[test]
    fn delete_drops_the_payload() {
        let endpoint: Endpoint = declare(HttpMethod::Delete, "/hook/{{hook_id}}");
        let plan = endpoint.plan(Some(json!({ "hook_id": 3, "data": { "x": 1 } })));
        assert_eq!(plan.path, "/hook/3");
        assert_eq!(plan.channel, None);
        assert_eq!(plan.payload, Value::Null);
    }

    #[test]
    fn form_channel_is_decided_before_the_request_transformer() {
        let endpoint: Endpoint = declare::<Value>(HttpMethod::Post, "/file")
            .with_request(|_| json!({ "reshaped": true }));
        let plan = endpoint.plan(Some(json!({ "form": { "filename": "a.txt" } })));
        assert_eq!(plan.channel, Some(Channel::Form));
        assert_eq!(plan.payload, json!({ "reshaped": true }));
    }

    #[test]
    fn headers_are_forwarded() {
        let endpoint: Endpoint =
            declare::<Value>(HttpMethod::Get, "/app").with_header("x-trace", "abc");
        let plan = endpoint.plan(None);
        assert_eq!(plan.headers, vec![("x-trace".to_string(), "abc".to_string())]);
    }

    #[test]
    fn no_hook_appends_query_parameter() {
        let endpoint: Endpoint = declare::<Value>(HttpMethod::Post, "/comment/{{type}}/{{id}}").no_hook();
        assert_eq!(endpoint.template().as_str(), "/comment/{{type}}/{{id}}?hook=false");
        let plan = endpoint.plan(Some(json!({ "type": "item", "id": 1 })));
        assert_eq!(plan.path, "/comment/item/1?hook=false");
    }

    #[test]
    fn no_hook_merges_with_existing_query() {
        let endpoint: Endpoint =
            declare::<Value>(HttpMethod::Put, "/item/{{item_id}}?silent=true&hook=true").no_hook();
        assert_eq!(
            endpoint.template().as_str(),
            "/item/{{item_id}}?hook=false&silent=true"
        );
    }

    #[test]
    fn custom_syntax_survives_no_hook() {
        let syntax = TemplateSyntax::new("${", "}").unwrap();
        let endpoint: Endpoint = declare::<Value>(HttpMethod::Get, "/item/${item_id}")
            .with_syntax(syntax)
            .no_hook();
        let plan = endpoint.plan(Some(json!({ "item_id": 8 })));
        assert_eq!(plan.path, "/item/8?hook=false");
    }

    #[test]
    fn endpoints_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Endpoint>();
        assert_send_sync::<Endpoint<Argument, u64>>();
    }
}
