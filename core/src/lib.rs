//! Declarative endpoint descriptors and dispatch for a resource-oriented
//! HTTP API.
//!
//! # Overview
//! An operation is declared once as an `Endpoint`: method, path template and
//! optional request/response transformers. At call time the endpoint combines
//! an `Argument` into an `InvocationPlan` and hands it to a `Transport`. The
//! core never performs I/O itself; the transport does.
//!
//! # Design
//! - `template` renders `{{dotted.path}}` placeholders against the argument.
//! - `transform` supplies default request/response shaping.
//! - `channel` picks query string, multipart form or JSON body.
//! - `endpoint` composes the three and folds every transport error, and any
//!   transport panic, into a `Failure` value.
//! - `client` provides `HttpTransport`, a reqwest-backed transport.
//! - `catalog` declares a sample of real resources on top of the core.
//!
//! ```no_run
//! use dispatch_core::{declare, Endpoint, HttpMethod, HttpTransport};
//! use serde_json::json;
//!
//! # async fn run() {
//! let update: Endpoint = declare(HttpMethod::Put, "/item/{{item_id}}/value");
//! let transport = HttpTransport::from_env();
//! match update.execute(Some(json!({ "item_id": 42, "data": { "title": "x" } })), &transport).await {
//!     Ok(value) => println!("{value}"),
//!     Err(failure) => eprintln!("{}", failure.error),
//! }
//! # }
//! ```

pub mod argument;
pub mod catalog;
pub mod channel;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod template;
pub mod transform;
pub mod transport;

pub use argument::Argument;
pub use channel::{select_channel, Channel};
pub use client::HttpTransport;
pub use endpoint::{declare, Endpoint};
pub use error::{is_failure_value, ArgumentError, Failure, HttpTransportError};
pub use http::{HttpMethod, InvocationPlan};
pub use template::{PathTemplate, TemplateError, TemplateSyntax};
pub use transform::{decode, default_request, RequestTransformer, ResponseTransformer, Transformers};
pub use transport::{transport_fn, Transport, TransportError, TransportFn};
