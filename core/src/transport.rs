//! The transport seam.
//!
//! # Design
//! Endpoints never touch the network. A `Transport` receives a resolved
//! `InvocationPlan` and returns the raw wire value or an error; how it signals
//! failure is its own business, since the dispatcher folds every error into a
//! `Failure`. Retries, timeouts and authentication all live on this side of
//! the seam.
//!
//! `transport_fn` adapts an async closure, which is the usual way to inject a
//! stub or a custom HTTP stack.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::InvocationPlan;

/// Boxed error returned by transports.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes an `InvocationPlan` against a remote API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, plan: InvocationPlan) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, plan: InvocationPlan) -> Result<Value, TransportError> {
        (**self).send(plan).await
    }
}

/// A `Transport` backed by an async closure. See [`transport_fn`].
#[derive(Clone)]
pub struct TransportFn<F> {
    f: F,
}

/// Wrap an async closure as a `Transport`.
///
/// ```
/// use dispatch_core::transport_fn;
///
/// let echo = transport_fn(|plan| async move {
///     serde_json::to_value(plan).map_err(|e| e.to_string())
/// });
/// # let _ = echo;
/// ```
pub fn transport_fn<F, Fut, E>(f: F) -> TransportFn<F>
where
    F: Fn(InvocationPlan) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, E>> + Send,
    E: Into<TransportError>,
{
    TransportFn { f }
}

#[async_trait]
impl<F, Fut, E> Transport for TransportFn<F>
where
    F: Fn(InvocationPlan) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, E>> + Send,
    E: Into<TransportError>,
{
    async fn send(&self, plan: InvocationPlan) -> Result<Value, TransportError> {
        (self.f)(plan).await.map_err(Into::into)
    }
}
