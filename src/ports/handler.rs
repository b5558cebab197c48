use std::{fmt, sync::Arc};

use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

use crate::core::context::Params;

/// Error type for handler execution
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HandlerError {
    /// The request was understood but cannot be served
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Result type for handler execution
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Handler defines the port for the code a route resolves to.
///
/// It is a single-operation capability: take the request and the parameters
/// bound by the router, produce a response or an error. The router stores it
/// as an opaque [`SharedHandler`] and never calls it; invoking it after a
/// successful match is up to the caller.
pub trait Handler: Send + Sync + 'static {
    /// Process a matched request
    ///
    /// # Arguments
    /// * `req` - The HTTP request that was routed
    /// * `params` - Path parameters captured by the route pattern
    fn handle(&self, req: &Request<Bytes>, params: &Params<'_>) -> HandlerResult<Response<Bytes>>;
}

/// Reference-counted handler as stored in the route tree.
pub type SharedHandler = Arc<dyn Handler>;

/// Adapter turning a plain function or closure into a [`Handler`].
pub struct HandlerFn<F>(F);

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&Request<Bytes>, &Params<'_>) -> HandlerResult<Response<Bytes>> + Send + Sync + 'static,
{
    fn handle(&self, req: &Request<Bytes>, params: &Params<'_>) -> HandlerResult<Response<Bytes>> {
        (self.0)(req, params)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerFn")
    }
}

/// Wrap a function as a [`SharedHandler`].
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(&Request<Bytes>, &Params<'_>) -> HandlerResult<Response<Bytes>> + Send + Sync + 'static,
{
    Arc::new(HandlerFn(f))
}
