use std::sync::Arc;

use bytes::Bytes;
use eyre::{Result, WrapErr};
use http::{Method, Request, Response, StatusCode, header};

use crate::{
    core::{MatchError, Router},
    ports::handler::{HandlerError, SharedHandler},
};

/// Runs whole `http::Request`s through a [`Router`] of [`SharedHandler`]s.
///
/// Misses become plain-text responses: 404 for unknown paths, 405 with an
/// `Allow` header for known paths under another method, 308 with `Location`
/// for trailing-slash redirects and 414 for paths over the segment limit.
/// An unregistered `OPTIONS` request on a known path is answered with 204 and
/// the `Allow` header.
pub struct HttpDispatcher {
    router: Arc<Router<SharedHandler>>,
}

impl HttpDispatcher {
    pub fn new(router: Arc<Router<SharedHandler>>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Arc<Router<SharedHandler>> {
        &self.router
    }

    /// Route the request and invoke the matched handler.
    pub fn dispatch(&self, req: &Request<Bytes>) -> Result<Response<Bytes>> {
        let path = req.uri().path();
        let ctx = match self.router.dispatch(req.method(), path) {
            Ok(ctx) => ctx,
            Err(miss) => return self.miss_response(req.method(), path, &miss),
        };

        match ctx.handler().handle(req, ctx.params()) {
            Ok(response) => Ok(response),
            Err(HandlerError::BadRequest(message)) => {
                text_response(StatusCode::BAD_REQUEST, message)
            }
            Err(err) => {
                tracing::error!(
                    http.method = %req.method(),
                    route = ctx.matched_pattern(),
                    error = %err,
                    "handler failed"
                );
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    fn miss_response(&self, method: &Method, path: &str, miss: &MatchError) -> Result<Response<Bytes>> {
        match miss {
            MatchError::MethodNotAllowed { .. } if *method == Method::OPTIONS => {
                let allow = miss.allow_header().unwrap_or_default();
                Response::builder()
                    .status(StatusCode::NO_CONTENT)
                    .header(header::ALLOW, allow)
                    .body(Bytes::new())
                    .wrap_err_with(|| format!("Failed to build OPTIONS response for {path}"))
            }
            MatchError::MethodNotAllowed { .. } => {
                let allow = miss.allow_header().unwrap_or_default();
                Response::builder()
                    .status(StatusCode::METHOD_NOT_ALLOWED)
                    .header(header::ALLOW, allow)
                    .body(Bytes::from_static(b"Method Not Allowed"))
                    .wrap_err("Failed to build 405 response")
            }
            MatchError::TrailingSlashRedirect { location } => Response::builder()
                .status(StatusCode::PERMANENT_REDIRECT)
                .header(header::LOCATION, location.as_str())
                .body(Bytes::new())
                .wrap_err_with(|| format!("Failed to build redirect to {location}")),
            MatchError::TooManySegments { .. } => {
                text_response(StatusCode::URI_TOO_LONG, "URI Too Long")
            }
            _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
        }
    }
}

fn text_response(status: StatusCode, body: impl Into<String>) -> Result<Response<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Bytes::from(body.into()))
        .wrap_err_with(|| format!("Failed to build {status} response"))
}
