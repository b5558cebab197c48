pub mod handler;

pub use handler::{Handler, HandlerError, HandlerFn, HandlerResult, SharedHandler, handler_fn};
