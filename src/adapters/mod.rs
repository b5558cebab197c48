pub mod http_dispatch;

/// Re-export commonly used types from adapters
pub use http_dispatch::HttpDispatcher;
