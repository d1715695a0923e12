//! Request building blocks and the response interceptor layer
//!
//! Every wrapper builds its request from a [`Verb`], optional [`Params`] and
//! a [`CallConfig`]; rejected calls pass the [`InterceptorStack`] before the
//! wrapper turns them into an envelope.

pub use middleware::{
    InterceptorStack, Rejection, ResponseInterceptor, SessionExpiryInterceptor, TracingInterceptor,
};
pub use request::{CallConfig, Params, Verb};

pub mod middleware;
mod request;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
