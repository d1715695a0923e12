//! Response interceptors run on every rejected call
//!
//! An interceptor sees the rejection before the originating wrapper turns
//! it into an envelope. It may react (log, redirect) but cannot swallow the
//! rejection: the wrapper always gets it afterwards.

use crate::context::{ClientContext, LOGIN_PATH};
use crate::session;
use async_trait::async_trait;
use dedups3_console_transport::{Transport, TransportError};
use http::Method;
use std::sync::Arc;
use std::time::Duration;

/// A call that was rejected by the transport.
#[derive(Debug, Clone, Copy)]
pub struct Rejection<'a> {
    /// HTTP method of the call
    pub method: &'a Method,
    /// Request path relative to the API base
    pub path: &'a str,
    /// Why it was rejected
    pub error: &'a TransportError,
}

/// Trait for response interceptors.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// React to a rejected call.
    async fn on_rejection(&self, rejection: Rejection<'_>);
}

/// Interceptor that logs every rejection.
pub struct TracingInterceptor;

#[async_trait]
impl ResponseInterceptor for TracingInterceptor {
    async fn on_rejection(&self, rejection: Rejection<'_>) {
        tracing::debug!(
            method = %rejection.method,
            path = %rejection.path,
            status = rejection.error.status(),
            error = %rejection.error,
            "Console request rejected"
        );
    }
}

/// Logs out and redirects to the login page when the session has expired.
///
/// Only a 401 counts as expiry. The decision is made on the page currently
/// shown, not on the failed request's path: on an authentication page the
/// 401 is left for that page to display.
pub struct SessionExpiryInterceptor {
    transport: Arc<dyn Transport>,
    context: ClientContext,
    logout_timeout: Duration,
}

impl SessionExpiryInterceptor {
    /// Create the interceptor.
    pub fn new(transport: Arc<dyn Transport>, context: ClientContext, logout_timeout: Duration) -> Self {
        Self {
            transport,
            context,
            logout_timeout,
        }
    }
}

#[async_trait]
impl ResponseInterceptor for SessionExpiryInterceptor {
    async fn on_rejection(&self, rejection: Rejection<'_>) {
        if !rejection.error.is_unauthorized() {
            return;
        }

        let current = self.context.current_path();
        if self.context.is_on_auth_flow() {
            tracing::warn!(
                page = %current,
                path = %rejection.path,
                "Authentication rejected on an authentication page"
            );
            return;
        }

        tracing::warn!(
            page = %current,
            path = %rejection.path,
            "Session expired or invalid, redirecting to {}",
            LOGIN_PATH
        );
        session::end_session(self.transport.as_ref(), &self.context, self.logout_timeout).await;
    }
}

/// Ordered collection of interceptors.
#[derive(Clone, Default)]
pub struct InterceptorStack {
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interceptor to the stack.
    pub fn push(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Number of interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

#[async_trait]
impl ResponseInterceptor for InterceptorStack {
    async fn on_rejection(&self, rejection: Rejection<'_>) {
        // Last registered sees the rejection first
        for interceptor in self.interceptors.iter().rev() {
            interceptor.on_rejection(rejection).await;
        }
    }
}
