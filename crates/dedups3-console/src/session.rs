//! Login, logout and the authentication check behind the navigation guard
//!
//! The server keeps the session in a cookie; nothing here stores a token.

use crate::client::Client;
use crate::context::{ClientContext, LOGIN_PATH};
use crate::envelope::Envelope;
use crate::http::Verb;
use bytes::Bytes;
use dedups3_console_transport::{HttpRequest, RequestBody, Transport};
use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

/// Login endpoint.
pub const LOGIN_ENDPOINT: &str = "/login";
/// Logout endpoint.
pub const LOGOUT_ENDPOINT: &str = "/logout";
/// Authentication check endpoint.
pub const AUTH_STATUS_ENDPOINT: &str = "/auth/status";

const LOGIN_FAILED: &str = "Login failed";

/// Digest the backend expects in place of the password:
/// lowercase hex MD5 of `password:username`.
pub fn hash_password(password: &str, username: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hasher.update(b":");
    hasher.update(username.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: String,
}

/// Best-effort server logout followed by a forced redirect to the login page.
///
/// Sent straight to the transport: a rejected logout never reaches the
/// interceptors, and its failure never holds up the redirect.
pub(crate) async fn end_session(transport: &dyn Transport, context: &ClientContext, timeout: Duration) {
    let request = HttpRequest::post(LOGOUT_ENDPOINT)
        .with_body(RequestBody::Json(Bytes::from_static(b"{}")))
        .with_timeout(timeout);

    if let Err(error) = transport.send(request).await {
        tracing::debug!(error = %error, "Logout request failed, continuing");
    }

    context.navigate(LOGIN_PATH);
}

/// Session operations.
#[derive(Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Log in. The username is sent and hashed exactly as given, since the
    /// backend verifies the digest against the raw name. The password never
    /// leaves the process in clear text.
    ///
    /// `code == 0` is the only success. Any other code yields a failure
    /// envelope carrying the backend's `msg`, or "Login failed".
    pub async fn login(&self, username: &str, password: &SecretString) -> Envelope {
        let body = LoginBody {
            username,
            password: hash_password(password.expose_secret(), username),
        };

        let request = match HttpRequest::post(LOGIN_ENDPOINT).with_json(&body) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(error = %error, "Could not encode login request");
                return Envelope::failure(LOGIN_FAILED);
            }
        };

        let envelope = self.client.execute(Verb::Post, request, LOGIN_FAILED).await;
        if envelope.success {
            tracing::info!(username = %username, "Logged in");
        }
        envelope
    }

    /// Log out and return to the login page. Never fails.
    pub async fn logout(&self) {
        end_session(
            self.client.transport().as_ref(),
            self.client.context(),
            self.client.logout_timeout(),
        )
        .await;
    }

    /// Whether the current session is valid.
    ///
    /// Bypasses the interceptors so a 401 here never triggers a redirect.
    pub async fn auth_status(&self) -> bool {
        match self.client.transport().send(HttpRequest::get(AUTH_STATUS_ENDPOINT)).await {
            Ok(_) => true,
            Err(error) => {
                tracing::debug!(status = error.status(), error = %error, "Session is not authenticated");
                false
            }
        }
    }

    /// Guard deciding whether navigation to a page may proceed.
    pub fn guard(&self) -> NavigationGuard {
        NavigationGuard {
            session: self.clone(),
        }
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested page
    Proceed,
    /// Go here instead
    Redirect(String),
}

/// Lets the login page through unconditionally and everything else only
/// with a valid session.
#[derive(Clone)]
pub struct NavigationGuard {
    session: Session,
}

impl NavigationGuard {
    /// Decide on navigation to `to`.
    pub async fn resolve(&self, to: &str) -> GuardDecision {
        let pathname = to.split(['?', '#']).next().unwrap_or_default();
        if pathname == LOGIN_PATH {
            return GuardDecision::Proceed;
        }

        if self.session.auth_status().await {
            GuardDecision::Proceed
        } else {
            GuardDecision::Redirect(LOGIN_PATH.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        assert_eq!(hash_password("admin123", "admin"), "f3b49318621fb57aabf0814885fda39e");
        assert_eq!(hash_password("secret", "alice"), "80bf01cf3ede4b040e5fed4f99831bf1");
        assert_eq!(hash_password("", ""), "853ae90f0351324bd73ea615e6487517");
        assert_ne!(hash_password("secret", "alice"), hash_password("alice", "secret"));
        // surrounding whitespace is part of the digest
        assert_ne!(hash_password("admin123", " admin"), hash_password("admin123", "admin"));
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let digest = hash_password("P@ss word", "bob");
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
