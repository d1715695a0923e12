//! Navigation context handed to the client at construction
//!
//! The session-expiry check needs two things a browser would provide
//! implicitly: the path of the page currently shown, and a way to force
//! navigation elsewhere. Both are capabilities here, so the client can run
//! headless and tests can observe every redirect.

use dedups3_console_transport::CredentialPolicy;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use url::Url;

/// Login page the client redirects to when the session expires.
pub const LOGIN_PATH: &str = "/login";

/// Pages that are part of the authentication flow. A 401 received while one
/// of them is shown is left for the page to display.
pub const AUTH_FLOW_PATHS: [&str; 3] = ["/login", "/auth", "/register"];

/// Whether `path` is one of [`AUTH_FLOW_PATHS`].
///
/// Only the pathname is compared; a query string or fragment is ignored.
pub fn is_auth_flow_path(path: &str) -> bool {
    let pathname = path.split(['?', '#']).next().unwrap_or_default();
    AUTH_FLOW_PATHS.contains(&pathname)
}

/// Source of the page path currently shown to the user.
pub trait Location: Send + Sync {
    /// Current page path, e.g. `/buckets`.
    fn current_path(&self) -> String;
}

/// Forced navigation.
pub trait Navigator: Send + Sync {
    /// Leave the current page for `to`.
    fn navigate(&self, to: &str);
}

/// In-memory page history implementing both [`Location`] and [`Navigator`].
///
/// Navigating to the page already shown changes nothing, so any number of
/// redirects to the same destination amount to one.
#[derive(Debug)]
pub struct MemoryHistory {
    current: RwLock<String>,
    navigations: Mutex<Vec<String>>,
}

impl MemoryHistory {
    /// Start on `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Move to `path` as the user would (not recorded as a forced navigation).
    pub fn visit(&self, path: impl Into<String>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = path.into();
    }

    /// Every effective forced navigation, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for MemoryHistory {
    fn current_path(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryHistory {
    fn navigate(&self, to: &str) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if *current == to {
            return;
        }
        *current = to.to_string();
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to.to_string());
    }
}

/// Everything the client needs to know about where it runs.
#[derive(Clone)]
pub struct ClientContext {
    base_url: Url,
    credentials: CredentialPolicy,
    location: Arc<dyn Location>,
    navigator: Arc<dyn Navigator>,
}

impl ClientContext {
    /// Create a context from separate location and navigator capabilities.
    pub fn new(base_url: Url, location: Arc<dyn Location>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            base_url,
            credentials: CredentialPolicy::Include,
            location,
            navigator,
        }
    }

    /// Create a context backed by one [`MemoryHistory`].
    pub fn with_history(base_url: Url, history: Arc<MemoryHistory>) -> Self {
        Self::new(base_url, history.clone(), history)
    }

    /// Set the credential policy.
    pub fn with_credentials(mut self, policy: CredentialPolicy) -> Self {
        self.credentials = policy;
        self
    }

    /// Resolved API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credential policy.
    pub fn credentials(&self) -> CredentialPolicy {
        self.credentials
    }

    /// Current page path.
    pub fn current_path(&self) -> String {
        self.location.current_path()
    }

    /// Whether the page shown is part of the authentication flow.
    pub fn is_on_auth_flow(&self) -> bool {
        is_auth_flow_path(&self.current_path())
    }

    /// Force navigation to `to`.
    pub fn navigate(&self, to: &str) {
        self.navigator.navigate(to);
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("current_path", &self.current_path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/login", true)]
    #[case("/auth", true)]
    #[case("/register", true)]
    #[case("/login?redirect=%2Fbuckets", true)]
    #[case("/buckets", false)]
    #[case("/bucket/photos", false)]
    #[case("/", false)]
    #[case("/login/", false)]
    fn test_auth_flow_paths(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_auth_flow_path(path), expected);
    }

    #[test]
    fn test_memory_history_records_effective_navigations() {
        let history = MemoryHistory::new("/buckets");
        history.navigate("/login");
        history.navigate("/login");
        history.navigate("/login");

        assert_eq!(history.current_path(), "/login");
        assert_eq!(history.navigations(), vec!["/login".to_string()]);
    }

    #[test]
    fn test_visit_is_not_a_forced_navigation() {
        let history = MemoryHistory::default();
        history.visit("/buckets");

        assert_eq!(history.current_path(), "/buckets");
        assert!(history.navigations().is_empty());
    }

    #[test]
    fn test_context_reads_location() {
        let base = Url::parse("http://localhost:3002/api/").unwrap();
        let history = Arc::new(MemoryHistory::new("/register"));
        let context = ClientContext::with_history(base, history.clone());

        assert!(context.is_on_auth_flow());
        history.visit("/dashboard");
        assert!(!context.is_on_auth_flow());

        context.navigate(LOGIN_PATH);
        assert_eq!(history.navigations(), vec![LOGIN_PATH.to_string()]);
    }
}
