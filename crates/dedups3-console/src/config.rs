//! Configuration for the console client

use dedups3_console_transport::CredentialPolicy;
use http::HeaderMap;
use std::path::PathBuf;
use std::time::Duration;

/// Origin the console is served from when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3002";

/// Path prefix every console API route lives under.
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Upper bound on the logout call so navigation is never held up by it.
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for the console client.
///
/// Fixed once the client is built; every wrapper borrows the same transport
/// built from it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin serving the console, e.g. `https://storage.example.com`
    pub origin: String,

    /// API base path resolved against the origin
    pub base_path: String,

    /// Default timeout for requests; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Timeout for the best-effort logout call
    pub logout_timeout: Duration,

    /// Whether the session cookie is stored and sent
    pub credentials: CredentialPolicy,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Directory downloaded files are saved into
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            logout_timeout: DEFAULT_LOGOUT_TIMEOUT,
            credentials: CredentialPolicy::Include,
            default_headers: HeaderMap::new(),
            download_dir: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration for the given origin.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first. This will look for:
    /// - `DEDUPS3_CONSOLE_ORIGIN` for the serving origin
    /// - `DEDUPS3_CONSOLE_BASE_PATH` for the API base path
    /// - `DEDUPS3_CONSOLE_TIMEOUT` for the request timeout (in seconds)
    /// - `DEDUPS3_CONSOLE_LOGOUT_TIMEOUT_MS` for the logout timeout (in milliseconds)
    /// - `DEDUPS3_CONSOLE_DOWNLOAD_DIR` for the download directory
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(origin) = env::var("DEDUPS3_CONSOLE_ORIGIN") {
            config.origin = origin;
        }

        if let Ok(base_path) = env::var("DEDUPS3_CONSOLE_BASE_PATH") {
            config.base_path = base_path;
        }

        if let Ok(timeout_str) = env::var("DEDUPS3_CONSOLE_TIMEOUT") {
            let secs = timeout_str
                .parse::<u64>()
                .map_err(|_| crate::error::Error::InvalidConfig {
                    key: "DEDUPS3_CONSOLE_TIMEOUT".to_string(),
                    value: timeout_str.clone(),
                })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(logout_str) = env::var("DEDUPS3_CONSOLE_LOGOUT_TIMEOUT_MS") {
            let millis = logout_str
                .parse::<u64>()
                .map_err(|_| crate::error::Error::InvalidConfig {
                    key: "DEDUPS3_CONSOLE_LOGOUT_TIMEOUT_MS".to_string(),
                    value: logout_str.clone(),
                })?;
            config.logout_timeout = Duration::from_millis(millis);
        }

        if let Ok(dir) = env::var("DEDUPS3_CONSOLE_DOWNLOAD_DIR") {
            config.download_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Directory downloads are written to: the configured one, else the
    /// user's download directory, else the working directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the serving origin.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    /// Set the API base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.base_path = base_path.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the logout timeout.
    pub fn logout_timeout(mut self, timeout: Duration) -> Self {
        self.config.logout_timeout = timeout;
        self
    }

    /// Set the credential policy.
    pub fn credentials(mut self, policy: CredentialPolicy) -> Self {
        self.config.credentials = policy;
        self
    }

    /// Set the download directory.
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = Some(dir.into());
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
