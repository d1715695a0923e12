//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of a single shared reqwest client.
//! There is no retry layer: a failed call is reported once and the caller
//! decides what to do with it.

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, RequestBody, Transport};
use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Whether the session cookie travels with requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Keep a cookie store and send its cookies on every request
    #[default]
    Include,
    /// Never store or send cookies
    Omit,
}

impl CredentialPolicy {
    /// Whether cookies are stored and sent
    pub fn includes_credentials(self) -> bool {
        matches!(self, Self::Include)
    }
}

/// Resolve the API base path against the serving origin.
///
/// The result always ends in `/` so request paths join beneath it rather
/// than replacing its last segment.
///
/// # Errors
///
/// Returns an error if the origin is not an absolute URL
pub fn resolve_base_url(origin: &str, base_path: &str) -> Result<Url> {
    let origin = Url::parse(origin)?;
    let trimmed = base_path.trim_matches('/');
    let relative = if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    };
    Ok(origin.join(&relative)?)
}

/// HTTP transport implementation
///
/// One instance is shared by every wrapper for the lifetime of the client:
/// - Requests resolve beneath a fixed base URL
/// - JSON content type unless the request says otherwise
/// - Cookie store so the server-set session cookie is sent automatically
/// - Non-2xx responses reject with their status, headers and body
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    base_url: Url,
    credentials: CredentialPolicy,
}

impl HttpTransport {
    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut default_headers = config.default_headers;
        default_headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));

        let mut builder = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .default_headers(default_headers)
            .cookie_store(config.credentials.includes_credentials());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url,
            credentials: config.credentials,
        })
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }

    /// The credential policy this transport was built with
    pub fn credentials(&self) -> CredentialPolicy {
        self.credentials
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.resolve(&request.path)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            body_size = request.body.len(),
            "Dispatching console request"
        );

        let mut req = self.client.request(request.method.clone(), url);

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req = match request.body {
            RequestBody::Empty => req.headers(request.headers),
            RequestBody::Json(bytes) => req.headers(request.headers).body(bytes),
            RequestBody::Multipart(form) => {
                // reqwest writes the boundary-bearing content type itself
                let mut headers = request.headers;
                headers.remove(CONTENT_TYPE);
                req.headers(headers).multipart(form.into_reqwest()?)
            }
        };

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                status,
                headers,
                body,
            });
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Absolute base URL, see [`resolve_base_url`]
    pub base_url: Url,

    /// Default request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Cookie handling
    pub credentials: CredentialPolicy,

    /// Headers sent with every request unless overridden per call
    pub default_headers: HeaderMap,
}

impl HttpTransportConfig {
    /// Configuration with defaults for the given base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            credentials: CredentialPolicy::Include,
            default_headers: HeaderMap::new(),
        }
    }
}
