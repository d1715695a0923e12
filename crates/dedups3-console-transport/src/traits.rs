//! Transport trait and request/response types
//!
//! Defines the `Transport` trait the console client sends through, plus the
//! request descriptor and response types that cross that seam.

use crate::error::{Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// A request to send beneath the base URL
///
/// Represents one call to the console API. The path is relative to the
/// transport's base URL and may carry a query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the API base, e.g. `/bucket/list?prefix=a`
    pub path: String,

    /// Request headers, applied on top of the transport defaults
    pub headers: HeaderMap,

    /// Request body
    pub body: RequestBody,

    /// Per-call timeout override
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a header to the request, replacing any previous value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merge headers into the request; later values win
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON request body
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.with_body(RequestBody::Json(Bytes::from(bytes))))
    }

    /// Set a per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Body of an [`HttpRequest`]
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,

    /// Pre-serialized JSON
    Json(Bytes),

    /// multipart/form-data payload
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Approximate payload size in bytes, for logging
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Json(bytes) => bytes.len(),
            Self::Multipart(form) => form.len(),
        }
    }

    /// Whether the body carries no payload
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A multipart form that can be cloned and inspected before sending.
///
/// Converted into a `reqwest` form only when the HTTP transport sends it.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

/// One field of a [`MultipartForm`]
#[derive(Debug, Clone)]
pub struct Part {
    /// Field name
    pub name: String,
    /// Field payload
    pub kind: PartKind,
}

/// Payload of a multipart field
#[derive(Debug, Clone)]
pub enum PartKind {
    /// Plain text value
    Text(String),
    /// File upload
    File {
        /// File name reported to the server
        filename: String,
        /// Optional MIME type of the file
        content_type: Option<String>,
        /// File contents
        bytes: Bytes,
    },
}

impl MultipartForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            kind: PartKind::Text(value.into()),
        });
        self
    }

    /// Add a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            kind: PartKind::File {
                filename: filename.into(),
                content_type,
                bytes: bytes.into(),
            },
        });
        self
    }

    /// Fields in insertion order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Total payload size of all fields
    pub fn len(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match &part.kind {
                PartKind::Text(value) => value.len(),
                PartKind::File { bytes, .. } => bytes.len(),
            })
            .sum()
    }

    /// Whether the form has no fields
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part.kind {
                PartKind::Text(value) => form.text(part.name, value),
                PartKind::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename);
                    if let Some(mime) = content_type {
                        file = file
                            .mime_str(&mime)
                            .map_err(|e| TransportError::Http(e.to_string()))?;
                    }
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }
}

/// HTTP response
///
/// A 2xx response received from the server. Non-2xx responses never reach
/// callers as an `HttpResponse`; they reject with [`TransportError::Status`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(TransportError::from)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// The seam between the console client and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request.
    ///
    /// Resolves with the response on 2xx; rejects with
    /// [`TransportError::Status`] on any other status, or with a network
    /// error when no response arrives.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// The base URL every request path is resolved against.
    fn base_url(&self) -> &Url;
}
