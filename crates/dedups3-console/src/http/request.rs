//! Request-side building blocks shared by every verb wrapper

use crate::error::{Error, Result};
use dedups3_console_transport::HttpRequest;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// The kinds of call a wrapper can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read with query parameters
    Get,
    /// Create with a JSON body
    Post,
    /// Create/replace with a JSON body
    Put,
    /// Delete with query parameters
    Delete,
    /// Multipart upload, sent as POST
    Upload,
    /// Binary download, sent as POST
    Download,
}

impl Verb {
    /// HTTP method the verb travels as.
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post | Verb::Upload | Verb::Download => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    /// Upper-case name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Upload => "UPLOAD",
            Verb::Download => "DOWNLOAD",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query parameters. Entries without a value are kept here but
/// never reach the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    /// Empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// Add a parameter that may be absent.
    pub fn set_opt<V: Into<String>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.entries.push((key.into(), value.map(Into::into)));
        self
    }

    /// Build from a JSON object: `null` entries become absent, strings are
    /// used verbatim, other values are rendered as JSON text. Anything but
    /// an object yields no parameters.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let entries = object
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text.clone()),
                    other => Some(other.to_string()),
                };
                (key.clone(), rendered)
            })
            .collect();
        Self { entries }
    }

    /// Number of entries, present or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URL-encoded query string of the present entries, or `None` when
    /// nothing would be sent.
    pub fn query_string(&self) -> Option<String> {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (key, value) in &self.entries {
            if let Some(value) = value {
                serializer.append_pair(key, value);
                any = true;
            }
        }
        any.then(|| serializer.finish())
    }

    /// `path` with the query string appended, or `path` unchanged.
    pub fn append_to(&self, path: &str) -> String {
        match self.query_string() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Option<V>)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.map(Into::into)))
                .collect(),
        }
    }
}

/// Per-call overrides passed through to the transport.
#[derive(Debug, Clone, Default)]
pub struct CallConfig {
    /// Extra headers, applied on top of the defaults
    pub headers: HeaderMap,
    /// Timeout for this call only
    pub timeout: Option<Duration>,
}

impl CallConfig {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Try to set a header from strings.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
        let name = name
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(name.to_string()))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value.to_string()))?;
        Ok(self.header(name, value))
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Layer the overrides onto `request`. Caller headers win.
    pub(crate) fn apply(self, request: HttpRequest) -> HttpRequest {
        let request = request.with_headers(&self.headers);
        match self.timeout {
            Some(timeout) => request.with_timeout(timeout),
            None => request,
        }
    }
}
