//! Verb wrappers bound to one path and one fallback message
//!
//! Obtained from the [`Client`] factories (`get`, `post`, `put`, `delete`,
//! `upload`). Every `call` resolves to an [`Envelope`]; nothing here returns
//! an error.

use crate::client::Client;
use crate::envelope::{Envelope, GENERIC_FAILURE, fallback_or};
use crate::http::{CallConfig, Params, Verb};
use dedups3_console_transport::{HttpRequest, MultipartForm, RequestBody};
use http::HeaderValue;
use http::header::CONTENT_TYPE;
use serde::Serialize;

/// Fallback used when an upload was bound without one.
pub const UPLOAD_FAILED: &str = "File upload failed";

/// A GET or DELETE; parameters travel in the query string.
#[derive(Clone)]
pub struct QueryOp {
    client: Client,
    verb: Verb,
    path: String,
    fallback: String,
}

impl QueryOp {
    pub(crate) fn new(client: Client, verb: Verb, path: impl Into<String>, fallback: impl Into<String>) -> Self {
        debug_assert!(matches!(verb, Verb::Get | Verb::Delete));
        Self {
            client,
            verb,
            path: path.into(),
            fallback: fallback.into(),
        }
    }

    /// Bound verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Bound path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fallback failure message.
    pub fn fallback(&self) -> &str {
        fallback_or(&self.fallback, GENERIC_FAILURE)
    }

    /// Perform the call. Absent parameters are dropped; no parameters
    /// leave the path as bound.
    pub async fn call(&self, params: Option<&Params>, config: CallConfig) -> Envelope {
        let path = match params {
            Some(params) => params.append_to(&self.path),
            None => self.path.clone(),
        };
        let request = config.apply(HttpRequest::new(self.verb.method(), path));
        self.client.execute(self.verb, request, self.fallback()).await
    }
}

/// A POST or PUT; the payload is sent verbatim as the JSON body.
#[derive(Clone)]
pub struct BodyOp {
    client: Client,
    verb: Verb,
    path: String,
    fallback: String,
}

impl BodyOp {
    pub(crate) fn new(client: Client, verb: Verb, path: impl Into<String>, fallback: impl Into<String>) -> Self {
        debug_assert!(matches!(verb, Verb::Post | Verb::Put));
        Self {
            client,
            verb,
            path: path.into(),
            fallback: fallback.into(),
        }
    }

    /// Bound verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Bound path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fallback failure message.
    pub fn fallback(&self) -> &str {
        fallback_or(&self.fallback, GENERIC_FAILURE)
    }

    /// Perform the call.
    pub async fn call<T: Serialize + ?Sized>(&self, body: &T, config: CallConfig) -> Envelope {
        let request = match HttpRequest::new(self.verb.method(), self.path.as_str()).with_json(body) {
            Ok(request) => config.apply(request),
            Err(error) => {
                tracing::warn!(verb = %self.verb, path = %self.path, error = %error, "Could not encode request body");
                return Envelope::failure(self.fallback());
            }
        };
        self.client.execute(self.verb, request, self.fallback()).await
    }
}

/// A multipart upload.
#[derive(Clone)]
pub struct UploadOp {
    client: Client,
    path: String,
    fallback: String,
}

impl UploadOp {
    pub(crate) fn new(client: Client, path: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            fallback: fallback.into(),
        }
    }

    /// Bound path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fallback failure message.
    pub fn fallback(&self) -> &str {
        fallback_or(&self.fallback, UPLOAD_FAILED)
    }

    /// Upload `form`. The content type is forced to multipart; caller
    /// headers are merged on top.
    pub async fn call(&self, form: MultipartForm, config: CallConfig) -> Envelope {
        let request = HttpRequest::post(self.path.as_str())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"))
            .with_body(RequestBody::Multipart(form));
        self.client
            .execute(Verb::Upload, config.apply(request), self.fallback())
            .await
    }
}
