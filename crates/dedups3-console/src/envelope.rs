//! The uniform result every console operation resolves to

use dedups3_console_transport::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used when neither the backend nor the caller supplied one.
pub const GENERIC_FAILURE: &str = "Request failed";

/// `{success, message, data?}` as every wrapper returns it.
///
/// Failure envelopes built by this crate always carry a non-empty message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the operation succeeded
    pub success: bool,

    /// Human-readable outcome
    #[serde(default)]
    pub message: String,

    /// Optional payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// A successful envelope.
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// A failed envelope. An empty message is replaced by [`GENERIC_FAILURE`].
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: if message.trim().is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                message
            },
            data: None,
        }
    }

    /// Read a 2xx body as the backend sent it.
    ///
    /// - a JSON object carrying a boolean `success` keeps its own fields;
    /// - the backend's native `{code, msg, data}` shape reads `code == 0` as success;
    /// - any other JSON value, or non-JSON text, becomes `data` of a success.
    ///
    /// A body that reports failure without any message gets `fallback`.
    pub fn from_success_body(body: &[u8], fallback: &str) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::success("", None);
        }

        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(_) => {
                return Self::success("", Some(Value::String(String::from_utf8_lossy(body).into_owned())));
            }
        };

        let object = match value {
            Value::Object(object) => object,
            other => return Self::success("", Some(other)),
        };

        let success = match (object.get("success"), object.get("code")) {
            (Some(Value::Bool(success)), _) => *success,
            (_, Some(code)) => code.as_i64() == Some(0),
            _ => return Self::success("", Some(Value::Object(object))),
        };

        let data = object.get("data").cloned().filter(|d| !d.is_null());

        if success {
            let message = message_field(&object, &["message", "msg"]).unwrap_or_default();
            Self::success(message, data)
        } else {
            // failures resolve like rejections: msg first
            let message = message_field(&object, &["msg", "message"]).unwrap_or_else(|| fallback.to_string());
            let mut failure = Self::failure(message);
            failure.data = data;
            failure
        }
    }

    /// Decode `data` into a typed payload.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|data| serde_json::from_value(data.clone()).ok())
    }

    /// The download outcome carried by a successful download envelope.
    pub fn download_outcome(&self) -> Option<DownloadOutcome> {
        if !self.success {
            return None;
        }
        self.data_as()
    }
}

/// What a successful download handed to the file sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    /// Whether the file was handed off
    pub saved: bool,
    /// Resolved file name
    pub filename: String,
    /// Content type reported by the server
    pub content_type: String,
}

/// Pick the failure message out of a backend error body.
///
/// Order: `msg`, then `message`, then `fallback`. Empty strings don't count.
pub fn resolve_message(body: Option<&[u8]>, fallback: &str) -> String {
    body.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
        .and_then(|value| match value {
            Value::Object(object) => message_field(&object, &["msg", "message"]),
            _ => None,
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// Failure message for a rejected call: body-derived when a response
/// arrived, otherwise the fallback.
pub fn failure_message(error: &TransportError, fallback: &str) -> String {
    match error {
        TransportError::Status { body, .. } => resolve_message(Some(body), fallback),
        _ => fallback.to_string(),
    }
}

/// `fallback` unless it is blank, in which case `default`.
pub(crate) fn fallback_or<'a>(fallback: &'a str, default: &'a str) -> &'a str {
    if fallback.trim().is_empty() { default } else { fallback }
}

fn message_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
