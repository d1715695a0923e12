//! HTTP transport for the dedups3 admin console API
//!
//! Provides the single configured HTTP client every console call goes
//! through. Configuration is fixed at construction: a base URL resolved
//! against the serving origin, a JSON content type by default, and a cookie
//! store so a server-set session cookie rides along on every request.
//!
//! # Architecture
//!
//! - **Transport trait**: the seam the console client talks to
//! - **HTTP transport**: reqwest-backed implementation with a cookie store
//! - **Error handling**: non-2xx responses reject with their status and body

#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! # Usage
//!
//! ```ignore
//! use dedups3_console_transport::{HttpRequest, HttpTransport, HttpTransportConfig, Transport};
//!
//! let base = dedups3_console_transport::resolve_base_url("https://console.example.com", "/api")?;
//! let transport = HttpTransport::with_config(HttpTransportConfig::new(base))?;
//! let response = transport.send(HttpRequest::get("/stats")).await?;
//! ```

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{CredentialPolicy, HttpTransport, HttpTransportConfig, resolve_base_url};
pub use traits::{HttpRequest, HttpResponse, MultipartForm, Part, PartKind, RequestBody, Transport};
