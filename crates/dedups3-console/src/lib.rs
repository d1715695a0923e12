//! # dedups3 console client
//!
//! Client for the admin API of the dedups3 object-storage service:
//! - Uniform `{success, message, data?}` envelopes for every call
//! - Session expiry handled once, without racing concurrent requests
//! - Binary downloads saved through a pluggable file sink
//! - Storage, IAM, configuration and diagnostics endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dedups3_console::prelude::*;
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let history = Arc::new(MemoryHistory::new("/login"));
//!     let client = Client::builder()
//!         .origin("http://127.0.0.1:3002")
//!         .history(history.clone())
//!         .build()?;
//!
//!     let login = client
//!         .session()
//!         .login("admin", &SecretString::from("admin123".to_string()))
//!         .await;
//!     if !login.success {
//!         eprintln!("{}", login.message);
//!         return Ok(());
//!     }
//!
//!     history.visit("/buckets");
//!     let buckets = client.buckets().list(None).await;
//!     println!("{:?}", buckets.data);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::{ClientContext, Location, MemoryHistory, Navigator};
pub use download::{Blob, DirectorySink, DownloadOp, FileSink, MemorySink};
pub use envelope::{DownloadOutcome, Envelope};
pub use error::{Error, Result};
pub use http::{CallConfig, Params, Verb};
pub use operation::{BodyOp, QueryOp, UploadOp};
pub use preferences::{Language, Preferences, S3Credentials};
pub use session::{GuardDecision, NavigationGuard, Session};

// Module declarations
pub mod client;
pub mod config;
pub mod context;
pub mod download;
pub mod envelope;
pub mod error;
pub mod http;
pub mod observability;
pub mod operation;
pub mod preferences;
pub mod resources;
pub mod session;

// Re-export key dependencies for convenience
pub use dedups3_console_transport::{CredentialPolicy, MultipartForm, Transport, TransportError};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use dedups3_console::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CallConfig, Client, ClientConfig, Envelope, Error, GuardDecision, MemoryHistory, Params, Result,
        resources::{CreateBucket, CreateFolder, DeleteObjects, GetObject, PutObject},
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
