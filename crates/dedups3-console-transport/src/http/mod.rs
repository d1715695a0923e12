//! HTTP transport implementation
//!
//! Provides the reqwest-backed client that implements the Transport trait.
//! Handles base URL resolution, default headers and the session cookie store.

pub mod client;

pub use client::{CredentialPolicy, HttpTransport, HttpTransportConfig, resolve_base_url};
