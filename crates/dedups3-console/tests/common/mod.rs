//! Common test utilities and helpers

use dedups3_console::{Client, MemoryHistory, MemorySink};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// A client wired to a mock server, with its history and download sink.
#[allow(dead_code)]
pub struct Harness {
    pub client: Client,
    pub history: Arc<MemoryHistory>,
    pub sink: Arc<MemorySink>,
}

/// Build a client against `server`, starting on page `page`.
#[allow(dead_code)]
pub fn harness(server: &MockServer, page: &str) -> Harness {
    let history = Arc::new(MemoryHistory::new(page));
    let sink = Arc::new(MemorySink::new());
    let client = Client::builder()
        .origin(server.uri())
        .base_path("/api")
        .logout_timeout(Duration::from_millis(500))
        .history(history.clone())
        .file_sink(sink.clone())
        .build()
        .expect("Failed to build client");

    Harness { client, history, sink }
}

/// Requests the server saw for `path`, oldest first.
#[allow(dead_code)]
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == path)
        .collect()
}
