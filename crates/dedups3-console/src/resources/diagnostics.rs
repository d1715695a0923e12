//! Object, block and chunk inspection plus audit and event logs

use super::{Endpoint, Resource};
use crate::client::Client;
use crate::envelope::Envelope;
use crate::http::{CallConfig, Params, Verb};

/// `GET /debug/object`
pub const DEBUG_OBJECT: Endpoint = Endpoint::new(Verb::Get, "/debug/object", "Error inspecting object");
/// `GET /debug/block`
pub const DEBUG_BLOCK: Endpoint = Endpoint::new(Verb::Get, "/debug/block", "Error inspecting block");
/// `GET /debug/chunk`
pub const DEBUG_CHUNK: Endpoint = Endpoint::new(Verb::Get, "/debug/chunk", "Error inspecting chunk");
/// `GET /audit/list`
pub const LIST_AUDIT: Endpoint = Endpoint::new(Verb::Get, "/audit/list", "Error listing audit logs");
/// `GET /event/list`
pub const LIST_EVENTS: Endpoint = Endpoint::new(Verb::Get, "/event/list", "Error listing events");

/// How objects map onto deduplicated blocks and chunks.
#[derive(Clone)]
pub struct Diagnostics {
    client: Client,
}

impl Diagnostics {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Block layout of an object.
    pub async fn object(&self, params: &Params) -> Envelope {
        self.client.query_op(&DEBUG_OBJECT).call(Some(params), CallConfig::default()).await
    }

    /// Chunks and references of a block.
    pub async fn block(&self, params: &Params) -> Envelope {
        self.client.query_op(&DEBUG_BLOCK).call(Some(params), CallConfig::default()).await
    }

    /// Reference count and location of a chunk.
    pub async fn chunk(&self, params: &Params) -> Envelope {
        self.client.query_op(&DEBUG_CHUNK).call(Some(params), CallConfig::default()).await
    }
}

impl Resource for Diagnostics {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Audit and event logs.
#[derive(Clone)]
pub struct Logs {
    client: Client,
}

impl Logs {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Audit log entries.
    pub async fn audit(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_AUDIT).call(params, CallConfig::default()).await
    }

    /// Event log entries.
    pub async fn events(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_EVENTS).call(params, CallConfig::default()).await
    }
}

impl Resource for Logs {
    fn client(&self) -> &Client {
        &self.client
    }
}
