//! Quotas, chunking configuration and storage backends

use super::{Endpoint, Resource};
use crate::client::Client;
use crate::envelope::Envelope;
use crate::http::{CallConfig, Params, Verb};
use serde::Serialize;

/// `GET /config/listquota`
pub const LIST_QUOTAS: Endpoint = Endpoint::new(Verb::Get, "/config/listquota", "Error listing quotas");
/// `POST /config/createquota`
pub const CREATE_QUOTA: Endpoint = Endpoint::new(Verb::Post, "/config/createquota", "Error creating quota");
/// `POST /config/updatequota`
pub const UPDATE_QUOTA: Endpoint = Endpoint::new(Verb::Post, "/config/updatequota", "Error updating quota");
/// `DELETE /config/deletequota`
pub const DELETE_QUOTA: Endpoint = Endpoint::new(Verb::Delete, "/config/deletequota", "Error deleting quota");

/// `GET /config/listchunkcfg`
pub const LIST_CHUNK_CONFIGS: Endpoint =
    Endpoint::new(Verb::Get, "/config/listchunkcfg", "Error listing chunk configs");
/// `GET /config/getchunkcfg`
pub const GET_CHUNK_CONFIG: Endpoint =
    Endpoint::new(Verb::Get, "/config/getchunkcfg", "Error fetching chunk config");
/// `POST /config/updatechunkcfg`
pub const UPDATE_CHUNK_CONFIG: Endpoint =
    Endpoint::new(Verb::Post, "/config/updatechunkcfg", "Error updating chunk config");

/// `GET /config/liststorage`
pub const LIST_STORAGES: Endpoint = Endpoint::new(Verb::Get, "/config/liststorage", "Error listing storages");
/// `POST /config/createstorage`
pub const CREATE_STORAGE: Endpoint =
    Endpoint::new(Verb::Post, "/config/createstorage", "Error creating storage");
/// `POST /config/teststorage`
pub const TEST_STORAGE: Endpoint = Endpoint::new(Verb::Post, "/config/teststorage", "Error testing storage");
/// `DELETE /config/deletestorage`
pub const DELETE_STORAGE: Endpoint =
    Endpoint::new(Verb::Delete, "/config/deletestorage", "Error deleting storage");

/// Per-account storage quotas.
#[derive(Clone)]
pub struct Quotas {
    client: Client,
}

impl Quotas {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List quotas.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_QUOTAS).call(params, CallConfig::default()).await
    }

    /// Create a quota.
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&CREATE_QUOTA).call(body, CallConfig::default()).await
    }

    /// Update a quota.
    pub async fn update<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&UPDATE_QUOTA).call(body, CallConfig::default()).await
    }

    /// Delete the quotas matching `params`.
    pub async fn delete(&self, params: &Params) -> Envelope {
        self.client.query_op(&DELETE_QUOTA).call(Some(params), CallConfig::default()).await
    }
}

impl Resource for Quotas {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Deduplication chunking configuration.
#[derive(Clone)]
pub struct ChunkConfigs {
    client: Client,
}

impl ChunkConfigs {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List chunk configurations.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_CHUNK_CONFIGS).call(params, CallConfig::default()).await
    }

    /// Fetch the configuration selected by `params`.
    pub async fn get(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&GET_CHUNK_CONFIG).call(params, CallConfig::default()).await
    }

    /// Update a chunk configuration.
    pub async fn update<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&UPDATE_CHUNK_CONFIG).call(body, CallConfig::default()).await
    }
}

impl Resource for ChunkConfigs {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Storage backends blocks are written to.
#[derive(Clone)]
pub struct Storages {
    client: Client,
}

impl Storages {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List storages.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_STORAGES).call(params, CallConfig::default()).await
    }

    /// Register a storage.
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&CREATE_STORAGE).call(body, CallConfig::default()).await
    }

    /// Check that a storage definition is reachable before saving it.
    pub async fn test<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&TEST_STORAGE).call(body, CallConfig::default()).await
    }

    /// Remove the storages matching `params`.
    pub async fn delete(&self, params: &Params) -> Envelope {
        self.client.query_op(&DELETE_STORAGE).call(Some(params), CallConfig::default()).await
    }
}

impl Resource for Storages {
    fn client(&self) -> &Client {
        &self.client
    }
}
