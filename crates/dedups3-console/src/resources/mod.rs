//! Console API resources
//!
//! Every backend route is bound exactly once, as an [`Endpoint`] constant
//! carrying its verb, canonical path and fallback failure message. The
//! resource types group those endpoints the way the backend router does.

pub mod diagnostics;
pub mod iam;
pub mod settings;
pub mod storage;

pub use diagnostics::{Diagnostics, Logs};
pub use iam::{AccessKeys, Groups, Policies, Roles, Users};
pub use settings::{ChunkConfigs, Quotas, Storages};
pub use storage::{Buckets, CreateBucket, CreateFolder, DeleteObjects, GetObject, Objects, PutObject, Stats};

use crate::client::Client;
use crate::http::Verb;

/// One backend route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// How the route is called
    pub verb: Verb,
    /// Path relative to the API base
    pub path: &'static str,
    /// Failure message when the backend gives none
    pub fallback: &'static str,
}

impl Endpoint {
    /// Bind a route.
    pub const fn new(verb: Verb, path: &'static str, fallback: &'static str) -> Self {
        Self { verb, path, fallback }
    }
}

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &Client;
}

/// Every route the console calls, session routes excluded.
pub const ENDPOINTS: &[Endpoint] = &[
    storage::STATS,
    storage::LIST_BUCKETS,
    storage::CREATE_BUCKET,
    storage::DELETE_BUCKET,
    storage::LIST_OBJECTS,
    storage::CREATE_FOLDER,
    storage::PUT_OBJECT,
    storage::DELETE_OBJECTS,
    storage::GET_OBJECT,
    iam::USER_INFO,
    iam::LIST_USERS,
    iam::CREATE_USER,
    iam::UPDATE_USER,
    iam::DELETE_USER,
    iam::LIST_GROUPS,
    iam::GET_GROUP,
    iam::CREATE_GROUP,
    iam::UPDATE_GROUP,
    iam::DELETE_GROUP,
    iam::LIST_ROLES,
    iam::GET_ROLE,
    iam::CREATE_ROLE,
    iam::UPDATE_ROLE,
    iam::DELETE_ROLE,
    iam::LIST_POLICIES,
    iam::GET_POLICY,
    iam::CREATE_POLICY,
    iam::UPDATE_POLICY,
    iam::DELETE_POLICY,
    iam::LIST_ACCESS_KEYS,
    iam::CREATE_ACCESS_KEY,
    iam::UPDATE_ACCESS_KEY,
    iam::DELETE_ACCESS_KEY,
    settings::LIST_QUOTAS,
    settings::CREATE_QUOTA,
    settings::UPDATE_QUOTA,
    settings::DELETE_QUOTA,
    settings::LIST_CHUNK_CONFIGS,
    settings::GET_CHUNK_CONFIG,
    settings::UPDATE_CHUNK_CONFIG,
    settings::LIST_STORAGES,
    settings::CREATE_STORAGE,
    settings::TEST_STORAGE,
    settings::DELETE_STORAGE,
    diagnostics::DEBUG_OBJECT,
    diagnostics::DEBUG_BLOCK,
    diagnostics::DEBUG_CHUNK,
    diagnostics::LIST_AUDIT,
    diagnostics::LIST_EVENTS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(storage::STATS, Verb::Get, "/stats", "Error fetching stats")]
    #[case(storage::LIST_BUCKETS, Verb::Get, "/bucket/list", "Error listing buckets")]
    #[case(storage::CREATE_BUCKET, Verb::Put, "/bucket/create", "Error creating bucket")]
    #[case(storage::DELETE_BUCKET, Verb::Delete, "/bucket/delete", "Error deleting bucket")]
    #[case(storage::LIST_OBJECTS, Verb::Get, "/bucket/objects", "Error listing objects")]
    #[case(storage::CREATE_FOLDER, Verb::Put, "/bucket/folder", "Error creating folder")]
    #[case(storage::PUT_OBJECT, Verb::Upload, "/bucket/putobject", "Failed to put object")]
    #[case(storage::DELETE_OBJECTS, Verb::Post, "/bucket/deleteobject", "Failed to delete object")]
    #[case(storage::GET_OBJECT, Verb::Download, "/bucket/getobject", "Failed to download file")]
    fn test_storage_endpoints(
        #[case] endpoint: Endpoint,
        #[case] verb: Verb,
        #[case] path: &str,
        #[case] fallback: &str,
    ) {
        assert_eq!(endpoint.verb, verb);
        assert_eq!(endpoint.path, path);
        assert_eq!(endpoint.fallback, fallback);
    }

    #[rstest]
    #[case(iam::DELETE_USER, Verb::Delete, "/user/delete")]
    #[case(iam::GET_ROLE, Verb::Get, "/role/get")]
    #[case(iam::UPDATE_POLICY, Verb::Post, "/policy/update")]
    #[case(iam::CREATE_ACCESS_KEY, Verb::Post, "/accesskey/create")]
    #[case(settings::DELETE_QUOTA, Verb::Delete, "/config/deletequota")]
    #[case(settings::UPDATE_CHUNK_CONFIG, Verb::Post, "/config/updatechunkcfg")]
    #[case(settings::TEST_STORAGE, Verb::Post, "/config/teststorage")]
    #[case(diagnostics::DEBUG_CHUNK, Verb::Get, "/debug/chunk")]
    #[case(diagnostics::LIST_EVENTS, Verb::Get, "/event/list")]
    fn test_endpoint_routes(#[case] endpoint: Endpoint, #[case] verb: Verb, #[case] path: &str) {
        assert_eq!(endpoint.verb, verb);
        assert_eq!(endpoint.path, path);
    }

    #[test]
    fn test_each_route_bound_once() {
        let paths: HashSet<_> = ENDPOINTS.iter().map(|e| e.path).collect();
        assert_eq!(paths.len(), ENDPOINTS.len());
    }

    #[test]
    fn test_every_endpoint_has_a_fallback() {
        for endpoint in ENDPOINTS {
            assert!(endpoint.path.starts_with('/'), "{endpoint:?}");
            assert!(!endpoint.fallback.trim().is_empty(), "{endpoint:?}");
        }
    }

    #[test]
    fn test_delete_routes_use_delete() {
        // Object deletion is the one POST: it takes a list of keys
        let posted: Vec<_> = ENDPOINTS
            .iter()
            .filter(|e| e.path.contains("delete") && e.verb != Verb::Delete)
            .map(|e| e.path)
            .collect();
        assert_eq!(posted, vec!["/bucket/deleteobject"]);
    }

    #[test]
    fn test_resources_share_the_client() {
        let client = Client::new().unwrap();
        let buckets = client.buckets();
        let users = client.users();
        assert_eq!(buckets.client().base_url(), users.client().base_url());
        assert_eq!(client.quotas().client().base_url().path(), "/api/");
    }
}
