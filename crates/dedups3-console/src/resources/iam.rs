//! Users, groups, roles, policies and access keys
//!
//! Reads and deletes take query parameters (usually `name`); creates and
//! updates take a JSON body shaped by the caller.

use super::{Endpoint, Resource};
use crate::client::Client;
use crate::envelope::Envelope;
use crate::http::{CallConfig, Params, Verb};
use serde::Serialize;

/// `GET /user/info`
pub const USER_INFO: Endpoint = Endpoint::new(Verb::Get, "/user/info", "Error fetching user");
/// `GET /user/list`
pub const LIST_USERS: Endpoint = Endpoint::new(Verb::Get, "/user/list", "Error listing users");
/// `POST /user/create`
pub const CREATE_USER: Endpoint = Endpoint::new(Verb::Post, "/user/create", "Error creating user");
/// `POST /user/update`
pub const UPDATE_USER: Endpoint = Endpoint::new(Verb::Post, "/user/update", "Error updating user");
/// `DELETE /user/delete`
pub const DELETE_USER: Endpoint = Endpoint::new(Verb::Delete, "/user/delete", "Error deleting user");

/// `GET /group/list`
pub const LIST_GROUPS: Endpoint = Endpoint::new(Verb::Get, "/group/list", "Error listing groups");
/// `GET /group/get`
pub const GET_GROUP: Endpoint = Endpoint::new(Verb::Get, "/group/get", "Error fetching group");
/// `POST /group/create`
pub const CREATE_GROUP: Endpoint = Endpoint::new(Verb::Post, "/group/create", "Error creating group");
/// `POST /group/update`
pub const UPDATE_GROUP: Endpoint = Endpoint::new(Verb::Post, "/group/update", "Error updating group");
/// `DELETE /group/delete`
pub const DELETE_GROUP: Endpoint = Endpoint::new(Verb::Delete, "/group/delete", "Error deleting group");

/// `GET /role/list`
pub const LIST_ROLES: Endpoint = Endpoint::new(Verb::Get, "/role/list", "Error listing roles");
/// `GET /role/get`
pub const GET_ROLE: Endpoint = Endpoint::new(Verb::Get, "/role/get", "Error fetching role");
/// `POST /role/create`
pub const CREATE_ROLE: Endpoint = Endpoint::new(Verb::Post, "/role/create", "Error creating role");
/// `POST /role/update`
pub const UPDATE_ROLE: Endpoint = Endpoint::new(Verb::Post, "/role/update", "Error updating role");
/// `DELETE /role/delete`
pub const DELETE_ROLE: Endpoint = Endpoint::new(Verb::Delete, "/role/delete", "Error deleting role");

/// `GET /policy/list`
pub const LIST_POLICIES: Endpoint = Endpoint::new(Verb::Get, "/policy/list", "Error listing policies");
/// `GET /policy/get`
pub const GET_POLICY: Endpoint = Endpoint::new(Verb::Get, "/policy/get", "Error fetching policy");
/// `POST /policy/create`
pub const CREATE_POLICY: Endpoint = Endpoint::new(Verb::Post, "/policy/create", "Error creating policy");
/// `POST /policy/update`
pub const UPDATE_POLICY: Endpoint = Endpoint::new(Verb::Post, "/policy/update", "Error updating policy");
/// `DELETE /policy/delete`
pub const DELETE_POLICY: Endpoint = Endpoint::new(Verb::Delete, "/policy/delete", "Error deleting policy");

/// `GET /accesskey/list`
pub const LIST_ACCESS_KEYS: Endpoint = Endpoint::new(Verb::Get, "/accesskey/list", "Error listing access keys");
/// `POST /accesskey/create`
pub const CREATE_ACCESS_KEY: Endpoint =
    Endpoint::new(Verb::Post, "/accesskey/create", "Error creating access key");
/// `POST /accesskey/update`
pub const UPDATE_ACCESS_KEY: Endpoint =
    Endpoint::new(Verb::Post, "/accesskey/update", "Error updating access key");
/// `DELETE /accesskey/delete`
pub const DELETE_ACCESS_KEY: Endpoint =
    Endpoint::new(Verb::Delete, "/accesskey/delete", "Error deleting access key");

/// Groups, roles and policies share one route shape.
macro_rules! named_resource {
    ($(#[$doc:meta])* $name:ident, $list:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            client: Client,
        }

        impl $name {
            pub(crate) fn new(client: Client) -> Self {
                Self { client }
            }

            /// List all entries.
            pub async fn list(&self, params: Option<&Params>) -> Envelope {
                self.client.query_op(&$list).call(params, CallConfig::default()).await
            }

            /// Fetch one entry by name.
            pub async fn get(&self, name: &str) -> Envelope {
                let params = Params::new().set("name", name);
                self.client.query_op(&$get).call(Some(&params), CallConfig::default()).await
            }

            /// Create an entry.
            pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
                self.client.body_op(&$create).call(body, CallConfig::default()).await
            }

            /// Update an entry.
            pub async fn update<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
                self.client.body_op(&$update).call(body, CallConfig::default()).await
            }

            /// Delete an entry by name.
            pub async fn delete(&self, name: &str) -> Envelope {
                let params = Params::new().set("name", name);
                self.client.query_op(&$delete).call(Some(&params), CallConfig::default()).await
            }
        }

        impl Resource for $name {
            fn client(&self) -> &Client {
                &self.client
            }
        }
    };
}

named_resource!(
    /// IAM groups.
    Groups, LIST_GROUPS, GET_GROUP, CREATE_GROUP, UPDATE_GROUP, DELETE_GROUP
);
named_resource!(
    /// IAM roles.
    Roles, LIST_ROLES, GET_ROLE, CREATE_ROLE, UPDATE_ROLE, DELETE_ROLE
);
named_resource!(
    /// IAM policies.
    Policies, LIST_POLICIES, GET_POLICY, CREATE_POLICY, UPDATE_POLICY, DELETE_POLICY
);

/// IAM users.
#[derive(Clone)]
pub struct Users {
    client: Client,
}

impl Users {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// The signed-in user, or the user named by `params`.
    pub async fn info(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&USER_INFO).call(params, CallConfig::default()).await
    }

    /// List users.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_USERS).call(params, CallConfig::default()).await
    }

    /// Create a user.
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&CREATE_USER).call(body, CallConfig::default()).await
    }

    /// Update a user.
    pub async fn update<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&UPDATE_USER).call(body, CallConfig::default()).await
    }

    /// Delete a user by name.
    pub async fn delete(&self, name: &str) -> Envelope {
        let params = Params::new().set("name", name);
        self.client
            .query_op(&DELETE_USER)
            .call(Some(&params), CallConfig::default())
            .await
    }
}

impl Resource for Users {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Access keys.
#[derive(Clone)]
pub struct AccessKeys {
    client: Client,
}

impl AccessKeys {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List access keys.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_ACCESS_KEYS).call(params, CallConfig::default()).await
    }

    /// Create an access key.
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&CREATE_ACCESS_KEY).call(body, CallConfig::default()).await
    }

    /// Update an access key.
    pub async fn update<T: Serialize + ?Sized>(&self, body: &T) -> Envelope {
        self.client.body_op(&UPDATE_ACCESS_KEY).call(body, CallConfig::default()).await
    }

    /// Delete an access key.
    pub async fn delete(&self, access_key_id: &str) -> Envelope {
        let params = Params::new().set("accessKeyId", access_key_id);
        self.client
            .query_op(&DELETE_ACCESS_KEY)
            .call(Some(&params), CallConfig::default())
            .await
    }
}

impl Resource for AccessKeys {
    fn client(&self) -> &Client {
        &self.client
    }
}
