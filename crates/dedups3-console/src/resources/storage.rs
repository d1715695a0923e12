//! Buckets, objects and service statistics

use super::{Endpoint, Resource};
use crate::client::Client;
use crate::envelope::Envelope;
use crate::http::{CallConfig, Params, Verb};
use bytes::Bytes;
use dedups3_console_transport::MultipartForm;
use serde::{Deserialize, Serialize};

/// `GET /stats`
pub const STATS: Endpoint = Endpoint::new(Verb::Get, "/stats", "Error fetching stats");
/// `GET /bucket/list`
pub const LIST_BUCKETS: Endpoint = Endpoint::new(Verb::Get, "/bucket/list", "Error listing buckets");
/// `PUT /bucket/create`
pub const CREATE_BUCKET: Endpoint = Endpoint::new(Verb::Put, "/bucket/create", "Error creating bucket");
/// `DELETE /bucket/delete`
pub const DELETE_BUCKET: Endpoint = Endpoint::new(Verb::Delete, "/bucket/delete", "Error deleting bucket");
/// `GET /bucket/objects`
pub const LIST_OBJECTS: Endpoint = Endpoint::new(Verb::Get, "/bucket/objects", "Error listing objects");
/// `PUT /bucket/folder`
pub const CREATE_FOLDER: Endpoint = Endpoint::new(Verb::Put, "/bucket/folder", "Error creating folder");
/// `POST /bucket/putobject` (multipart)
pub const PUT_OBJECT: Endpoint = Endpoint::new(Verb::Upload, "/bucket/putobject", "Failed to put object");
/// `POST /bucket/deleteobject`
pub const DELETE_OBJECTS: Endpoint = Endpoint::new(Verb::Post, "/bucket/deleteobject", "Failed to delete object");
/// `POST /bucket/getobject` (binary response)
pub const GET_OBJECT: Endpoint = Endpoint::new(Verb::Download, "/bucket/getobject", "Failed to download file");

/// Body of a bucket creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBucket {
    /// Bucket name
    pub name: String,
    /// Region; the server picks its default when empty
    #[serde(default)]
    pub region: String,
}

/// Body of a folder creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Bucket the folder is created in
    pub bucket: String,
    /// Folder path
    pub folder: String,
}

/// Body of an object deletion. Keys ending in `/` remove whole folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObjects {
    /// Bucket holding the objects
    pub bucket: String,
    /// Object keys or folder paths
    pub keys: Vec<String>,
}

/// Body of an object download. Several files come back as one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetObject {
    /// Bucket holding the files
    pub bucket: String,
    /// Object keys
    pub files: Vec<String>,
    /// Name to save under when the response doesn't name the file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
}

/// One object to upload.
#[derive(Debug, Clone)]
pub struct PutObject {
    /// Target bucket
    pub bucket: String,
    /// Object key
    pub object: String,
    /// Content type to store; guessed by the server when absent
    pub content_type: Option<String>,
    /// File name sent with the part
    pub filename: String,
    /// File contents
    pub contents: Bytes,
}

impl PutObject {
    /// The multipart form the upload route expects.
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("bucket", self.bucket)
            .text("object", self.object);
        if let Some(content_type) = &self.content_type {
            form = form.text("contentType", content_type.clone());
        }
        form.file("file", self.filename, self.content_type, self.contents)
    }
}

/// Service-wide statistics.
#[derive(Clone)]
pub struct Stats {
    client: Client,
}

impl Stats {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the statistics.
    pub async fn get(&self) -> Envelope {
        self.client.query_op(&STATS).call(None, CallConfig::default()).await
    }
}

impl Resource for Stats {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Buckets.
#[derive(Clone)]
pub struct Buckets {
    client: Client,
}

impl Buckets {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List buckets.
    pub async fn list(&self, params: Option<&Params>) -> Envelope {
        self.client.query_op(&LIST_BUCKETS).call(params, CallConfig::default()).await
    }

    /// Create a bucket.
    pub async fn create(&self, bucket: &CreateBucket) -> Envelope {
        self.client.body_op(&CREATE_BUCKET).call(bucket, CallConfig::default()).await
    }

    /// Delete a bucket.
    pub async fn delete(&self, name: &str) -> Envelope {
        let params = Params::new().set("name", name);
        self.client
            .query_op(&DELETE_BUCKET)
            .call(Some(&params), CallConfig::default())
            .await
    }
}

impl Resource for Buckets {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// Objects and folders.
#[derive(Clone)]
pub struct Objects {
    client: Client,
}

impl Objects {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List objects; `params` carries the bucket, prefix and paging marker.
    pub async fn list(&self, params: &Params) -> Envelope {
        self.client.query_op(&LIST_OBJECTS).call(Some(params), CallConfig::default()).await
    }

    /// Create a folder.
    pub async fn create_folder(&self, folder: &CreateFolder) -> Envelope {
        self.client.body_op(&CREATE_FOLDER).call(folder, CallConfig::default()).await
    }

    /// Upload one object.
    pub async fn put(&self, object: PutObject) -> Envelope {
        self.put_form(object.into_form(), CallConfig::default()).await
    }

    /// Upload a prepared form.
    pub async fn put_form(&self, form: MultipartForm, config: CallConfig) -> Envelope {
        self.client
            .upload(PUT_OBJECT.path, PUT_OBJECT.fallback)
            .call(form, config)
            .await
    }

    /// Delete objects or folders.
    pub async fn delete(&self, request: &DeleteObjects) -> Envelope {
        self.client.body_op(&DELETE_OBJECTS).call(request, CallConfig::default()).await
    }

    /// Download objects through the client's file sink.
    pub async fn get(&self, request: &GetObject) -> Envelope {
        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(error = %error, "Could not encode download request");
                return Envelope::failure(GET_OBJECT.fallback);
            }
        };
        self.client
            .download(GET_OBJECT.path, GET_OBJECT.fallback)
            .call(&body, CallConfig::default())
            .await
    }
}

impl Resource for Objects {
    fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedups3_console_transport::PartKind;
    use serde_json::json;

    #[test]
    fn test_put_object_form_fields() {
        let form = PutObject {
            bucket: "photos".to_string(),
            object: "2024/cat.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            filename: "cat.jpg".to_string(),
            contents: Bytes::from_static(b"\xff\xd8"),
        }
        .into_form();

        let names: Vec<_> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bucket", "object", "contentType", "file"]);
        assert!(matches!(form.parts()[3].kind, PartKind::File { .. }));
    }

    #[test]
    fn test_put_object_without_content_type() {
        let form = PutObject {
            bucket: "b".to_string(),
            object: "k".to_string(),
            content_type: None,
            filename: "k".to_string(),
            contents: Bytes::new(),
        }
        .into_form();

        assert_eq!(form.parts().len(), 3);
    }

    #[test]
    fn test_get_object_body() {
        let body = serde_json::to_value(GetObject {
            bucket: "photos".to_string(),
            files: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            filename: String::new(),
        })
        .unwrap();

        assert_eq!(body, json!({"bucket": "photos", "files": ["a.jpg", "b.jpg"]}));
    }
}
