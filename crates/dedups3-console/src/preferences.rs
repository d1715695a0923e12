//! Settings the console keeps on the client side
//!
//! The UI language and the credentials used by the direct S3 client live
//! in one JSON file. The API wrappers never read them.

use crate::error::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Region assumed when none is stored.
pub const DEFAULT_REGION: &str = "us-east-1";

#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese
    #[default]
    Zh,
    /// English
    En,
}

/// Credentials for talking to the S3 endpoint directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// Access key id
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key
    #[serde(serialize_with = "expose_secret")]
    pub secret_access_key: SecretString,

    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint, e.g. `http://127.0.0.1:3000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl S3Credentials {
    /// Credentials for `access_key_id` in the default region.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }

    /// Whether an access key is set at all.
    pub fn is_configured(&self) -> bool {
        !self.access_key_id.trim().is_empty()
    }

    /// Custom endpoints are addressed path-style (`endpoint/bucket/key`).
    pub fn requires_path_style(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Everything stored in the preferences file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// UI language
    #[serde(default)]
    pub language: Language,

    /// Direct S3 credentials
    #[serde(rename = "s3-credentials", default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Credentials>,
}

impl Preferences {
    /// `<config dir>/dedups3-console/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dedups3-console").join("preferences.json"))
    }

    /// Read preferences from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Write preferences to `path`, creating parent directories.
    ///
    /// The file holds the S3 secret in clear text, so on Unix it is readable
    /// by the owner only, including when it already existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(self)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(OWNER_ONLY);
        }
        let mut file = options.open(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY))?;
        }
        file.write_all(&contents)?;
        file.sync_all()?;
        Ok(())
    }

    /// Stored credentials, if usable.
    pub fn s3_credentials(&self) -> Option<&S3Credentials> {
        self.s3.as_ref().filter(|creds| creds.is_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let prefs: Preferences = serde_json::from_value(json!({})).unwrap();
        assert_eq!(prefs.language, Language::Zh);
        assert!(prefs.s3_credentials().is_none());
    }

    #[test]
    fn test_stored_shape() {
        let prefs: Preferences = serde_json::from_value(json!({
            "language": "en",
            "s3-credentials": {
                "accessKeyId": "AKIA123",
                "secretAccessKey": "s3cr3t",
                "endpoint": "http://127.0.0.1:3000"
            }
        }))
        .unwrap();

        let creds = prefs.s3_credentials().unwrap();
        assert_eq!(prefs.language, Language::En);
        assert_eq!(creds.region, DEFAULT_REGION);
        assert_eq!(creds.secret_access_key.expose_secret(), "s3cr3t");
        assert!(creds.requires_path_style());
    }

    #[test]
    fn test_unconfigured_credentials_are_ignored() {
        let prefs = Preferences {
            language: Language::Zh,
            s3: Some(S3Credentials::new("  ", "x")),
        };
        assert!(prefs.s3_credentials().is_none());
        assert!(!S3Credentials::new("AKIA", "x").requires_path_style());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = S3Credentials::new("AKIA123", "s3cr3t");
        assert!(!format!("{creds:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let prefs = Preferences {
            language: Language::En,
            s3: Some(S3Credentials::new("AKIA123", "s3cr3t")),
        };
        prefs.save(&path).unwrap();

        let stored: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored["s3-credentials"]["secretAccessKey"], "s3cr3t");

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded.language, Language::En);
        assert_eq!(loaded.s3_credentials().unwrap().access_key_id, "AKIA123");
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let prefs = Preferences {
            language: Language::En,
            s3: Some(S3Credentials::new("AKIA123", "s3cr3t")),
        };
        prefs.save(&path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o600);

        let fresh = dir.path().join("fresh").join("preferences.json");
        prefs.save(&fresh).unwrap();
        assert_eq!(std::fs::metadata(&fresh).unwrap().permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(prefs.language, Language::Zh);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Preferences::load(&path), Err(crate::Error::Serialization(_))));
    }
}
