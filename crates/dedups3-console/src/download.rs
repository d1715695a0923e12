//! Binary downloads
//!
//! A download is a POST whose 2xx response is either a file or an error
//! disguised as one: the backend reports failures on this channel with a
//! JSON or plain-text body. Files are handed to a [`FileSink`] and the call
//! resolves as soon as the sink has them.

use crate::client::Client;
use crate::envelope::{DownloadOutcome, Envelope, failure_message, fallback_or, resolve_message};
use crate::http::{CallConfig, Verb};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use async_trait::async_trait;
use bytes::Bytes;
use dedups3_console_transport::{HttpRequest, HttpResponse};
use regex::Regex;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

/// Name used when neither the response nor the caller names the file.
pub const DEFAULT_FILENAME: &str = "download.zip";

/// Message of the success envelope.
pub const DOWNLOAD_STARTED: &str = "Download started";

/// Fallback used when a download was bound without one.
pub const DOWNLOAD_FAILED: &str = "Download failed";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// RFC 5987 `filename*=charset'lang'value`; the backend also sends a bare
// query-escaped value
static EXTENDED_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*\s*=\s*"?([^;"\s]+)"#).expect("Failed to compile extended filename regex")
});

static PLAIN_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|'([^']*)'|([^;\s]+))"#)
        .expect("Failed to compile filename regex")
});

/// Whether a 2xx download response actually carries an error message.
pub fn is_error_payload(content_type: Option<&str>) -> bool {
    content_type
        .map(str::to_ascii_lowercase)
        .is_some_and(|ct| ct.contains("application/json") || ct.contains("text/plain"))
}

/// File name carried by a `Content-Disposition` header, if any.
///
/// `filename*=` wins over `filename=`. Its value is percent-decoded. The
/// `charset'lang'` prefix is optional; without it `+` reads as a space.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let extended = EXTENDED_FILENAME
        .captures(header)
        .and_then(|caps| caps.get(1))
        .and_then(|encoded| decode_extended(encoded.as_str()));

    let plain = || {
        PLAIN_FILENAME.captures(header).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string())
        })
    };

    extended
        .filter(|name| !name.is_empty())
        .or_else(plain)
        .filter(|name| !name.is_empty())
}

fn decode_extended(raw: &str) -> Option<String> {
    // `+` is a space only in the bare query-escaped form
    let value = match raw.splitn(3, '\'').nth(2) {
        Some(value) => value.to_string(),
        None => raw.replace('+', " "),
    };
    urlencoding::decode(&value).ok().map(|decoded| decoded.trim().to_string())
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c <= '\u{1f}' => '_',
            c => c,
        })
        .collect()
}

/// Header name, then the sanitized caller name, then [`DEFAULT_FILENAME`].
pub fn resolve_filename(disposition: Option<&str>, requested: Option<&str>) -> String {
    disposition
        .and_then(filename_from_disposition)
        .or_else(|| {
            requested
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(sanitize_filename)
        })
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Downloaded bytes with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// File contents
    pub bytes: Bytes,
    /// Content type reported by the server
    pub content_type: String,
}

/// Where downloaded files end up.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Store `blob` under `filename`.
    async fn save(&self, filename: &str, blob: Blob) -> io::Result<()>;
}

/// Saves files into a directory.
///
/// Only the last path component of a file name is used. Each save writes
/// its own hidden `.part` file and renames it into place, so concurrent
/// saves of one name never share a temporary file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Save into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `filename` would be saved.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(final_component(filename))
    }
}

fn final_component(filename: &str) -> &str {
    match filename.rsplit(['/', '\\']).next().map(str::trim) {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => DEFAULT_FILENAME,
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;

    // unique per save; removed on drop unless persisted
    let mut partial = tempfile::Builder::new()
        .prefix(".")
        .suffix(".part")
        .tempfile_in(dir)?;
    partial.write_all(bytes)?;
    partial.as_file().sync_all()?;
    partial.persist(target)?;
    Ok(())
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, filename: &str, blob: Blob) -> io::Result<()> {
        let dir = self.dir.clone();
        let target = self.path_for(filename);
        let size = blob.bytes.len();

        let path = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &blob.bytes))
            .await
            .map_err(io::Error::other)??;

        tracing::debug!(path = %target.display(), bytes = size, "Saved download");
        Ok(())
    }
}

/// Keeps saved files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Blob)>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every saved file, oldest first.
    pub fn files(&self) -> Vec<(String, Blob)> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Most recent file saved under `filename`.
    pub fn get(&self, filename: &str) -> Option<Blob> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(name, _)| name == filename)
            .map(|(_, blob)| blob.clone())
    }
}

#[async_trait]
impl FileSink for MemorySink {
    async fn save(&self, filename: &str, blob: Blob) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((filename.to_string(), blob));
        Ok(())
    }
}

/// A bound download operation.
#[derive(Clone)]
pub struct DownloadOp {
    client: Client,
    path: String,
    fallback: String,
}

impl DownloadOp {
    pub(crate) fn new(client: Client, path: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            fallback: fallback.into(),
        }
    }

    /// Bound path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fallback failure message.
    pub fn fallback(&self) -> &str {
        fallback_or(&self.fallback, DOWNLOAD_FAILED)
    }

    /// Request the file. `params` is sent as the JSON body; its `filename`
    /// field names the file when the response doesn't.
    pub async fn call(&self, params: &Value, config: CallConfig) -> Envelope {
        let fallback = self.fallback();

        let request = match HttpRequest::post(self.path.as_str()).with_json(params) {
            Ok(request) => config.apply(request),
            Err(error) => {
                tracing::warn!(path = %self.path, error = %error, "Could not encode download request");
                return Envelope::failure(fallback);
            }
        };

        let metadata = RequestMetadata::new(Verb::Download, self.path.as_str()).with_body_size(request.body.len());
        metadata.log_request();
        let timer = RequestTimer::start();

        let response = match self.client.dispatch(request).await {
            Ok(response) => response,
            Err(error) => {
                ResponseMetadata::new(error.status(), timer.elapsed()).log_error(&metadata, &error.to_string());
                return Envelope::failure(failure_message(&error, fallback));
            }
        };

        let outcome = ResponseMetadata::new(Some(response.status), timer.elapsed()).with_body_size(response.body.len());
        let requested = params.get("filename").and_then(Value::as_str);
        let envelope = self.hand_off(response, requested, fallback).await;
        if envelope.success {
            outcome.log_success(&metadata);
        } else {
            outcome.log_error(&metadata, &envelope.message);
        }
        envelope
    }

    async fn hand_off(&self, response: HttpResponse, requested: Option<&str>, fallback: &str) -> Envelope {
        let content_type = response.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string();

        if is_error_payload(Some(&content_type)) {
            return Envelope::failure(resolve_message(Some(&response.body), fallback));
        }

        let filename = resolve_filename(response.get_header("content-disposition"), requested);
        let blob = Blob {
            bytes: response.body,
            content_type: content_type.clone(),
        };

        if let Err(error) = self.client.file_sink().save(&filename, blob).await {
            tracing::warn!(filename = %filename, error = %error, "Could not save download");
            return Envelope::failure(fallback);
        }

        let outcome = DownloadOutcome {
            saved: true,
            filename,
            content_type,
        };
        Envelope::success(DOWNLOAD_STARTED, serde_json::to_value(outcome).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case("application/json", true)]
    #[case("application/json; charset=utf-8", true)]
    #[case("Text/Plain", true)]
    #[case("application/octet-stream", false)]
    #[case("application/zip", false)]
    #[case("text/csv", false)]
    fn test_error_payload_detection(#[case] content_type: &str, #[case] expected: bool) {
        assert_eq!(is_error_payload(Some(content_type)), expected);
    }

    #[test]
    fn test_missing_content_type_is_a_file() {
        assert!(!is_error_payload(None));
    }

    #[rstest]
    #[case(r#"attachment; filename="report.csv""#, Some("report.csv"))]
    #[case("attachment; filename=report.csv", Some("report.csv"))]
    #[case("attachment; filename=report.csv; size=12", Some("report.csv"))]
    #[case("attachment; FILENAME='q1.tar.gz'", Some("q1.tar.gz"))]
    #[case("attachment; filename*=UTF-8''%E6%8A%A5%E5%91%8A.pdf", Some("报告.pdf"))]
    #[case(r#"attachment; filename="fallback.pdf"; filename*=UTF-8''real%20name.pdf"#, Some("real name.pdf"))]
    #[case("attachment; filename*=reports-2024.zip", Some("reports-2024.zip"))]
    #[case("attachment; filename*=q1+report%282%29.zip", Some("q1 report(2).zip"))]
    #[case("attachment; filename*=%E6%8A%A5%E5%91%8A.zip", Some("报告.zip"))]
    #[case("attachment; filename*=UTF-8''a+b.zip", Some("a+b.zip"))]
    #[case("attachment", None)]
    #[case(r#"attachment; filename="""#, None)]
    fn test_filename_from_disposition(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(filename_from_disposition(header).as_deref(), expected);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_filename(r#"<x>|"y"?*\z"#), "_x___y____z");
        assert_eq!(sanitize_filename("tab\there\u{0}"), "tab_here_");
        assert_eq!(sanitize_filename("photo 01.jpg"), "photo 01.jpg");
    }

    #[test]
    fn test_resolve_filename_precedence() {
        assert_eq!(
            resolve_filename(Some(r#"attachment; filename="report.csv""#), Some("ignored.txt")),
            "report.csv"
        );
        assert_eq!(resolve_filename(None, Some("a/b:c.txt")), "a_b_c.txt");
        assert_eq!(resolve_filename(Some("inline"), Some("notes.md")), "notes.md");
        assert_eq!(resolve_filename(None, Some("   ")), DEFAULT_FILENAME);
        assert_eq!(resolve_filename(None, None), DEFAULT_FILENAME);
        assert_eq!(
            resolve_filename(Some("attachment; filename*=reports-2024.zip"), None),
            "reports-2024.zip"
        );
    }

    #[test]
    fn test_final_component() {
        assert_eq!(final_component("../../etc/passwd"), "passwd");
        assert_eq!(final_component(r"dir\file.bin"), "file.bin");
        assert_eq!(final_component(".."), DEFAULT_FILENAME);
        assert_eq!(final_component("dir/"), DEFAULT_FILENAME);
    }

    fn blob(contents: &'static [u8]) -> Blob {
        Blob {
            bytes: Bytes::from_static(contents),
            content_type: "text/csv".to_string(),
        }
    }

    #[tokio::test]
    async fn test_directory_sink_writes_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("nested"));

        sink.save("report.csv", blob(b"a,b\n1,2\n")).await.unwrap();

        let saved = sink.path_for("report.csv");
        assert_eq!(std::fs::read(&saved).unwrap(), b"a,b\n1,2\n");
        assert!(partial_files(sink.dir()).is_empty());
    }

    fn partial_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "part"))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_directory_sink_concurrent_saves_of_one_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(DirectorySink::new(dir.path()));
        let first = Bytes::from(vec![b'a'; 4 << 20]);
        let second = Bytes::from(vec![b'b'; 2 << 20]);

        for _ in 0..10 {
            let save = |bytes: Bytes| {
                let sink = sink.clone();
                tokio::spawn(async move {
                    let blob = Blob {
                        bytes,
                        content_type: "text/csv".to_string(),
                    };
                    sink.save("report.csv", blob).await
                })
            };
            let (a, b) = tokio::join!(save(first.clone()), save(second.clone()));
            a.unwrap().unwrap();
            b.unwrap().unwrap();

            let saved = std::fs::read(dir.path().join("report.csv")).unwrap();
            assert!(
                saved.as_slice() == first.as_ref() || saved.as_slice() == second.as_ref(),
                "saved file mixes both downloads"
            );
        }

        assert!(partial_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_directory_sink_stays_inside_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        sink.save("../escape.txt", blob(b"x")).await.unwrap();

        assert!(dir.path().join("escape.txt").exists());
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_directory_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        sink.save("a.txt", blob(b"old")).await.unwrap();
        sink.save("a.txt", blob(b"new")).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.save("a.txt", blob(b"1")).await.unwrap();
        sink.save("a.txt", blob(b"2")).await.unwrap();

        assert_eq!(sink.files().len(), 2);
        assert_eq!(sink.get("a.txt").unwrap().bytes, Bytes::from_static(b"2"));
        assert!(sink.get("b.txt").is_none());
    }
}
