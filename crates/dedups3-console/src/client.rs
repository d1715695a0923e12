//! Main client for the dedups3 admin console API

use std::sync::Arc;
use std::time::Duration;

use dedups3_console_transport::{
    HttpRequest, HttpResponse, HttpTransport, HttpTransportConfig, Transport, TransportError,
    resolve_base_url,
};
use url::Url;

use crate::{
    config::ClientConfig,
    context::{ClientContext, Location, MemoryHistory, Navigator},
    download::{DirectorySink, DownloadOp, FileSink},
    envelope::{Envelope, failure_message},
    error::{Error, Result},
    http::{
        InterceptorStack, Rejection, ResponseInterceptor, SessionExpiryInterceptor, TracingInterceptor, Verb,
    },
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
    operation::{BodyOp, QueryOp, UploadOp},
    resources::{
        AccessKeys, Buckets, ChunkConfigs, Diagnostics, Endpoint, Groups, Logs, Objects, Policies, Quotas,
        Roles, Stats, Storages, Users,
    },
    session::Session,
};

/// Client for the console API.
///
/// Cheap to clone; clones share one transport, one navigation context and
/// one interceptor stack. Operations bound from it always resolve to an
/// [`Envelope`].
///
/// # Example
///
/// ```rust,no_run
/// use dedups3_console::{Client, MemoryHistory};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let history = Arc::new(MemoryHistory::new("/buckets"));
/// let client = Client::builder()
///     .origin("http://127.0.0.1:3002")
///     .history(history)
///     .build()?;
///
/// let buckets = client.buckets().list(None).await;
/// if !buckets.success {
///     eprintln!("{}", buckets.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    context: ClientContext,
    interceptors: InterceptorStack,
    logout_timeout: Duration,
    sink: Arc<dyn FileSink>,
}

impl Client {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not an absolute URL or the HTTP
    /// transport cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Navigation context the client was built with.
    pub fn context(&self) -> &ClientContext {
        &self.inner.context
    }

    /// Resolved API base URL.
    pub fn base_url(&self) -> &Url {
        self.inner.context.base_url()
    }

    /// Shared transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub(crate) fn logout_timeout(&self) -> Duration {
        self.inner.logout_timeout
    }

    pub(crate) fn file_sink(&self) -> &dyn FileSink {
        self.inner.sink.as_ref()
    }

    /// Bind a GET.
    pub fn get(&self, path: impl Into<String>, fallback: impl Into<String>) -> QueryOp {
        QueryOp::new(self.clone(), Verb::Get, path, fallback)
    }

    /// Bind a DELETE. Its filter travels in the query string.
    pub fn delete(&self, path: impl Into<String>, fallback: impl Into<String>) -> QueryOp {
        QueryOp::new(self.clone(), Verb::Delete, path, fallback)
    }

    /// Bind a POST with a JSON body.
    pub fn post(&self, path: impl Into<String>, fallback: impl Into<String>) -> BodyOp {
        BodyOp::new(self.clone(), Verb::Post, path, fallback)
    }

    /// Bind a PUT with a JSON body.
    pub fn put(&self, path: impl Into<String>, fallback: impl Into<String>) -> BodyOp {
        BodyOp::new(self.clone(), Verb::Put, path, fallback)
    }

    /// Bind a multipart upload.
    pub fn upload(&self, path: impl Into<String>, fallback: impl Into<String>) -> UploadOp {
        UploadOp::new(self.clone(), path, fallback)
    }

    /// Bind a binary download.
    pub fn download(&self, path: impl Into<String>, fallback: impl Into<String>) -> DownloadOp {
        DownloadOp::new(self.clone(), path, fallback)
    }

    pub(crate) fn query_op(&self, endpoint: &Endpoint) -> QueryOp {
        QueryOp::new(self.clone(), endpoint.verb, endpoint.path, endpoint.fallback)
    }

    pub(crate) fn body_op(&self, endpoint: &Endpoint) -> BodyOp {
        BodyOp::new(self.clone(), endpoint.verb, endpoint.path, endpoint.fallback)
    }

    /// Login, logout and authentication checks.
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    /// Service-wide statistics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.clone())
    }

    /// Buckets.
    pub fn buckets(&self) -> Buckets {
        Buckets::new(self.clone())
    }

    /// Objects and folders inside buckets.
    pub fn objects(&self) -> Objects {
        Objects::new(self.clone())
    }

    /// IAM users.
    pub fn users(&self) -> Users {
        Users::new(self.clone())
    }

    /// IAM groups.
    pub fn groups(&self) -> Groups {
        Groups::new(self.clone())
    }

    /// IAM roles.
    pub fn roles(&self) -> Roles {
        Roles::new(self.clone())
    }

    /// IAM policies.
    pub fn policies(&self) -> Policies {
        Policies::new(self.clone())
    }

    /// Access keys.
    pub fn access_keys(&self) -> AccessKeys {
        AccessKeys::new(self.clone())
    }

    /// Storage quotas.
    pub fn quotas(&self) -> Quotas {
        Quotas::new(self.clone())
    }

    /// Deduplication chunking configuration.
    pub fn chunk_configs(&self) -> ChunkConfigs {
        ChunkConfigs::new(self.clone())
    }

    /// Storage backends.
    pub fn storages(&self) -> Storages {
        Storages::new(self.clone())
    }

    /// Object, block and chunk inspection.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.clone())
    }

    /// Audit and event logs.
    pub fn logs(&self) -> Logs {
        Logs::new(self.clone())
    }

    /// Send through the transport; rejections pass the interceptors before
    /// they are returned.
    pub(crate) async fn dispatch(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let method = request.method.clone();
        let path = request.path.clone();

        match self.inner.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                self.inner
                    .interceptors
                    .on_rejection(Rejection {
                        method: &method,
                        path: &path,
                        error: &error,
                    })
                    .await;
                Err(error)
            }
        }
    }

    /// Dispatch and normalize into an envelope.
    pub(crate) async fn execute(&self, verb: Verb, request: HttpRequest, fallback: &str) -> Envelope {
        let metadata = RequestMetadata::new(verb, request.path.as_str()).with_body_size(request.body.len());
        metadata.log_request();
        let timer = RequestTimer::start();

        match self.dispatch(request).await {
            Ok(response) => {
                ResponseMetadata::new(Some(response.status), timer.elapsed())
                    .with_body_size(response.body.len())
                    .log_success(&metadata);
                Envelope::from_success_body(&response.body, fallback)
            }
            Err(error) => {
                ResponseMetadata::new(error.status(), timer.elapsed()).log_error(&metadata, &error.to_string());
                Envelope::failure(failure_message(&error, fallback))
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("context", &self.inner.context)
            .field("interceptors", &self.inner.interceptors.len())
            .field("logout_timeout", &self.inner.logout_timeout)
            .finish()
    }
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    location: Option<Arc<dyn Location>>,
    navigator: Option<Arc<dyn Navigator>>,
    transport: Option<Arc<dyn Transport>>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    file_sink: Option<Arc<dyn FileSink>>,
}

impl ClientBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the serving origin.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    /// Set the API base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.base_path = base_path.into();
        self
    }

    /// Set the default timeout for requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the timeout for the best-effort logout call.
    pub fn logout_timeout(mut self, timeout: Duration) -> Self {
        self.config.logout_timeout = timeout;
        self
    }

    /// Set the credential policy.
    pub fn credentials(mut self, policy: dedups3_console_transport::CredentialPolicy) -> Self {
        self.config.credentials = policy;
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Use one history for both location and navigation.
    pub fn history(mut self, history: Arc<MemoryHistory>) -> Self {
        self.location = Some(history.clone());
        self.navigator = Some(history);
        self
    }

    /// Set where the current page path is read from.
    pub fn location(mut self, location: Arc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Set how forced navigation happens.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Use a custom transport instead of the HTTP one. Its base URL
    /// replaces the configured origin and base path.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Add a response interceptor. Interceptors added here see rejections
    /// before the built-in ones.
    pub fn interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Set where downloads are saved.
    pub fn file_sink(mut self, sink: Arc<dyn FileSink>) -> Self {
        self.file_sink = Some(sink);
        self
    }

    /// Save downloads into `dir`.
    pub fn download_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.download_dir = Some(dir.into());
        self
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not an absolute URL or the HTTP
    /// transport cannot be built.
    pub fn build(self) -> Result<Client> {
        let config = self.config;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = resolve_base_url(&config.origin, &config.base_path)?;
                let transport_config = HttpTransportConfig {
                    timeout: config.timeout,
                    connect_timeout: config.connect_timeout,
                    credentials: config.credentials,
                    default_headers: config.default_headers.clone(),
                    ..HttpTransportConfig::new(base_url)
                };
                Arc::new(HttpTransport::with_config(transport_config)?)
            }
        };

        let history = Arc::new(MemoryHistory::default());
        let location = self
            .location
            .unwrap_or_else(|| history.clone() as Arc<dyn Location>);
        let navigator = self.navigator.unwrap_or(history as Arc<dyn Navigator>);

        let context = ClientContext::new(transport.base_url().clone(), location, navigator)
            .with_credentials(config.credentials);

        let mut interceptors = InterceptorStack::new();
        interceptors.push(Arc::new(TracingInterceptor));
        interceptors.push(Arc::new(SessionExpiryInterceptor::new(
            transport.clone(),
            context.clone(),
            config.logout_timeout,
        )));
        for interceptor in self.interceptors {
            interceptors.push(interceptor);
        }

        let sink = self
            .file_sink
            .unwrap_or_else(|| Arc::new(DirectorySink::new(config.resolved_download_dir())) as Arc<dyn FileSink>);

        tracing::debug!(base_url = %context.base_url(), "Console client ready");

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                context,
                interceptors,
                logout_timeout: config.logout_timeout,
                sink,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedups3_console_transport::CredentialPolicy;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .origin("https://storage.example.com")
            .base_path("/api")
            .timeout(Duration::from_secs(30))
            .logout_timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "https://storage.example.com/api/");
        assert_eq!(client.logout_timeout(), Duration::from_millis(500));
        assert_eq!(client.context().credentials(), CredentialPolicy::Include);
    }

    #[test]
    fn test_client_defaults() {
        let client = Client::new().unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:3002/api/");
        assert_eq!(client.context().current_path(), "/");
    }

    #[test]
    fn test_client_from_config_invalid_origin() {
        let config = ClientConfig::with_origin("not a url");
        assert!(matches!(Client::from_config(config), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_client_clone_shares_arc() {
        let client1 = Client::new().unwrap();
        let client2 = client1.clone();
        assert!(Arc::ptr_eq(&client1.inner, &client2.inner));
    }

    #[test]
    fn test_factories_bind_verbs() {
        let client = Client::new().unwrap();

        assert_eq!(client.get("/stats", "Error fetching stats").verb(), Verb::Get);
        assert_eq!(client.delete("/bucket/delete", "x").verb(), Verb::Delete);
        assert_eq!(client.post("/bucket/deleteobject", "x").verb(), Verb::Post);
        assert_eq!(client.put("/bucket/create", "x").verb(), Verb::Put);
        assert_eq!(client.upload("/bucket/putobject", "").fallback(), "File upload failed");
        assert_eq!(client.download("/bucket/getobject", "").fallback(), "Download failed");
        assert_eq!(client.get("/stats", "").fallback(), "Request failed");
    }

    #[test]
    fn test_history_is_shared_with_context() {
        let history = Arc::new(MemoryHistory::new("/buckets"));
        let client = Client::builder().history(history.clone()).build().unwrap();

        assert_eq!(client.context().current_path(), "/buckets");
        history.visit("/login");
        assert!(client.context().is_on_auth_flow());
    }

    #[test]
    fn test_default_header_validation() {
        assert!(Client::builder().default_header("x-console", "1").is_ok());
        assert!(matches!(
            Client::builder().default_header("bad header", "1"),
            Err(Error::InvalidHeaderName(_))
        ));
    }
}
