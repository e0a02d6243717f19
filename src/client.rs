//! HTTP Client with builder pattern.
//!
//! Every [`RequestBuilder::send`] opens a fresh connection, performs one
//! exchange and closes it again.
//!
//! # Example
//!
//! ```rust,no_run
//! use hcnet::Client;
//!
//! let client = Client::builder().gzip(true).build();
//! let resp = client
//!     .get("example.com/index.html")
//!     .header("X-Trace", "1")
//!     .param("q", "rust")
//!     .send()?;
//! println!("{} {}", resp.status(), resp.reason());
//! # Ok::<(), hcnet::NetError>(())
//! ```

use crate::base::neterror::NetError;
use crate::http::orderedheaders::OrderedHeaderMap;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::transaction::HttpTransaction;
use crate::socket::client::DEFAULT_READ_BUFFER_SIZE;
use crate::socket::connectjob::ConnectJob;
use crate::socket::tls::TlsContext;
use bytes::Bytes;
use http::Method;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("hcli/", env!("CARGO_PKG_VERSION"));

/// HTTP Client for making requests.
///
/// Use [`Client::builder()`] to configure and create a client. Cloning is
/// cheap and clones share the TLS configuration.
#[derive(Debug, Clone)]
pub struct Client {
    user_agent: String,
    tls: Arc<TlsContext>,
    timeout: Option<Duration>,
    gzip: bool,
    read_buffer_size: usize,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        ClientBuilder::default().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn tls_context(&self) -> &TlsContext {
        &self.tls
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Start building a GET request.
    pub fn get<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::GET, host)
    }

    /// Start building a POST request.
    pub fn post<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::POST, host)
    }

    /// Start building a PUT request.
    pub fn put<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::PUT, host)
    }

    /// Start building a DELETE request.
    pub fn delete<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::DELETE, host)
    }

    /// Start building a HEAD request.
    pub fn head<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::HEAD, host)
    }

    /// Start building a PATCH request.
    pub fn patch<H: AsRef<str>>(&self, host: H) -> RequestBuilder {
        self.request(Method::PATCH, host)
    }

    /// Start building a request with custom method. `host` follows the
    /// `[host][:port][/path]` grammar.
    pub fn request<H: AsRef<str>>(&self, method: Method, host: H) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            method,
            host: host.as_ref().to_string(),
            ssl: false,
            gzip: self.gzip,
            headers: OrderedHeaderMap::new(),
            cookies: Vec::new(),
            params: Vec::new(),
            body: None,
            error: None,
        }
    }
}

/// Builder for creating a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    user_agent: String,
    tls: TlsContext,
    timeout: Option<Duration>,
    gzip: bool,
    read_buffer_size: usize,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            tls: TlsContext::default(),
            timeout: None,
            gzip: false,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl ClientBuilder {
    /// Set the `User-Agent` sent unless a request overrides it.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the TLS configuration used for `ssl(true)` requests.
    pub fn tls_context(mut self, ctx: TlsContext) -> Self {
        self.tls = ctx;
        self
    }

    /// Set the socket deadline for connect, read and write.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Advertise gzip/deflate and gzip-encode request bodies.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Size of each socket read.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        Client {
            user_agent: self.user_agent,
            tls: Arc::new(self.tls),
            timeout: self.timeout,
            gzip: self.gzip,
            read_buffer_size: self.read_buffer_size,
        }
    }
}

/// Builder for a single request.
///
/// The first invalid header is remembered and returned by
/// [`send`](RequestBuilder::send).
#[derive(Debug)]
pub struct RequestBuilder {
    client: Client,
    method: Method,
    host: String,
    ssl: bool,
    gzip: bool,
    headers: OrderedHeaderMap,
    cookies: Vec<String>,
    params: Vec<(String, String)>,
    body: Option<Bytes>,
    error: Option<NetError>,
}

impl RequestBuilder {
    /// Add a header. Names keep the given spelling.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.headers.insert(key, value) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Add one `Cookie` line.
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookies.push(cookie.into());
        self
    }

    /// Add a parameter: query string for `GET`, form body otherwise.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set request body.
    pub fn body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize>(mut self, json: &T) -> Self {
        match serde_json::to_vec(json) {
            Ok(bytes) => {
                self.body = Some(Bytes::from(bytes));
                self.header("Content-Type", "application/json")
            }
            Err(_) => {
                if self.error.is_none() {
                    self.error = Some(NetError::JsonParseError);
                }
                self
            }
        }
    }

    /// Use TLS for this request.
    pub fn ssl(mut self, enabled: bool) -> Self {
        self.ssl = enabled;
        self
    }

    /// Override the client's gzip setting for this request.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Resolve the host string and assemble the request without sending it.
    pub fn build(&self) -> Result<HttpRequest, NetError> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        let mut request = HttpRequest::parse(self.method.clone(), &self.host, self.ssl)?;
        request.user_agent = self.client.user_agent.clone();
        request.headers = self.headers.clone();
        request.cookies = self.cookies.clone();
        request.params = self.params.clone();
        request.body = self.body.clone();
        request.gzip = self.gzip;
        Ok(request)
    }

    /// Send the request.
    pub fn send(self) -> Result<HttpResponse, NetError> {
        let request = self.build()?;
        let client = &self.client;

        let mut job = ConnectJob::new()
            .timeout(client.timeout)
            .read_buffer_size(client.read_buffer_size);
        if request.tls {
            job = job.tls(&client.tls);
        }

        tracing::debug!(
            method = %request.method,
            host = %request.target.host,
            port = request.target.port,
            tls = request.tls,
            "sending request"
        );
        HttpTransaction::new().exchange(&request, &job)
    }
}
