//! Outgoing request and its HTTP/1.1 wire form.

use crate::base::neterror::NetError;
use crate::http::contentcoding::{self, ContentCoding};
use crate::http::hostspec::{self, HostSpec};
use crate::http::orderedheaders::{write_line, OrderedHeaderMap};
use bytes::Bytes;
use http::Method;

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// One request, ready to be written to a connection.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub target: HostSpec,
    pub tls: bool,
    pub user_agent: String,
    pub headers: OrderedHeaderMap,
    pub cookies: Vec<String>,
    pub params: Vec<(String, String)>,
    pub body: Option<Bytes>,
    /// Advertise gzip/deflate and gzip-encode the request body.
    pub gzip: bool,
}

impl HttpRequest {
    pub fn new(method: Method, target: HostSpec, tls: bool) -> Self {
        Self {
            method,
            target,
            tls,
            user_agent: crate::client::DEFAULT_USER_AGENT.to_string(),
            headers: OrderedHeaderMap::new(),
            cookies: Vec::new(),
            params: Vec::new(),
            body: None,
            gzip: false,
        }
    }

    /// Parse `host` with the `[host][:port][/path]` grammar.
    pub fn parse(method: Method, host: &str, tls: bool) -> Result<Self, NetError> {
        Ok(Self::new(method, HostSpec::parse(host, tls)?, tls))
    }

    /// True when gzip is on, either explicitly or through a caller
    /// `Accept-Encoding` that mentions it.
    pub fn gzip_enabled(&self) -> bool {
        self.gzip
            || self
                .headers
                .get("Accept-Encoding")
                .is_some_and(|v| v.contains("gzip"))
    }

    /// `k=v&k2=v2` in insertion order, or `None` without params.
    pub fn encoded_params(&self) -> Option<String> {
        if self.params.is_empty() {
            return None;
        }
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.params {
            serializer.append_pair(k, v);
        }
        Some(serializer.finish())
    }

    /// Path of the request line. `GET` params go in the query string.
    pub fn request_target(&self) -> String {
        let mut target = self.target.path.clone();
        if self.method == Method::GET {
            if let Some(query) = self.encoded_params() {
                target.push(if target.contains('?') { '&' } else { '?' });
                target.push_str(&query);
            }
        }
        target
    }

    /// Body bytes before content coding, with the default content type.
    fn payload(&self) -> Option<(Bytes, &'static str)> {
        if let Some(body) = &self.body {
            return Some((body.clone(), TEXT_CONTENT_TYPE));
        }
        if self.method == Method::GET {
            return None;
        }
        self.encoded_params()
            .map(|params| (Bytes::from(params), FORM_CONTENT_TYPE))
    }

    /// Request line, headers, blank line and body.
    pub fn serialize(&self) -> Result<Bytes, NetError> {
        let target = self.request_target();
        if !hostspec::is_request_target(&target) {
            return Err(NetError::InvalidUrl(target));
        }
        check_value("User-Agent", &self.user_agent)?;
        for cookie in &self.cookies {
            check_value("Cookie", cookie)?;
        }

        let gzip = self.gzip_enabled();
        let caller = &self.headers;

        let mut out = Vec::with_capacity(256);
        out.extend_from_slice(self.method.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(target.as_bytes());
        out.extend_from_slice(b" HTTP/1.1\r\n");

        let authority = self.target.authority(self.tls);
        let defaults = [
            ("Host", authority.as_str()),
            ("User-Agent", self.user_agent.as_str()),
            ("Accept", DEFAULT_ACCEPT),
            ("Accept-Language", DEFAULT_ACCEPT_LANGUAGE),
        ];
        for (name, value) in defaults {
            if !caller.contains(name) {
                write_line(&mut out, name, value);
            }
        }

        // Framing is always computed here.
        if caller.contains("Content-Length") {
            let mut extra = caller.clone();
            extra.remove("Content-Length");
            extra.write_to(&mut out);
        } else {
            caller.write_to(&mut out);
        }
        for cookie in &self.cookies {
            write_line(&mut out, "Cookie", cookie);
        }
        if gzip && !caller.contains("Accept-Encoding") {
            write_line(&mut out, "Accept-Encoding", DEFAULT_ACCEPT_ENCODING);
        }

        let body = match self.payload() {
            Some((plain, content_type)) => {
                let body = if gzip {
                    Bytes::from(contentcoding::compress(&plain, ContentCoding::Gzip)?)
                } else {
                    plain
                };
                if !caller.contains("Content-Type") {
                    write_line(&mut out, "Content-Type", content_type);
                }
                if gzip && !caller.contains("Content-Encoding") {
                    write_line(&mut out, "Content-Encoding", ContentCoding::Gzip.as_str());
                }
                write_line(&mut out, "Content-Length", &body.len().to_string());
                Some(body)
            }
            None => None,
        };

        if !caller.contains("Connection") {
            write_line(&mut out, "Connection", "close");
        }
        out.extend_from_slice(b"\r\n");
        if let Some(body) = body {
            out.extend_from_slice(&body);
        }

        tracing::debug!(
            method = %self.method,
            target = %target,
            host = %self.target.host,
            port = self.target.port,
            bytes = out.len(),
            "request serialized"
        );
        Ok(Bytes::from(out))
    }
}

/// Values set outside [`OrderedHeaderMap`] get the same validation.
fn check_value(name: &str, value: &str) -> Result<(), NetError> {
    http::HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|_| NetError::InvalidHeader {
            name: name.to_string(),
        })
}
