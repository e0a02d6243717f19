//! HTTP Response with body access.

use crate::base::neterror::NetError;
use crate::http::headerparser::HeaderParser;
use bytes::Bytes;
use http::StatusCode;

/// Parsed header block plus the fully decoded body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    headers: HeaderParser,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(headers: HeaderParser, body: Bytes) -> Self {
        Self { headers, body }
    }

    /// Numeric status code as received.
    pub fn status(&self) -> u16 {
        self.headers.code()
    }

    /// Status code, if it is a valid one.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.headers.code()).ok()
    }

    pub fn reason(&self) -> &str {
        self.headers.reason()
    }

    pub fn headers(&self) -> &HeaderParser {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|_| NetError::InvalidUtf8)
    }

    /// Body deserialized from JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|_| NetError::JsonParseError)
    }
}
