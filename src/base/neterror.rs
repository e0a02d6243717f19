use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Name not resolved: {host}")]
    NameNotResolved { host: String },
    #[error("Connection to {host}:{port} failed: {reason}")]
    ConnectionFailed {
        host: String,
        port: u16,
        reason: String,
    },
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("SSL protocol error: {0}")]
    SslProtocolError(String),
    #[error("SSL handshake with {host} failed: {reason}")]
    SslHandshakeFailed { host: String, reason: String },
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Read failed: {0}")]
    ReadFailed(String),

    // HTTP Errors
    #[error("No host given")]
    EmptyHost,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid header: {name}")]
    InvalidHeader { name: String },
    #[error("Empty response")]
    EmptyResponse,
    #[error("Response headers truncated")]
    ResponseHeadersTruncated,
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),
    #[error("Response headers multiple Content-Length")]
    ResponseHeadersMultipleContentLength,
    #[error("Content-Length mismatch: expected {expected}, got {actual}")]
    ContentLengthMismatch { expected: usize, actual: usize },
    #[error("Invalid chunked encoding: bad chunk size line {line:?}")]
    InvalidChunkedEncoding { line: String },
    #[error("Incomplete chunked encoding")]
    IncompleteChunkedEncoding,
    #[error("Content decoding ({method}) failed: {reason}")]
    ContentDecodingFailed { method: String, reason: String },
    #[error("Content encoding ({method}) failed: {reason}")]
    ContentEncodingFailed { method: String, reason: String },
    #[error("Invalid UTF-8 in response body")]
    InvalidUtf8,
    #[error("JSON parse error")]
    JsonParseError,
}

impl NetError {
    /// Chromium-style numeric code (`net_error_list.h`). Failures with no
    /// Chromium counterpart use the -1000 range.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionFailed { .. } => -104,
            NetError::NameNotResolved { .. } => -105,
            NetError::SslProtocolError(_) => -107,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,
            NetError::SslHandshakeFailed { .. } => -148,

            NetError::InvalidUrl(_) => -300,
            NetError::InvalidChunkedEncoding { .. } => -321,
            NetError::EmptyResponse => -324,
            NetError::ContentDecodingFailed { .. } => -330,
            NetError::ResponseHeadersMultipleContentLength => -346,
            NetError::ContentLengthMismatch { .. } => -354,
            NetError::IncompleteChunkedEncoding => -355,
            NetError::ResponseHeadersTruncated => -357,

            NetError::EmptyHost => -1000,
            NetError::WriteFailed(_) => -1001,
            NetError::ReadFailed(_) => -1002,
            NetError::InvalidHeader { .. } => -1003,
            NetError::InvalidContentLength(_) => -1004,
            NetError::ContentEncodingFailed { .. } => -1005,
            NetError::InvalidUtf8 => -1006,
            NetError::JsonParseError => -1007,
        }
    }

    /// True for failures raised by the transport (DNS, TCP, TLS, socket I/O).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved { .. }
                | NetError::ConnectionFailed { .. }
                | NetError::ConnectionTimedOut
                | NetError::SocketNotConnected
                | NetError::SslProtocolError(_)
                | NetError::SslHandshakeFailed { .. }
                | NetError::WriteFailed(_)
                | NetError::ReadFailed(_)
        )
    }
}
