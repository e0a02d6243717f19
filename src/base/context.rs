//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into context-rich `NetError` variants.

use crate::base::neterror::NetError;
use std::io::{self, ErrorKind};

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add connection context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use hcnet::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr)
    ///     .connection_context("example.com", 443)?;
    /// // Error: "Connection to example.com:443 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Add DNS resolution context to an IO error.
    fn dns_context(self, host: &str) -> Result<T, NetError>;

    /// Map a failed socket read.
    fn read_context(self) -> Result<T, NetError>;

    /// Map a failed socket write.
    fn write_context(self) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| {
            if is_timeout(e.kind()) {
                NetError::ConnectionTimedOut
            } else {
                NetError::ConnectionFailed {
                    host: host.to_string(),
                    port,
                    reason: e.to_string(),
                }
            }
        })
    }

    fn dns_context(self, host: &str) -> Result<T, NetError> {
        self.map_err(|_| NetError::NameNotResolved {
            host: host.to_string(),
        })
    }

    fn read_context(self) -> Result<T, NetError> {
        self.map_err(|e| {
            if is_timeout(e.kind()) {
                NetError::ConnectionTimedOut
            } else {
                NetError::ReadFailed(e.to_string())
            }
        })
    }

    fn write_context(self) -> Result<T, NetError> {
        self.map_err(|e| {
            if is_timeout(e.kind()) {
                NetError::ConnectionTimedOut
            } else {
                NetError::WriteFailed(e.to_string())
            }
        })
    }
}

/// A socket deadline surfaces as `WouldBlock` on Unix and `TimedOut` on Windows.
pub(crate) fn is_timeout(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::WouldBlock)
}
