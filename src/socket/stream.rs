//! Socket abstraction over plain TCP and TLS.
//!
//! This module provides a blocking `StreamSocket` trait with two
//! implementations, [`TcpSocket`] and [`SslSocket`], selected once at connect
//! time. Callers never branch on "is this TLS" for individual reads or writes.
//!
//! Based on Chromium's `StreamSocket` interface which provides polymorphism
//! for `TcpClientSocket` and `SSLClientSocket`.

use crate::base::context::{is_timeout, IoResultExt};
use crate::base::neterror::NetError;
use boring::ssl::{ErrorCode, SslStream};
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A connected, blocking byte stream.
///
/// Chromium equivalent: `net::StreamSocket`
pub trait StreamSocket: fmt::Debug + Send {
    /// Write every byte of `data` or fail.
    fn write_all(&mut self, data: &[u8]) -> Result<(), NetError>;

    /// Read the next available bytes into `buf`.
    /// Returns `Ok(0)` only when the peer has closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError>;

    /// Tear the stream down. Errors are ignored: the socket is gone either way.
    fn shutdown(&mut self);

    /// Returns true if bytes travel inside a TLS session.
    fn is_tls(&self) -> bool {
        false
    }
}

/// Plain TCP stream.
#[derive(Debug)]
pub struct TcpSocket {
    stream: TcpStream,
}

impl TcpSocket {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl StreamSocket for TcpSocket {
    fn write_all(&mut self, data: &[u8]) -> Result<(), NetError> {
        self.stream.write_all(data).write_context()?;
        self.stream.flush().write_context()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => return other.read_context(),
            }
        }
    }

    fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// TLS session over TCP.
///
/// The underlying socket is blocking, so `WANT_READ`/`WANT_WRITE` never mean
/// "try again later" here and are reported as failures.
pub struct SslSocket {
    stream: SslStream<TcpStream>,
}

impl SslSocket {
    pub fn new(stream: SslStream<TcpStream>) -> Self {
        Self { stream }
    }

    /// Negotiated ALPN protocol, if any.
    pub fn alpn_protocol(&self) -> Option<&[u8]> {
        self.stream.ssl().selected_alpn_protocol()
    }
}

impl fmt::Debug for SslSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslSocket")
            .field("peer", &self.stream.get_ref().peer_addr().ok())
            .field("version", &self.stream.ssl().version_str())
            .finish()
    }
}

impl StreamSocket for SslSocket {
    fn write_all(&mut self, data: &[u8]) -> Result<(), NetError> {
        let mut written = 0;
        while written < data.len() {
            match self.stream.ssl_write(&data[written..]) {
                Ok(0) => return Err(NetError::WriteFailed("short TLS write".into())),
                Ok(n) => written += n,
                Err(e) => {
                    return Err(match e.io_error() {
                        Some(io) if is_timeout(io.kind()) => NetError::ConnectionTimedOut,
                        _ => NetError::WriteFailed(e.to_string()),
                    })
                }
            }
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        loop {
            match self.stream.ssl_read(buf) {
                Ok(n) => return Ok(n),
                // close_notify received
                Err(e) if e.code() == ErrorCode::ZERO_RETURN => return Ok(0),
                Err(e) => match e.io_error() {
                    Some(io) if io.kind() == ErrorKind::Interrupted => continue,
                    Some(io) if is_timeout(io.kind()) => {
                        return Err(NetError::ConnectionTimedOut)
                    }
                    // Peer closed the TCP stream without close_notify.
                    None if e.code() == ErrorCode::SYSCALL => return Ok(0),
                    _ => return Err(NetError::ReadFailed(e.to_string())),
                },
            }
        }
    }

    fn shutdown(&mut self) {
        let _ = self.stream.shutdown();
        let _ = self.stream.get_ref().shutdown(Shutdown::Both);
    }

    fn is_tls(&self) -> bool {
        true
    }
}
