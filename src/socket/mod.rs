//! Socket and connection management.
//!
//! Provides the transport layer mirroring Chromium's `net/socket/`:
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`stream`]: the `StreamSocket` trait and its TCP / TLS implementations
//! - [`client`]: the owned, idempotently closable [`Connection`](client::Connection)
//! - [`tls`]: TLS configuration with BoringSSL

pub mod client;
pub mod connectjob;
pub mod stream;
pub mod tls;

pub use client::Connection;
pub use connectjob::ConnectJob;
pub use tls::TlsContext;
