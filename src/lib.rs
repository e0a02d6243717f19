//! # hcnet
//!
//! A blocking HTTP/1.1 client engine.
//!
//! `hcnet` opens a plain or TLS connection, writes one request and reads the
//! response until the server closes the stream. The header block is parsed
//! incrementally as fragments arrive. The body is then reassembled from its
//! `Content-Length`, chunked or read-until-close framing and decoded from
//! gzip or deflate when the response says so.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hcnet::Client;
//!
//! let resp = Client::new().get("example.com").send()?;
//! for (key, value) in resp.headers().iter() {
//!     println!("{key}: {value}");
//! }
//! println!("{}", resp.text()?);
//! # Ok::<(), hcnet::NetError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and load states
//! - [`socket`] - Transport: TCP and TLS sockets, connection setup
//! - [`http`] - Header parsing, request serialization, body decoding
//! - [`client`] - High-level request API
//!
//! ## Security
//!
//! [`TlsContext`] does not verify peer certificates unless
//! [`TlsContext::verify_peer`] is set.

pub mod base;
pub mod client;
pub mod http;
pub mod socket;

pub use base::loadstate::LoadState;
pub use base::neterror::NetError;
pub use client::{Client, ClientBuilder, RequestBuilder};
pub use crate::http::{HeaderParser, HttpRequest, HttpResponse};
pub use socket::TlsContext;
