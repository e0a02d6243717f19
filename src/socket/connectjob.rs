use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::Connection;
use crate::socket::stream::{SslSocket, StreamSocket, TcpSocket};
use crate::socket::tls::TlsContext;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
#[derive(Debug, Clone, Default)]
pub struct ConnectJob<'a> {
    tls: Option<&'a TlsContext>,
    timeout: Option<Duration>,
    read_buffer_size: Option<usize>,
}

impl<'a> ConnectJob<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the TCP stream in TLS configured by `ctx`.
    pub fn tls(mut self, ctx: &'a TlsContext) -> Self {
        self.tls = Some(ctx);
        self
    }

    /// Deadline applied to connect and to every read and write.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = Some(size);
        self
    }

    pub fn connect(&self, host: &str, port: u16) -> Result<Connection, NetError> {
        // 1. DNS Resolution
        tracing::debug!(host = %host, port, "resolving host");
        let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs().dns_context(host)?.collect();
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved {
                host: host.to_string(),
            });
        }
        tracing::debug!(host = %host, count = addrs.len(), "resolution complete");

        // 2. TCP Connect, first address that answers wins
        let stream = self.connect_tcp(host, port, &addrs)?;
        stream
            .set_read_timeout(self.timeout)
            .connection_context(host, port)?;
        stream
            .set_write_timeout(self.timeout)
            .connection_context(host, port)?;
        let _ = stream.set_nodelay(true);

        // 3. SSL Handshake (if requested)
        let socket: Box<dyn StreamSocket> = match self.tls {
            Some(ctx) => Box::new(Self::handshake(ctx, host, stream)?),
            None => Box::new(TcpSocket::new(stream)),
        };

        let conn = match self.read_buffer_size {
            Some(size) => Connection::with_read_buffer_size(socket, host, port, size),
            None => Connection::new(socket, host, port),
        };
        tracing::debug!(host = %host, port, tls = conn.is_tls(), "connected");
        Ok(conn)
    }

    fn connect_tcp(
        &self,
        host: &str,
        port: u16,
        addrs: &[SocketAddr],
    ) -> Result<TcpStream, NetError> {
        let mut last_err = None;
        for addr in addrs {
            let attempt = match self.timeout {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!(addr = %addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) => Err(e).connection_context(host, port),
            None => Err(NetError::NameNotResolved {
                host: host.to_string(),
            }),
        }
    }

    fn handshake(ctx: &TlsContext, host: &str, stream: TcpStream) -> Result<SslSocket, NetError> {
        let connector = ctx.connector()?;
        let mut config = connector
            .configure()
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;
        config.set_use_server_name_indication(ctx.should_set_sni(host));
        if !ctx.verify_peer {
            config.set_verify_hostname(false);
        }

        let tls_stream = config
            .connect(host, stream)
            .map_err(|e| NetError::SslHandshakeFailed {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let socket = SslSocket::new(tls_stream);
        tracing::debug!(
            host = %host,
            alpn = ?socket.alpn_protocol().map(String::from_utf8_lossy),
            "TLS handshake complete"
        );
        Ok(socket)
    }
}
