use crate::base::neterror::NetError;
use crate::socket::stream::StreamSocket;
use bytes::Bytes;

/// Default size of a single read from the socket.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// A live transport handle owned by one exchange.
///
/// Once [`disconnect`](Connection::disconnect) has run, reads and writes fail
/// with [`NetError::SocketNotConnected`]. Disconnecting twice is harmless, and
/// dropping an open connection disconnects it.
#[derive(Debug)]
pub struct Connection {
    socket: Option<Box<dyn StreamSocket>>,
    host: String,
    port: u16,
    tls: bool,
    read_buffer: Vec<u8>,
}

impl Connection {
    pub fn new(socket: Box<dyn StreamSocket>, host: impl Into<String>, port: u16) -> Self {
        Self::with_read_buffer_size(socket, host, port, DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_read_buffer_size(
        socket: Box<dyn StreamSocket>,
        host: impl Into<String>,
        port: u16,
        read_buffer_size: usize,
    ) -> Self {
        let tls = socket.is_tls();
        Self {
            socket: Some(socket),
            host: host.into(),
            port,
            tls,
            read_buffer: vec![0; read_buffer_size.max(1)],
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Send `data` in full.
    pub fn write(&mut self, data: &[u8]) -> Result<(), NetError> {
        let socket = self.socket.as_mut().ok_or(NetError::SocketNotConnected)?;
        socket.write_all(data)?;
        tracing::trace!(bytes = data.len(), "wrote to socket");
        Ok(())
    }

    /// Next fragment from the peer, at most one read buffer long.
    /// An empty fragment means the peer closed the stream.
    pub fn read(&mut self) -> Result<Bytes, NetError> {
        let socket = self.socket.as_mut().ok_or(NetError::SocketNotConnected)?;
        let n = socket.read(&mut self.read_buffer)?;
        tracing::trace!(bytes = n, "read from socket");
        Ok(Bytes::copy_from_slice(&self.read_buffer[..n]))
    }

    /// Close the TLS session (if any) and the socket.
    pub fn disconnect(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            socket.shutdown();
            tracing::debug!(host = %self.host, port = self.port, "disconnected");
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scripted socket: hands out `fragments` one per read, then end-of-stream.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedSocket {
        pub fragments: VecDeque<Vec<u8>>,
        pub written: Arc<Mutex<Vec<u8>>>,
        pub shutdowns: Arc<AtomicUsize>,
        pub fail_reads: bool,
    }

    impl ScriptedSocket {
        pub(crate) fn new<I, F>(fragments: I) -> Self
        where
            I: IntoIterator<Item = F>,
            F: AsRef<[u8]>,
        {
            Self {
                fragments: fragments.into_iter().map(|f| f.as_ref().to_vec()).collect(),
                ..Default::default()
            }
        }
    }

    impl StreamSocket for ScriptedSocket {
        fn write_all(&mut self, data: &[u8]) -> Result<(), NetError> {
            self.written.lock().unwrap().extend_from_slice(data);
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
            if self.fail_reads {
                return Err(NetError::ReadFailed("connection reset".into()));
            }
            let Some(mut fragment) = self.fragments.pop_front() else {
                return Ok(0);
            };
            let n = fragment.len().min(buf.len());
            buf[..n].copy_from_slice(&fragment[..n]);
            if n < fragment.len() {
                self.fragments.push_front(fragment.split_off(n));
            }
            Ok(n)
        }

        fn shutdown(&mut self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_read_until_end_of_stream() {
        let socket = ScriptedSocket::new(["HTTP/1.1 ", "200 OK\r\n"]);
        let mut conn = Connection::new(Box::new(socket), "example.com", 80);

        assert_eq!(conn.read().unwrap(), Bytes::from_static(b"HTTP/1.1 "));
        assert_eq!(conn.read().unwrap(), Bytes::from_static(b"200 OK\r\n"));
        assert!(conn.read().unwrap().is_empty());
    }

    #[test]
    fn test_read_is_bounded_by_buffer_size() {
        let socket = ScriptedSocket::new([vec![b'x'; 2500]]);
        let mut conn = Connection::new(Box::new(socket), "example.com", 80);

        assert_eq!(conn.read().unwrap().len(), 1024);
        assert_eq!(conn.read().unwrap().len(), 1024);
        assert_eq!(conn.read().unwrap().len(), 452);
        assert!(conn.read().unwrap().is_empty());
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let socket = ScriptedSocket::new(Vec::<Vec<u8>>::new());
        let shutdowns = socket.shutdowns.clone();
        let mut conn = Connection::new(Box::new(socket), "example.com", 80);

        conn.disconnect();
        conn.disconnect();
        drop(conn);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_io_after_disconnect_fails() {
        let socket = ScriptedSocket::new(["data"]);
        let mut conn = Connection::new(Box::new(socket), "example.com", 80);
        conn.disconnect();

        assert!(!conn.is_open());
        assert_eq!(conn.read().unwrap_err(), NetError::SocketNotConnected);
        assert_eq!(conn.write(b"GET /").unwrap_err(), NetError::SocketNotConnected);
    }

    #[test]
    fn test_drop_disconnects() {
        let socket = ScriptedSocket::new(Vec::<Vec<u8>>::new());
        let shutdowns = socket.shutdowns.clone();
        drop(Connection::new(Box::new(socket), "example.com", 80));
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }
}
