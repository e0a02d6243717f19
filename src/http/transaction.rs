use crate::base::loadstate::LoadState;
use crate::base::neterror::NetError;
use crate::http::headerparser::HeaderParser;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::responsebody::BodyReader;
use crate::socket::client::Connection;
use crate::socket::connectjob::ConnectJob;
use bytes::{Bytes, BytesMut};

/// Internal state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CreateStream,
    SendRequest,
    ReadHeaders,
    ReadBody,
    Done,
}

impl State {
    /// Map internal state to public LoadState.
    fn to_load_state(self) -> LoadState {
        match self {
            State::Idle => LoadState::Idle,
            State::CreateStream => LoadState::Connecting,
            State::SendRequest => LoadState::SendingRequest,
            State::ReadHeaders => LoadState::WaitingForResponse,
            State::ReadBody => LoadState::ReadingResponse,
            State::Done => LoadState::Idle,
        }
    }
}

/// One request/response exchange over a connection it owns.
///
/// The request always carries `Connection: close`, so the response is read
/// until the peer closes. The connection is released before the body is
/// decoded and on every error path.
#[derive(Debug)]
pub struct HttpTransaction {
    state: State,
    headers: HeaderParser,
    raw: BytesMut,
}

impl Default for HttpTransaction {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransaction {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            headers: HeaderParser::new(),
            raw: BytesMut::new(),
        }
    }

    /// Get the current load state (for progress reporting).
    pub fn get_load_state(&self) -> LoadState {
        self.state.to_load_state()
    }

    /// Connect with `job`, then run the exchange.
    pub fn exchange(
        &mut self,
        request: &HttpRequest,
        job: &ConnectJob<'_>,
    ) -> Result<HttpResponse, NetError> {
        // Nothing is opened for a request that cannot be written.
        let wire = request.serialize()?;

        self.reset();
        self.state = State::CreateStream;
        let conn = match job.connect(&request.target.host, request.target.port) {
            Ok(conn) => conn,
            Err(e) => {
                self.state = State::Done;
                return Err(e);
            }
        };
        self.run(wire, conn, request)
    }

    /// Run the exchange over an already open connection.
    pub fn exchange_over(
        &mut self,
        request: &HttpRequest,
        conn: Connection,
    ) -> Result<HttpResponse, NetError> {
        let wire = request.serialize()?;
        self.reset();
        self.run(wire, conn, request)
    }

    fn reset(&mut self) {
        self.headers = HeaderParser::new();
        self.raw.clear();
    }

    fn run(
        &mut self,
        wire: Bytes,
        mut conn: Connection,
        request: &HttpRequest,
    ) -> Result<HttpResponse, NetError> {
        self.state = State::SendRequest;
        let result = self.do_loop(&wire, &mut conn);
        conn.disconnect();
        self.state = State::Done;
        result?;

        if self.raw.is_empty() {
            return Err(NetError::EmptyResponse);
        }
        if !self.headers.done() {
            return Err(NetError::ResponseHeadersTruncated);
        }

        let reader = BodyReader::for_response(&self.headers, &request.method)?;
        let raw = self.raw.split().freeze();
        let body = reader.read(&raw[self.headers.length()..])?;
        tracing::debug!(
            code = self.headers.code(),
            header_length = self.headers.length(),
            body_length = body.len(),
            "exchange complete"
        );

        let headers = std::mem::take(&mut self.headers);
        Ok(HttpResponse::new(headers, body))
    }

    fn do_loop(&mut self, wire: &[u8], conn: &mut Connection) -> Result<(), NetError> {
        loop {
            match self.state {
                State::SendRequest => {
                    conn.write(wire)?;
                    tracing::debug!(
                        host = %conn.host(),
                        port = conn.port(),
                        bytes = wire.len(),
                        "request sent"
                    );
                    self.state = State::ReadHeaders;
                }
                State::ReadHeaders | State::ReadBody => {
                    let fragment = conn.read()?;
                    if fragment.is_empty() {
                        return Ok(());
                    }
                    if !self.headers.done() {
                        self.headers.append(&fragment);
                        if self.headers.done() {
                            self.state = State::ReadBody;
                        }
                    }
                    self.raw.extend_from_slice(&fragment);
                }
                State::Idle | State::CreateStream | State::Done => return Ok(()),
            }
        }
    }
}
