/// Progress of a single request/response exchange.
/// Loosely follows net/base/load_states.h, reduced to the steps one
/// non-pooled HTTP/1.1 exchange actually goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No exchange in progress.
    #[default]
    Idle,

    /// Resolving the host, connecting, and the TLS handshake if any.
    Connecting,

    /// Sending the HTTP request.
    SendingRequest,

    /// Waiting for the header block to complete.
    WaitingForResponse,

    /// Reading the response body until the peer closes.
    ReadingResponse,
}
