use crate::request::Request;
use bytes::Bytes;
use thiserror::Error;

/// Raw exchange result handed back by a transport, before any cache
/// bookkeeping. Headers keep their wire order and duplicates.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Failures from the underlying HTTP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Executes HTTP requests. Implemented outside this crate; the client only
/// depends on the exchange, not on how it happens. Connection and read
/// timeouts belong to the implementation, never to the cache.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<TransportResponse, TransportError>;
}
