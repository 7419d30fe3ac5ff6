use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Failures of the stream connection itself.
///
/// `Bind`, `Connect` and `Accept` happen while a session is being set up;
/// `Send` and `Receive` end a running session.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to accept a peer: {0}")]
    Accept(#[source] io::Error),
    #[error("send failed: {0}")]
    Send(#[source] io::Error),
    #[error("receive failed: {0}")]
    Receive(#[source] io::Error),
}

impl TransportError {
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            TransportError::Bind { .. } | TransportError::Connect { .. } | TransportError::Accept(_)
        )
    }
}

/// A frame arrived intact but its payload is not what the protocol expects.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] bincode::Error),
    #[error("expected {expected} message, got {found}")]
    UnexpectedMessage {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to encode message: {0}")]
    Encode(#[source] bincode::Error),
    #[error("presentation shell failed: {0}")]
    Shell(#[source] io::Error),
    #[error("session parameters have not been negotiated")]
    NotNegotiated,
}

impl SessionError {
    /// True when the connection was never established
    pub fn is_setup(&self) -> bool {
        match self {
            SessionError::Transport(e) => e.is_setup(),
            _ => false,
        }
    }
}
