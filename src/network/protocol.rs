// LANPong wire protocol
// Every frame on the stream carries exactly one of these messages

use bincode::Options;
use serde::{Deserialize, Serialize};

use super::error::DecodeError;
use super::transport::MAX_FRAME_LEN;
use crate::game::GamePhase;

/// Authoritative table state, sent by the host every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStateRecord {
    /// The host's paddle
    pub paddle: f32,
    pub phase: GamePhase,
    pub ball_x: f32,
    pub ball_y: f32,
    pub server_score: u8,
    pub client_score: u8,
}

/// The four payload shapes the protocol uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    /// Host to client, once per tick
    State(GameStateRecord),

    /// A session parameter during negotiation, or the client's paddle echo
    Number(f64),

    /// Free text; accepted as an acknowledgement placeholder
    Text(String),

    /// Empty acknowledgement during negotiation
    Ack,
}

impl WireMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::State(_) => "state",
            WireMessage::Number(_) => "number",
            WireMessage::Text(_) => "text",
            WireMessage::Ack => "ack",
        }
    }

    /// Serialize message to bytes for one frame
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        codec().serialize(self)
    }

    /// Deserialize a whole frame. Short, long, or unknown payloads are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(codec().deserialize(bytes)?)
    }
}

// Fixed-width little-endian fields; the frame must be consumed exactly
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_FRAME_LEN as u64)
        .reject_trailing_bytes()
}

pub fn encode(message: &WireMessage) -> Result<Vec<u8>, bincode::Error> {
    message.to_bytes()
}

pub fn decode(bytes: &[u8]) -> Result<WireMessage, DecodeError> {
    WireMessage::from_bytes(bytes)
}

pub fn decode_state(bytes: &[u8]) -> Result<GameStateRecord, DecodeError> {
    match decode(bytes)? {
        WireMessage::State(record) => Ok(record),
        other => Err(unexpected("state", &other)),
    }
}

pub fn decode_number(bytes: &[u8]) -> Result<f64, DecodeError> {
    match decode(bytes)? {
        WireMessage::Number(value) => Ok(value),
        other => Err(unexpected("number", &other)),
    }
}

pub fn decode_text(bytes: &[u8]) -> Result<String, DecodeError> {
    match decode(bytes)? {
        WireMessage::Text(text) => Ok(text),
        other => Err(unexpected("text", &other)),
    }
}

/// An acknowledgement is `Ack`, or a `Text` placeholder from older peers
pub fn decode_ack(bytes: &[u8]) -> Result<(), DecodeError> {
    match decode(bytes)? {
        WireMessage::Ack | WireMessage::Text(_) => Ok(()),
        other => Err(unexpected("ack", &other)),
    }
}

fn unexpected(expected: &'static str, found: &WireMessage) -> DecodeError {
    DecodeError::UnexpectedMessage {
        expected,
        found: found.kind(),
    }
}
