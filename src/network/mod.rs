// LAN networking for LANPong
// Framed TCP transport, the wire codec, and the lock-step session on top

pub mod error;
pub mod handoff;
pub mod protocol;
pub mod session;
pub mod transport;

pub use error::{DecodeError, SessionError, TransportError};
pub use handoff::{spawn_accept, PendingAccept};
pub use protocol::{GameStateRecord, WireMessage};
pub use session::{
    create_session, ClientSession, ConnectionMode, Role, ServerSession, Session, Shell,
    TerminalSignal, View,
};
pub use transport::{discover_host_ip, Channel, Listener, DEFAULT_PORT};
