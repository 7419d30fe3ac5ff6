// Stream transport for LANPong
// One TCP connection per session, carrying length-prefixed frames

use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, trace, warn};

use super::error::TransportError;

/// Fixed service port used when the config does not override it
pub const DEFAULT_PORT: u16 = 5555;

/// Largest payload accepted in one frame. Game traffic is a few dozen bytes;
/// anything near this is a corrupt header.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

const HEADER_LEN: usize = 4;

/// Only one peer may ever be waiting on the listen queue
const LISTEN_BACKLOG: i32 = 1;

/// Listening socket held by the hosting peer until its single opponent connects
pub struct Listener {
    inner: TcpListener,
    addr: SocketAddr,
}

impl Listener {
    pub fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let bind_err = |source| TransportError::Bind { addr, source };

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(bind_err)?;
        socket.set_reuse_address(true).map_err(bind_err)?;
        socket.bind(&addr.into()).map_err(bind_err)?;
        socket.listen(LISTEN_BACKLOG).map_err(bind_err)?;

        let inner: TcpListener = socket.into();
        let addr = inner.local_addr().map_err(bind_err)?;
        info!("listening for a peer on {}", addr);
        Ok(Self { inner, addr })
    }

    /// Address actually bound (resolves port 0 to the assigned port)
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until one peer connects. The listener is consumed and closed
    /// here, so no second peer can queue up behind the first.
    pub fn accept(self) -> Result<Channel, TransportError> {
        let (stream, peer) = self.inner.accept().map_err(TransportError::Accept)?;
        info!("accepted peer {}", peer);
        Channel::from_stream(stream).map_err(TransportError::Accept)
    }
}

/// Bind the service port on this host's LAN-facing address and wait for one peer
pub fn listen_and_accept(port: u16) -> Result<Channel, TransportError> {
    Listener::bind(SocketAddr::new(discover_host_ip(), port))?.accept()
}

/// Address other machines on the LAN can reach this host at.
/// Falls back to loopback when no interface qualifies.
pub fn discover_host_ip() -> IpAddr {
    match if_addrs::get_if_addrs() {
        Ok(interfaces) => {
            let candidates: Vec<IpAddr> = interfaces.iter().map(|iface| iface.ip()).collect();
            let ip = pick_host_ip(&candidates);
            debug!("host address {} chosen from {:?}", ip, candidates);
            ip
        }
        Err(e) => {
            warn!("failed to list network interfaces: {}", e);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

// Private IPv4 first, then any other non-loopback IPv4, then loopback
fn pick_host_ip(candidates: &[IpAddr]) -> IpAddr {
    let v4: Vec<Ipv4Addr> = candidates
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(*v4),
            _ => None,
        })
        .collect();

    v4.iter()
        .find(|ip| ip.is_private())
        .or_else(|| v4.first())
        .map(|ip| IpAddr::V4(*ip))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// The established stream between the two peers
pub struct Channel {
    stream: Option<TcpStream>,
    peer: SocketAddr,
}

impl Channel {
    fn from_stream(stream: TcpStream) -> io::Result<Self> {
        // Frames are tiny and sent every tick; don't let Nagle hold them back
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        Ok(Self {
            stream: Some(stream),
            peer,
        })
    }

    /// Open a stream to `host` on `port`. No timeout is applied.
    pub fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let target = format!("{}:{}", host.trim(), port);
        let connect_err = |source| TransportError::Connect {
            addr: target.clone(),
            source,
        };

        let addrs: Vec<SocketAddr> = (host.trim(), port)
            .to_socket_addrs()
            .map_err(connect_err)?
            .collect();
        info!("connecting to {}", target);

        let stream = TcpStream::connect(&addrs[..]).map_err(connect_err)?;
        let channel = Self::from_stream(stream).map_err(connect_err)?;
        info!("connected to {}", channel.peer);
        Ok(channel)
    }

    pub fn connect_addr(addr: SocketAddr) -> Result<Self, TransportError> {
        Self::connect(&addr.ip().to_string(), addr.port())
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Write one frame: a 4-byte big-endian length, then the payload.
    /// Header and payload go out in a single write.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(TransportError::Send(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "payload of {} bytes exceeds frame limit {}",
                    payload.len(),
                    MAX_FRAME_LEN
                ),
            )));
        }
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TransportError::Send(closed_error()))?;

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        frame.extend_from_slice(payload);

        stream.write_all(&frame).map_err(TransportError::Send)?;
        stream.flush().map_err(TransportError::Send)?;
        trace!("sent frame of {} bytes", payload.len());
        Ok(())
    }

    /// Block until one whole frame has arrived and return its payload
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TransportError::Receive(closed_error()))?;

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).map_err(receive_error)?;
        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::Receive(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame length {} exceeds limit {}", len, MAX_FRAME_LEN),
            )));
        }

        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).map_err(receive_error)?;
        trace!("received frame of {} bytes", len);
        Ok(payload)
    }

    /// Shut the stream down. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // The peer may already be gone
            let _ = stream.shutdown(std::net::Shutdown::Both);
            debug!("closed connection to {}", self.peer);
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.close();
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "connection already closed")
}

// EOF mid-frame means the peer went away
fn receive_error(e: io::Error) -> TransportError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        TransportError::Receive(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "peer closed the connection",
        ))
    } else {
        TransportError::Receive(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    /// Connected pair over loopback: (accepted side, connecting side)
    fn channel_pair() -> (Channel, Channel) {
        let listener = Listener::bind(loopback()).unwrap();
        let addr = listener.local_addr();
        let acceptor = thread::spawn(move || listener.accept().unwrap());
        let client = Channel::connect_addr(addr).unwrap();
        (acceptor.join().unwrap(), client)
    }

    #[test]
    fn test_frames_of_every_size_arrive_intact() {
        let (mut server, mut client) = channel_pair();
        let large: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let payloads: Vec<Vec<u8>> = vec![vec![], vec![7], large];

        for payload in &payloads {
            client.send(payload).unwrap();
        }
        for payload in &payloads {
            assert_eq!(&server.receive().unwrap(), payload);
        }
    }

    #[test]
    fn test_frame_reassembled_from_trickled_writes() {
        let listener = Listener::bind(loopback()).unwrap();
        let addr = listener.local_addr();
        let writer = thread::spawn(move || {
            let mut raw = TcpStream::connect(addr).unwrap();
            let payload = vec![0xAB; 5000];
            let mut frame = (payload.len() as u32).to_be_bytes().to_vec();
            frame.extend_from_slice(&payload);
            for chunk in frame.chunks(333) {
                raw.write_all(chunk).unwrap();
                raw.flush().unwrap();
                thread::sleep(Duration::from_millis(1));
            }
        });

        let mut channel = listener.accept().unwrap();
        let received = channel.receive().unwrap();
        writer.join().unwrap();
        assert_eq!(received.len(), 5000);
        assert!(received.iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn test_coalesced_frames_are_split() {
        let listener = Listener::bind(loopback()).unwrap();
        let addr = listener.local_addr();
        let writer = thread::spawn(move || {
            let mut raw = TcpStream::connect(addr).unwrap();
            let mut bytes = Vec::new();
            for payload in [&b"one"[..], &b""[..], &b"three"[..]] {
                bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
                bytes.extend_from_slice(payload);
            }
            raw.write_all(&bytes).unwrap();
        });

        let mut channel = listener.accept().unwrap();
        assert_eq!(channel.receive().unwrap(), b"one");
        assert_eq!(channel.receive().unwrap(), b"");
        assert_eq!(channel.receive().unwrap(), b"three");
        writer.join().unwrap();
    }

    #[test]
    fn test_peer_close_is_receive_error() {
        let (mut server, mut client) = channel_pair();
        client.close();
        match server.receive() {
            Err(TransportError::Receive(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected receive error, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_oversized_header_rejected() {
        let listener = Listener::bind(loopback()).unwrap();
        let addr = listener.local_addr();
        let writer = thread::spawn(move || {
            let mut raw = TcpStream::connect(addr).unwrap();
            raw.write_all(&u32::MAX.to_be_bytes()).unwrap();
            raw
        });

        let mut channel = listener.accept().unwrap();
        match channel.receive() {
            Err(TransportError::Receive(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected receive error, got {:?}", other.map(|p| p.len())),
        }
        drop(writer.join().unwrap());
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let (mut server, _client) = channel_pair();
        server.close();
        server.close();
        assert!(!server.is_open());
        assert!(matches!(server.send(b"x"), Err(TransportError::Send(_))));
        assert!(matches!(server.receive(), Err(TransportError::Receive(_))));
    }

    #[test]
    fn test_bind_conflict_is_bind_error() {
        let first = Listener::bind(loopback()).unwrap();
        let taken = first.local_addr();
        // SO_REUSEADDR does not allow two live listeners on one port
        match Listener::bind(taken) {
            Err(e @ TransportError::Bind { .. }) => assert!(e.is_setup()),
            Err(e) => panic!("expected bind error, got {}", e),
            Ok(_) => panic!("second bind on {} should fail", taken),
        }
    }

    #[test]
    fn test_connect_refused_is_connect_error() {
        // Grab a free port, then release it so nothing is listening
        let port = Listener::bind(loopback()).unwrap().local_addr().port();
        match Channel::connect("127.0.0.1", port) {
            Err(e @ TransportError::Connect { .. }) => assert!(e.is_setup()),
            Err(e) => panic!("expected connect error, got {}", e),
            Ok(_) => panic!("connect to closed port {} succeeded", port),
        }
    }

    #[test]
    fn test_pick_host_ip_prefers_private_v4() {
        let candidates: Vec<IpAddr> = vec![
            "127.0.0.1".parse().unwrap(),
            "::1".parse().unwrap(),
            "203.0.113.9".parse().unwrap(),
            "192.168.1.20".parse().unwrap(),
        ];
        assert_eq!(pick_host_ip(&candidates), "192.168.1.20".parse::<IpAddr>().unwrap());
        assert_eq!(
            pick_host_ip(&candidates[..3]),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            pick_host_ip(&candidates[..2]),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }
}
