// Background accept for the hosting peer
// The UI thread keeps drawing the waiting screen while one helper thread
// blocks in accept. The accepted stream is handed over exactly once.

use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use super::error::TransportError;
use super::transport::{Channel, Listener};

type AcceptResult = Result<Channel, TransportError>;

/// A connection that is still being accepted on a helper thread
pub struct PendingAccept {
    rx: mpsc::Receiver<AcceptResult>,
    handle: Option<JoinHandle<()>>,
    addr: SocketAddr,
}

/// Move the blocking accept onto its own thread
pub fn spawn_accept(listener: Listener) -> std::io::Result<PendingAccept> {
    let addr = listener.local_addr();
    let (tx, rx) = mpsc::sync_channel(1);

    let handle = thread::Builder::new()
        .name("lanpong-accept".to_string())
        .spawn(move || {
            let result = listener.accept();
            // The receiver is gone if the host cancelled; the stream just drops
            if tx.send(result).is_err() {
                debug!("accept finished after the wait was cancelled");
            }
        })?;

    Ok(PendingAccept {
        rx,
        handle: Some(handle),
        addr,
    })
}

impl PendingAccept {
    /// Address the host should share with the joining player
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the peer connects
    pub fn wait(mut self) -> AcceptResult {
        let result = self.rx.recv().unwrap_or_else(|_| Err(accept_thread_died()));
        self.join();
        result
    }

    /// Wait at most `timeout`. `None` means no peer yet; call again next frame.
    pub fn poll(&mut self, timeout: Duration) -> Option<AcceptResult> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.join();
                Some(Err(accept_thread_died()))
            }
        }
    }

    /// Stop waiting. A throwaway local connection wakes the blocked accept so
    /// the helper thread exits and the port is released.
    pub fn cancel(mut self) {
        if let Err(e) = TcpStream::connect(self.addr) {
            warn!("failed to wake accept thread on {}: {}", self.addr, e);
            return;
        }
        self.join();
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("accept thread panicked");
            }
        }
    }
}

fn accept_thread_died() -> TransportError {
    TransportError::Accept(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "accept thread exited without a result",
    ))
}
