//! TCP request server: one client connection at a time.
//!
//! `next_request` accepts a connection if none is open, then reads the next
//! frame from it.  When the client disconnects or sends an invalid frame the
//! connection is dropped and the next client is accepted; the request loop
//! never sees those per-connection failures.  Further clients wait in the
//! listen backlog while one is being served.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use keyrelay_core::DEFAULT_MAX_FRAME_BYTES;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::application::serve_requests::{RequestTransport, TransportError};
use crate::infrastructure::network::{read_frame, write_frame};

/// Pause after a failed `accept` so a persistent error (e.g. too many open
/// files) does not spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Limit for outgoing replies.  Independent of the request limit: replies
/// are small and bounded, and `RelayClient` reads them with this limit.
const REPLY_FRAME_LIMIT: usize = DEFAULT_MAX_FRAME_BYTES;

/// Listening socket plus the client currently being served.
pub struct TcpRequestServer {
    listener: TcpListener,
    connection: Option<(TcpStream, SocketAddr)>,
    max_frame_bytes: usize,
}

impl TcpRequestServer {
    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the address cannot be bound (port in
    /// use, missing permission).
    pub async fn bind(addr: SocketAddr, max_frame_bytes: usize) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        info!("listening for requests on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            connection: None,
            max_frame_bytes,
        })
    }

    /// The bound address; useful when binding to port 0.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the OS cannot report the address.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Peer address of the client being served, if any.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.connection.as_ref().map(|(_, peer)| *peer)
    }

    async fn accept(&mut self) {
        match self.listener.accept().await {
            Ok((stream, peer)) => {
                info!("client connected from {peer}");
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("could not set TCP_NODELAY for {peer}: {e}");
                }
                self.connection = Some((stream, peer));
            }
            Err(e) => {
                error!("accept error: {e}");
                time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

#[async_trait]
impl RequestTransport for TcpRequestServer {
    async fn next_request(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            if self.connection.is_none() {
                self.accept().await;
                continue;
            }
            let Some((stream, peer)) = self.connection.as_mut() else {
                continue;
            };
            let peer = *peer;

            match read_frame(stream, self.max_frame_bytes).await {
                Ok(Some(body)) => return Ok(Some(body)),
                Ok(None) => {
                    info!("client {peer} disconnected");
                    self.connection = None;
                }
                Err(e) => {
                    warn!("dropping client {peer}: {e}");
                    self.connection = None;
                }
            }
        }
    }

    async fn send_reply(&mut self, reply: &str) -> Result<(), TransportError> {
        let Some((stream, peer)) = self.connection.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        let peer = *peer;

        if let Err(e) = write_frame(stream, reply, REPLY_FRAME_LIMIT).await {
            warn!("dropping client {peer} after reply failure: {e}");
            self.connection = None;
            return Err(e);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
