//! Controller-side client: send a command, wait for the reply.
//!
//! Used by the `send` subcommand and by the integration tests.  The
//! connection stays open, so several commands can be sent in sequence.

use std::net::SocketAddr;

use keyrelay_core::{Command, Reply, DEFAULT_MAX_FRAME_BYTES};
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::debug;

use crate::application::serve_requests::TransportError;
use crate::infrastructure::network::{read_frame, write_frame};

/// Errors that can occur while talking to an agent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// TCP connection to the agent failed.
    #[error("failed to connect to agent at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The command could not be serialised.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),
    /// The agent's reply was not a valid reply object.
    #[error("invalid reply: {0}")]
    InvalidReply(#[from] serde_json::Error),
    /// The agent closed the connection instead of replying.
    #[error("connection closed by agent")]
    Closed,
}

/// An open connection to an agent.
pub struct RelayClient {
    stream: TcpStream,
}

impl RelayClient {
    /// Connects to the agent at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConnectFailed`] if the TCP connection fails.
    pub async fn connect(addr: SocketAddr) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::ConnectFailed { addr, source })?;
        Ok(Self { stream })
    }

    /// Sends `cmd` and waits for its reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on I/O failure, a closed connection, or an
    /// unparseable reply.
    pub async fn send(&mut self, cmd: &Command) -> Result<Reply, ClientError> {
        let payload = cmd.to_json().map_err(ClientError::Encode)?;
        self.send_raw(&payload).await
    }

    /// Sends an arbitrary payload (valid or not) and waits for the reply.
    ///
    /// # Errors
    ///
    /// Same as [`RelayClient::send`].
    pub async fn send_raw(&mut self, payload: &str) -> Result<Reply, ClientError> {
        debug!("sending {payload}");
        write_frame(&mut self.stream, payload, DEFAULT_MAX_FRAME_BYTES).await?;

        let body = read_frame(&mut self.stream, DEFAULT_MAX_FRAME_BYTES)
            .await?
            .ok_or(ClientError::Closed)?;
        let text = String::from_utf8_lossy(&body);
        Ok(Reply::from_json(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_to_closed_port_fails_with_address() {
        // Arrange: bind then drop a listener so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        // Act
        let result = RelayClient::connect(addr).await;

        // Assert
        match result {
            Err(ClientError::ConnectFailed { addr: failed, .. }) => assert_eq!(failed, addr),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect must fail"),
        }
    }

    #[tokio::test]
    async fn test_send_reports_closed_when_agent_hangs_up() {
        // Arrange: a peer that reads one frame and closes without replying
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut stream, DEFAULT_MAX_FRAME_BYTES).await;
        });
        let mut client = RelayClient::connect(addr).await.unwrap();

        // Act
        let result = client.send(&Command::key_down(13)).await;

        // Assert
        assert!(matches!(result, Err(ClientError::Closed)));
    }
}
