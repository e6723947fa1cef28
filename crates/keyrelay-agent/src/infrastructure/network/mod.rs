//! Network infrastructure for the agent.
//!
//! Architecture:
//! - [`server::TcpRequestServer`] owns the listening socket and at most one
//!   client connection.  It implements `RequestTransport` so the request loop
//!   never touches sockets directly.
//! - [`client::RelayClient`] is the controller side: send one command, read
//!   one reply.
//!
//! Both sides use the length-prefixed frames from `keyrelay_core::protocol::frame`.

pub mod client;
pub mod server;

use keyrelay_core::protocol::frame::{body_len, encode_frame};
use keyrelay_core::LENGTH_PREFIX_SIZE;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::serve_requests::TransportError;

/// Default TCP port the agent listens on.
pub const DEFAULT_PORT: u16 = 7331;

/// Reads one frame body.
///
/// Returns `Ok(None)` when the peer closes the connection before a new
/// length prefix arrives.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    if let Err(e) = reader.read_exact(&mut prefix).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(e.into());
    }

    let len = body_len(prefix, max_len)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Writes `body` as one frame and flushes it.
pub async fn write_frame<W>(writer: &mut W, body: &str, max_len: usize) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(body, max_len)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
