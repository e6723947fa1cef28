//! RelayService: the sequential request/response loop.
//!
//! ```text
//! loop {
//!     payload = transport.next_request()   // blocks until a request arrives
//!     reply   = decode -> dispatch -> Reply
//!     transport.send_reply(reply)
//! }
//! ```
//!
//! One request is fully handled and answered before the next one is read,
//! so there is never more than one command in flight.  A failure while
//! handling one request is turned into a reply and logged; it never ends the
//! loop.  Only a transport that reports itself closed (`Ok(None)`) or an
//! unrecoverable transport error stops [`RelayService::run`].

use async_trait::async_trait;
use keyrelay_core::protocol::frame::body_to_text;
use keyrelay_core::{decode, FrameError, Reply, ReplyStatus};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::dispatch_command::{DispatchOutcome, EventDispatcher};

/// Sent if a reply cannot be serialised; keeps the one-reply-per-request contract.
const FALLBACK_REPLY: &str = r#"{"status":"failed"}"#;

/// Errors reported by a [`RequestTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("framing error: {0}")]
    Frame(#[from] FrameError),
    /// A reply was sent while no client connection is open.
    #[error("no client connection is open")]
    NotConnected,
}

/// Source of request payloads and sink for replies.
///
/// Infrastructure implements this over TCP; tests use an in-memory script.
#[async_trait]
pub trait RequestTransport: Send {
    /// Waits for the next request body.
    ///
    /// Returns `Ok(None)` once the transport is closed for good.  Errors are
    /// treated as unrecoverable by the loop, so implementations should recover
    /// from per-connection problems themselves.
    async fn next_request(&mut self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Sends the reply for the request most recently returned by `next_request`.
    async fn send_reply(&mut self, reply: &str) -> Result<(), TransportError>;
}

/// Per-outcome request counters, reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub requests: u64,
    pub injected: u64,
    pub failed: u64,
    pub unsupported: u64,
    pub rejected: u64,
    pub malformed: u64,
}

impl RelayStats {
    fn record(&mut self, status: ReplyStatus) {
        self.requests += 1;
        let counter = match status {
            ReplyStatus::Ok => &mut self.injected,
            ReplyStatus::Failed => &mut self.failed,
            ReplyStatus::Unsupported => &mut self.unsupported,
            ReplyStatus::Rejected => &mut self.rejected,
            ReplyStatus::Malformed => &mut self.malformed,
        };
        *counter += 1;
    }
}

/// The composed endpoint: a transport plus a dispatcher.
pub struct RelayService<T: RequestTransport> {
    transport: T,
    dispatcher: EventDispatcher,
    stats: RelayStats,
}

impl<T: RequestTransport> RelayService<T> {
    pub fn new(transport: T, dispatcher: EventDispatcher) -> Self {
        Self {
            transport,
            dispatcher,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Runs the request loop until the transport closes.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] that made `next_request` fail.  Failures
    /// while sending a single reply are logged and the loop continues.
    pub async fn run(&mut self) -> Result<(), TransportError> {
        info!("request loop started");

        while let Some(payload) = self.transport.next_request().await? {
            let reply = self.handle_payload(payload);
            let body = reply.to_json().unwrap_or_else(|e| {
                error!("failed to serialise reply: {e}");
                FALLBACK_REPLY.to_string()
            });

            if let Err(e) = self.transport.send_reply(&body).await {
                warn!("failed to send reply: {e}");
            }
        }

        info!("request loop stopped: {:?}", self.stats);
        Ok(())
    }

    /// Decodes and dispatches one payload and returns the reply to send.
    pub fn handle_payload(&mut self, payload: Vec<u8>) -> Reply {
        let reply = self.reply_for(payload);
        self.stats.record(reply.status);
        reply
    }

    fn reply_for(&self, payload: Vec<u8>) -> Reply {
        let text = match body_to_text(payload) {
            Ok(text) => text,
            Err(e) => {
                warn!("discarding request: {e}");
                return Reply::with_detail(ReplyStatus::Malformed, "payload is not valid UTF-8");
            }
        };

        let cmd = match decode(&text) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("discarding request: {e}");
                return Reply::with_detail(ReplyStatus::Malformed, e.to_string());
            }
        };
        debug!("decoded {:?}", cmd);

        match self.dispatcher.dispatch(&cmd) {
            DispatchOutcome::Injected { delivered: true } => Reply::ok(),
            DispatchOutcome::Injected { delivered: false } => Reply::with_detail(
                ReplyStatus::Failed,
                format!("the platform refused the {} event", cmd.kind),
            ),
            DispatchOutcome::Unsupported { kind } => {
                Reply::with_detail(ReplyStatus::Unsupported, kind.to_string())
            }
            DispatchOutcome::Rejected { reason } => {
                Reply::with_detail(ReplyStatus::Rejected, reason)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
