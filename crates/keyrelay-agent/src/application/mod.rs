//! Application layer use cases for the agent.
//!
//! - **`dispatch_command`** – Maps a decoded `Command` to an `InputEvent` and
//!   hands it to an [`dispatch_command::InputInjector`] supplied at
//!   construction time.  Owns the kind-to-handler table and the
//!   "unsupported" fallback.
//!
//! - **`serve_requests`** – The request loop: receive a payload from a
//!   [`serve_requests::RequestTransport`], decode, dispatch, reply, repeat.
//!   Both collaborators are injected so the loop runs in tests without a
//!   socket or a real input queue.

pub mod dispatch_command;
pub mod serve_requests;
