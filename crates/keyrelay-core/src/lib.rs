//! # keyrelay-core
//!
//! Shared library for keyrelay containing the command protocol, the frame
//! codec used on the socket, and the platform-neutral input event model.
//!
//! This crate is used by the agent binary, its client, and the tests.
//! It has zero dependencies on OS APIs or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! keyrelay is a remote input endpoint: a program elsewhere on the network
//! sends small JSON commands such as `{"Type":"KeyDown","Data":13}` and the
//! agent replays them as real keyboard (and optionally mouse) input on the
//! machine it runs on.
//!
//! - **`protocol`** – What travels over the socket.  A request is one JSON
//!   object decoded into a typed [`Command`]; a reply is a small JSON
//!   [`Reply`].  Both are carried in length-prefixed frames.
//!
//! - **`domain`** – The [`InputEvent`] descriptor the agent builds from a
//!   command, together with the named keyboard and mouse flag sets.  The
//!   descriptor is a tagged enum; the OS-specific memory layout is only
//!   produced inside the platform injector.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `keyrelay_core::Command` instead of `keyrelay_core::protocol::command::Command`.
pub use domain::input_event::{
    DeviceClass, InputEvent, KeyboardFlags, KeyboardInput, MouseFlags, MouseInput,
};
pub use protocol::command::{Command, CommandKind};
pub use protocol::decode::{decode, DecodeError};
pub use protocol::frame::{FrameError, DEFAULT_MAX_FRAME_BYTES, LENGTH_PREFIX_SIZE};
pub use protocol::reply::{Reply, ReplyStatus, MAX_DETAIL_BYTES};
