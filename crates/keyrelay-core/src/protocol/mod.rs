//! Command protocol: request payloads, replies, and socket framing.
//!
//! - [`command`] – the typed [`command::Command`] and its wire shape.
//! - [`decode`] – the strict payload decoder.
//! - [`reply`] – the informational reply sent back after every request.
//! - [`frame`] – 4-byte big-endian length prefix plus UTF-8 body.

pub mod command;
pub mod decode;
pub mod frame;
pub mod reply;
