//! Platform-neutral input event model.
//!
//! The dispatcher in the agent turns a [`crate::Command`] into an
//! [`input_event::InputEvent`]; the platform injector turns that into the
//! OS structure.  Nothing here performs I/O.

pub mod input_event;
