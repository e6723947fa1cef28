//! keyrelay-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do? (for beginners)
//!
//! The agent runs on the machine that should *receive* input.  A controller
//! elsewhere on the network connects to it and sends one small JSON command
//! per request, such as "press virtual key 13".  For every request the agent:
//!
//! 1. Decodes the payload into a typed `Command` (`keyrelay_core::decode`).
//! 2. Maps the command to an `InputEvent` descriptor, or decides the command
//!    is unsupported.
//! 3. Hands the descriptor to the platform injector (`SendInput` on Windows).
//! 4. Sends back exactly one reply frame, then waits for the next request.
//!
//! Nothing that goes wrong with a single request stops the loop.

/// Application layer: command dispatch and the request loop.
pub mod application;

/// Infrastructure layer: OS injectors, TCP transport, configuration.
pub mod infrastructure;
