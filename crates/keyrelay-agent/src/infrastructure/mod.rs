//! Infrastructure layer for the agent.
//!
//! Contains OS-facing adapters: input injection APIs, the TCP request
//! transport and client, and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `keyrelay_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`input_injection`** – Implementations of `InputInjector`.  The native
//!   one is selected at compile time with `#[cfg(target_os)]`; recording and
//!   dry-run injectors are always available.
//!
//! - **`network`** – TCP request server (one client at a time) and the
//!   matching client used by the `send` subcommand.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod input_injection;
pub mod network;
pub mod storage;
