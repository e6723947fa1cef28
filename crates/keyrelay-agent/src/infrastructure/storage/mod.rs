//! Configuration storage.
//!
//! - **`config`** – `AgentConfig` schema, TOML loading, and platform config
//!   file location.

pub mod config;
