//! TOML-based configuration for the agent.
//!
//! Reads `AgentConfig` from an explicit path or from the platform-appropriate
//! config file:
//! - Windows:  `%APPDATA%\keyrelay\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/keyrelay/config.toml` or `~/.config/keyrelay/config.toml`
//! - macOS:    `~/Library/Application Support/keyrelay/config.toml`
//!
//! Example:
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0"
//! port = 7331
//!
//! [dispatch]
//! mouse_enabled = true
//! pointer_mode = "relative"
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = "...")]`, so an empty file, a missing
//! section, or a missing default file all yield the built-in defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use keyrelay_core::DEFAULT_MAX_FRAME_BYTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch_command::{DispatchPolicy, PointerMode};
use crate::infrastructure::network::DEFAULT_PORT;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    /// `max_frame_bytes` is zero.
    #[error("max_frame_bytes must be greater than zero")]
    ZeroFrameLimit,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest request body accepted before the connection is dropped.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

/// Command-to-event mapping options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Map MouseDown/MouseUp/MouseMove instead of answering "unsupported".
    #[serde(default)]
    pub mouse_enabled: bool,
    #[serde(default)]
    pub pointer_mode: PointerMode,
    /// Set the extended-key flag for navigation keys and right-hand modifiers.
    #[serde(default)]
    pub mark_extended_keys: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is not set, e.g. `"info"` or
    /// `"keyrelay_agent=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_max_frame_bytes() -> usize {
    DEFAULT_MAX_FRAME_BYTES
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl NetworkConfig {
    /// Combines `bind_address` and `port` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not an
    /// IPv4 or IPv6 address, or [`ConfigError::ZeroFrameLimit`] for a zero
    /// frame limit.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::ZeroFrameLimit);
        }
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl From<&DispatchConfig> for DispatchPolicy {
    fn from(cfg: &DispatchConfig) -> Self {
        Self {
            mouse_enabled: cfg.mouse_enabled,
            pointer_mode: cfg.pointer_mode,
            mark_extended_keys: cfg.mark_extended_keys,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has the
/// wrong type.
pub fn parse_config(content: &str) -> Result<AgentConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads configuration from an explicit path.  The file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is malformed.
pub fn load_config_from(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Loads configuration from the platform config file, returning
/// `AgentConfig::default()` if it does not exist (or no config directory can
/// be determined).
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_default_config() -> Result<AgentConfig, ConfigError> {
    let Some(path) = config_file_path() else {
        return Ok(AgentConfig::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Loads from `path` when given, otherwise from the platform default location.
///
/// # Errors
///
/// See [`load_config_from`] and [`load_default_config`].
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    match path {
        Some(path) => load_config_from(path),
        None => load_default_config(),
    }
}

/// Full path to the platform config file, if a config directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join("config.toml"))
}

/// Resolves the platform config directory including the `keyrelay` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("keyrelay"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("keyrelay")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("keyrelay"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
