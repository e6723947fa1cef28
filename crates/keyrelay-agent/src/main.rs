//! keyrelay agent entry point.
//!
//! Listens for remote input commands and injects them as local keyboard
//! events.  The same binary also has a small `send` subcommand for sending a
//! single command to a running agent.
//!
//! # Usage
//!
//! ```text
//! keyrelay-agent [serve] [OPTIONS]
//!   --config <PATH>     Config file (default: platform config dir)
//!   --bind <IP>         Listener IP           [env: KEYRELAY_BIND]
//!   --port <PORT>       Listener port         [env: KEYRELAY_PORT]
//!   --log-level <LEVEL> Log filter when RUST_LOG is unset
//!   --dry-run           Log events instead of injecting them
//!   --enable-mouse      Map mouse commands instead of answering "unsupported"
//!
//! keyrelay-agent send --addr <HOST:PORT> <KIND> [--data N] [--x F] [--y F]
//! ```
//!
//! Command-line values override the config file; the config file overrides
//! the built-in defaults.
//!
//! # Architecture overview
//!
//! ```text
//! controller  (length-prefixed JSON over TCP, port 7331)
//!       ↕
//! keyrelay-agent  ← this process
//!   application/    RelayService request loop, EventDispatcher
//!   infrastructure/
//!     network/          TcpRequestServer, RelayClient
//!     input_injection/  SendInput (Windows), dry-run, unavailable
//!     storage/          TOML config
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use keyrelay_agent::application::dispatch_command::{DispatchPolicy, EventDispatcher, InputInjector};
use keyrelay_agent::application::serve_requests::RelayService;
use keyrelay_agent::infrastructure::input_injection::{dry_run::DryRunInjector, platform_injector};
use keyrelay_agent::infrastructure::network::client::RelayClient;
use keyrelay_agent::infrastructure::network::server::TcpRequestServer;
use keyrelay_agent::infrastructure::storage::config::{load_config, AgentConfig};
use keyrelay_core::{Command, CommandKind};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote keyboard/mouse input agent.
#[derive(Debug, Parser)]
#[command(
    name = "keyrelay-agent",
    about = "Receives remote input commands and injects them as local keyboard events",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,

    /// Options for `serve` when no subcommand is given.
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Run the agent (the default).
    Serve(ServeArgs),
    /// Send one command to a running agent and print its reply.
    Send(SendArgs),
}

#[derive(Debug, Clone, Default, Args)]
struct ServeArgs {
    /// Config file to load.  Must exist when given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// IP address to listen on, e.g. `0.0.0.0` or `127.0.0.1`.
    #[arg(long, env = "KEYRELAY_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "KEYRELAY_PORT")]
    port: Option<u16>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,

    /// Log each event instead of injecting it.
    #[arg(long)]
    dry_run: bool,

    /// Map MouseDown/MouseUp/MouseMove to pointer events.
    #[arg(long)]
    enable_mouse: bool,
}

#[derive(Debug, Clone, Args)]
struct SendArgs {
    /// Agent address.
    #[arg(long, default_value = "127.0.0.1:7331", env = "KEYRELAY_ADDR")]
    addr: SocketAddr,

    /// Command kind: KeyDown, KeyUp, MouseDown, MouseUp or MouseMove.
    kind: CommandKind,

    /// Virtual key code or mouse button selector.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    data: i32,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f64,
}

impl ServeArgs {
    /// Applies command-line overrides on top of the loaded config.
    fn apply_to(&self, config: &mut AgentConfig) {
        if let Some(bind) = &self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.enable_mouse {
            config.dispatch.mouse_enabled = true;
        }
    }
}

impl SendArgs {
    fn to_command(&self) -> Command {
        Command::new(self.kind, self.data, self.x, self.y)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(CliCommand::Send(args)) => {
            init_logging("warn");
            send(args).await
        }
        Some(CliCommand::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
    }
}

/// Installs the global `fmt` subscriber.  `RUST_LOG` wins over `fallback`.
fn init_logging(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(fallback))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    args.apply_to(&mut config);

    init_logging(&config.logging.level);

    let bind_addr = config
        .network
        .bind_addr()
        .context("invalid network configuration")?;
    let policy = DispatchPolicy::from(&config.dispatch);

    info!(
        "keyrelay agent v{} starting on {bind_addr} (mouse {}, dry-run {})",
        env!("CARGO_PKG_VERSION"),
        if policy.mouse_enabled { "enabled" } else { "disabled" },
        args.dry_run
    );

    let injector: Arc<dyn InputInjector> = if args.dry_run {
        Arc::new(DryRunInjector)
    } else {
        platform_injector()
    };

    let server = TcpRequestServer::bind(bind_addr, config.network.max_frame_bytes)
        .await
        .with_context(|| format!("failed to bind listener on {bind_addr}"))?;

    let mut service = RelayService::new(server, EventDispatcher::with_policy(injector, policy));

    tokio::select! {
        result = service.run() => {
            result.context("request loop failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
        }
    }

    info!("keyrelay agent stopped: {:?}", service.stats());
    Ok(())
}

async fn send(args: SendArgs) -> anyhow::Result<()> {
    let mut client = RelayClient::connect(args.addr).await?;
    let reply = client
        .send(&args.to_command())
        .await
        .with_context(|| format!("no reply from agent at {}", args.addr))?;

    println!("{}", reply.to_json().context("failed to format reply")?);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use keyrelay_agent::application::dispatch_command::PointerMode;

    #[test]
    fn test_cli_without_subcommand_serves_with_no_overrides() {
        // Arrange / Act
        let cli = Cli::parse_from(["keyrelay-agent"]);

        // Assert
        assert!(cli.command.is_none());
        assert!(cli.serve.config.is_none());
        assert!(!cli.serve.dry_run);
        assert!(!cli.serve.enable_mouse);
    }

    #[test]
    fn test_cli_serve_flags_at_top_level() {
        let cli = Cli::parse_from([
            "keyrelay-agent",
            "--bind",
            "127.0.0.1",
            "--port",
            "9000",
            "--dry-run",
        ]);

        assert_eq!(cli.serve.bind.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.serve.port, Some(9000));
        assert!(cli.serve.dry_run);
    }

    #[test]
    fn test_cli_explicit_serve_subcommand() {
        let cli = Cli::parse_from(["keyrelay-agent", "serve", "--enable-mouse", "--log-level", "debug"]);

        match cli.command {
            Some(CliCommand::Serve(args)) => {
                assert!(args.enable_mouse);
                assert_eq!(args.log_level.as_deref(), Some("debug"));
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_send_parses_kind_and_values() {
        // Arrange / Act
        let cli = Cli::parse_from([
            "keyrelay-agent",
            "send",
            "--addr",
            "10.0.0.5:7331",
            "MouseMove",
            "--x",
            "-12.5",
            "--y",
            "40",
        ]);

        // Assert
        let Some(CliCommand::Send(args)) = cli.command else {
            panic!("expected send subcommand");
        };
        assert_eq!(args.addr, "10.0.0.5:7331".parse::<SocketAddr>().unwrap());
        assert_eq!(args.to_command(), Command::mouse_move(-12.5, 40.0));
    }

    #[test]
    fn test_cli_send_defaults_to_local_agent() {
        let cli = Cli::parse_from(["keyrelay-agent", "send", "KeyDown", "--data", "13"]);

        let Some(CliCommand::Send(args)) = cli.command else {
            panic!("expected send subcommand");
        };
        assert_eq!(args.addr.port(), 7331);
        assert_eq!(args.to_command(), Command::key_down(13));
    }

    #[test]
    fn test_cli_send_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["keyrelay-agent", "send", "keydown"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_to_overrides_config_values() {
        // Arrange
        let mut config = AgentConfig::default();
        config.dispatch.pointer_mode = PointerMode::Relative;
        let args = ServeArgs {
            bind: Some("127.0.0.1".to_string()),
            port: Some(4000),
            log_level: Some("debug".to_string()),
            enable_mouse: true,
            ..ServeArgs::default()
        };

        // Act
        args.apply_to(&mut config);

        // Assert
        assert_eq!(config.network.bind_addr().unwrap().to_string(), "127.0.0.1:4000");
        assert_eq!(config.logging.level, "debug");
        assert!(config.dispatch.mouse_enabled);
        assert_eq!(config.dispatch.pointer_mode, PointerMode::Relative);
    }

    #[test]
    fn test_apply_to_without_overrides_keeps_config() {
        let mut config = AgentConfig::default();
        config.dispatch.mouse_enabled = true;

        ServeArgs::default().apply_to(&mut config);

        let mut expected = AgentConfig::default();
        expected.dispatch.mouse_enabled = true;
        assert_eq!(config, expected);
    }
}
