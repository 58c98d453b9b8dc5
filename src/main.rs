//! ipgate: Telegram bot that allow-lists IPs in a Caddyfile.
//!
//! # Architecture Overview
//!
//! ```text
//!   Telegram ──getUpdates──▶ runner ──task per message──▶ dispatcher
//!                                                            │
//!                                                            ▼
//!                                                      orchestrator
//!                                                   ┌────────┴────────┐
//!                                                   ▼                 ▼
//!                                         caddyfile mutator    docker client
//!                                      (lock, backup, write)  (unix socket:
//!                                                              list → exec →
//!                                                              start)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use ipgate::bot::{BotRunner, Dispatcher, ReloadOrchestrator, TelegramClient};
use ipgate::config::{load_config, BotConfig};
use ipgate::lifecycle::{signals, Shutdown};
use ipgate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "ipgate")]
#[command(about = "Allow-list IPs in a Caddyfile from Telegram and reload Caddy in place", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "IPGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot (default)
    Run,
    /// Add one address and reload, without Telegram
    Add {
        /// IPv4 or IPv6 address
        address: String,
    },
    /// Validate config, check the Caddyfile marker and resolve the container
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ipgate: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        caddyfile = %config.caddyfile.path,
        container = %config.docker.container_name,
        socket = %config.docker.socket_path,
        chat_filter = config.telegram.allowed_chat_id.is_some(),
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(config).await,
        Commands::Add { address } => add_once(&config, &address).await,
        Commands::Check => check(&config).await,
    }
}

async fn run_bot(config: BotConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if config.telegram.token.trim().is_empty() {
        eprintln!("ipgate: TELEGRAM_TOKEN env required");
        return Ok(ExitCode::FAILURE);
    }

    if config.observability.metrics_enabled {
        // Already validated by load_config.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let orchestrator = Arc::new(ReloadOrchestrator::new(&config));
    let dispatcher = Arc::new(Dispatcher::new(orchestrator, config.telegram.allowed_chat_id));
    let client = TelegramClient::new(&config.telegram)?;
    let runner = BotRunner::new(client, dispatcher, config.telegram.poll_timeout_secs)
        .with_drain_timeout(Duration::from_secs(config.telegram.drain_timeout_secs));

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(signals::wait_for_signal(shutdown));

    runner.run(receiver).await;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

async fn add_once(config: &BotConfig, address: &str) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let orchestrator = ReloadOrchestrator::new(config);
    let outcome = orchestrator.handle_candidate_address(0, address).await;
    println!("{}", outcome);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn check(config: &BotConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let orchestrator = ReloadOrchestrator::new(config);
    let mut healthy = true;

    match orchestrator.mutator().marker_count() {
        Ok(0) => {
            healthy = false;
            println!(
                "caddyfile  FAIL  no '{}' marker in {}",
                config.caddyfile.marker, config.caddyfile.path
            );
        }
        Ok(count) => println!(
            "caddyfile  ok    {} marker line(s) in {}",
            count, config.caddyfile.path
        ),
        Err(e) => {
            healthy = false;
            println!("caddyfile  FAIL  {}", e);
        }
    }

    match orchestrator
        .docker()
        .find_container(orchestrator.container_name())
        .await
    {
        Ok(id) => println!(
            "container  ok    {} is {}",
            orchestrator.container_name(),
            id.get(..12).unwrap_or(&id)
        ),
        Err(e) => {
            healthy = false;
            println!("container  FAIL  {}", e);
        }
    }

    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
