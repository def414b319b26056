//! FleexStack sample application entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fleexstack_sample::api::openapi;
use fleexstack_sample::config::Config;
use fleexstack_sample::process::SystemMetrics;
use fleexstack_sample::server;
use fleexstack_sample::shutdown::shutdown_signal;

/// FleexStack sample application.
#[derive(Parser, Debug)]
#[command(name = "fleexstack-sample")]
#[command(about = "Sample service exposing health and deployment information")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP endpoints (default).
    Run,

    /// Print the resolved configuration.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("fleexstack_sample=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Warnings and errors go to stderr, everything else to stdout.
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(args.port),
        Some(Command::Openapi) => cmd_openapi(),
        Some(Command::Run) | None => cmd_run(args.port).await,
    }
}

fn load_config(port_override: Option<u16>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    Ok(config)
}

/// Serve until SIGINT/SIGTERM, then exit immediately.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config(port_override)?;
    let process = Arc::new(SystemMetrics::new()?);

    server::run(&config, process, shutdown_signal()).await?;

    // No draining: open connections die with the process.
    std::process::exit(0);
}

/// Print the resolved configuration.
fn cmd_check_config(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config(port_override)?;

    println!("==================================================");
    println!("FLEEXSTACK SAMPLE - CONFIGURATION CHECK");
    println!("==================================================");
    println!("  Version: {}", config.version());
    println!("  Environment: {}", config.environment());
    println!("  Port: {}", config.port);
    if let Some(version) = &config.version {
        println!("  VERSION variable: {} (package version takes precedence)", version);
    }
    println!("==================================================");

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi() -> anyhow::Result<()> {
    println!("{}", openapi::render()?);
    Ok(())
}
