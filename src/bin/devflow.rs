//! CLI entrypoint for the DevFlow monitor: runs the refresh engine and the
//! snapshot API, or one-shot utility commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devflow::collectors::Collector;
use devflow::config::Config;
use devflow::engine::{Collectors, Engine};
use devflow::utils::logging::init_logging;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "devflow", author, version, about = "DevFlow ecosystem monitor", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the refresh engine and the snapshot API (default)
    Run,
    /// Generate a default configuration file
    Init {
        /// Output path for the config file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run every collector once and report which degrade to fallback
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    if args.print_default_config {
        println!("{}", Config::default_toml());
        return Ok(());
    }

    if let Some(Command::Init { config, force }) = &args.command {
        let path = Path::new(config);
        if path.exists() && !force {
            eprintln!("Config already exists at {}. Use --force to overwrite.", config);
            std::process::exit(1);
        }
        std::fs::write(path, Config::default_toml())?;
        println!("Wrote default config to {}", config);
        return Ok(());
    }

    // Load an existing configuration, otherwise fall back to defaults.
    let config_exists = Path::new(&args.config).exists();
    let config = if config_exists {
        Config::from_file(&args.config).context("Failed to load configuration")?
    } else {
        let mut config = Config::default();
        config.hydrate_credentials();
        config
    };

    init_logging(&config.app.log_level);
    if !config_exists {
        log::warn!("Configuration file '{}' not found – using defaults", args.config);
    }

    match args.command {
        | Some(Command::Probe) => probe(&config).await,
        | _ => run_service(&config).await,
    }
}

/// One-shot health check: fetch every domain once and report which sources
/// answered and which fell back.
async fn probe(config: &Config) -> Result<()> {
    let collectors = Collectors::from_config(config)?;

    let mut degraded_count = 0;
    let outcomes = [
        ("code-activity", collectors.code.fetch().await.degraded),
        ("market", collectors.market.fetch().await.degraded),
        ("news", collectors.news.fetch().await.degraded),
        ("geo", collectors.geo.fetch().await.degraded),
        ("social", collectors.social.fetch().await.degraded),
    ];
    for (name, degraded) in outcomes {
        if degraded {
            degraded_count += 1;
            println!("△ {} degraded to fallback", name);
        } else {
            println!("✓ {} ok", name);
        }
    }

    println!("{}/5 sources healthy", 5 - degraded_count);
    Ok(())
}

async fn run_service(config: &Config) -> Result<()> {
    log::info!("Starting DevFlow monitor v{}", env!("CARGO_PKG_VERSION"));

    let collectors = Collectors::from_config(config)?;
    let engine = Engine::new(collectors, Duration::from_secs(config.refresh.interval_secs));
    let handle = engine.handle();

    // Spawn the refresh loop – runs until cancelled.
    let engine_task = tokio::spawn(engine.run());

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid bind address")?;
    let server_handle = handle.clone();
    let server_task = tokio::spawn(async move {
        if let Err(e) = devflow::dashboard::serve(server_handle, addr).await {
            log::error!("Snapshot API exited with error: {e}");
        }
    });

    tokio::signal::ctrl_c().await?;
    log::info!("Shutdown signal received. Stopping...");
    server_task.abort();
    engine_task.abort();

    Ok(())
}
