use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use traderd::config::Config;
use traderd::process::Supervisor;
use traderd::server;

/// Web dashboard and control plane for a single supervised trader process:
/// start and stop the bot, watch its log, chart the account value history.
#[derive(Parser, Debug)]
#[command(name = "traderd", version, about)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "traderd.toml")]
    config: PathBuf,

    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Extra logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut config = if cli.config.exists() {
        Config::from_file(&cli.config)
            .with_context(|| format!("loading config from {}", cli.config.display()))?
    } else {
        tracing::info!(
            "config file {} not found, using defaults",
            cli.config.display()
        );
        Config::default()
    };

    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::debug!(?config, "resolved configuration");

    let config = Arc::new(config);
    let supervisor = Arc::new(Supervisor::new(&config));

    server::serve(config, supervisor).await?;

    Ok(())
}
