use anyhow::Result;
use clap::Parser;

use firelog_daemon::cli::DaemonCli;
use firelog_daemon::logging::init_tracing;
use firelog_daemon::orchestrator::{self, Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let (mut config, config_found) = orchestrator::load_config(&cli.config).await?;

    // CLI > env > file > defaults
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {e}"))?;

    if cli.validate {
        println!("configuration is valid: {}", cli.config.display());
        return Ok(());
    }

    init_tracing(&config.general)?;

    if !config_found {
        tracing::warn!(
            path = %cli.config.display(),
            "config file not found, using defaults"
        );
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "firelog-daemon starting");

    let load_on_start = config.server.load_on_start && !cli.no_initial_load;
    let daemon = Orchestrator::build_from_config(config)?;

    if load_on_start {
        daemon.initial_load().await;
    } else {
        tracing::info!("initial load skipped, collections start empty");
    }

    daemon.run(orchestrator::shutdown_signal()).await?;

    tracing::info!("firelog-daemon shut down");
    Ok(())
}
