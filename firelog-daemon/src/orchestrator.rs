//! Daemon assembly and lifecycle.
//!
//! The [`Orchestrator`] owns the validated configuration and the shared
//! [`RecordStore`]. It installs the metrics recorder, performs the initial
//! directory load and serves the HTTP API until a shutdown signal arrives.
//!
//! # Startup Order
//!
//! 1. Metrics recorder (if enabled)
//! 2. Record store (patterns compiled, collections empty)
//! 3. Initial load of all vendor directories (optional)
//! 4. HTTP listener

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use firelog_core::config::FirelogConfig;
use firelog_core::error::{ConfigError, FirelogError};
use firelog_log_pipeline::{RecordStore, RecordStoreBuilder};

use crate::api::{self, AppState};
use crate::metrics_server;

/// The main daemon orchestrator.
pub struct Orchestrator {
    config: FirelogConfig,
    store: Arc<RecordStore>,
    state: AppState,
}

impl Orchestrator {
    /// Load configuration from `config_path` and build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or parsed
    /// - Configuration validation fails
    /// - Pattern vocabulary does not compile
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = FirelogConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
        Self::build_from_config(config)
    }

    /// Build from an already-loaded configuration.
    pub fn build_from_config(config: FirelogConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {e}"))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let store = RecordStoreBuilder::from_config(&config)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build record store: {e}"))?;
        let store = Arc::new(store);
        let state = AppState::new(Arc::clone(&store));

        tracing::info!(
            kaspersky_dir = %config.sources.kaspersky_dir.display(),
            tplink_dir = %config.sources.tplink_dir.display(),
            dlink_dir = %config.sources.dlink_dir.display(),
            "orchestrator initialized"
        );

        Ok(Self {
            config,
            store,
            state,
        })
    }

    /// Load every vendor directory concurrently.
    ///
    /// Failures are logged and leave that vendor's collection empty; the
    /// daemon still starts so the directory can be fixed and reloaded
    /// through the API.
    pub async fn initial_load(&self) {
        for (vendor, result) in self.store.reload_all().await {
            match result {
                Ok(summary) => tracing::info!(
                    vendor = %vendor,
                    records = summary.records,
                    parse_failures = summary.failure_count,
                    "initial load complete"
                ),
                Err(e) => tracing::error!(
                    vendor = %vendor,
                    dir = %self.store.source_dir(vendor).display(),
                    error = %e,
                    "initial load failed, collection stays empty"
                ),
            }
        }
    }

    /// The HTTP router serving this orchestrator's store.
    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// In-flight requests finish before this returns.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.config.server.bind_addr)
            .await
            .map_err(|e| {
                anyhow::anyhow!("failed to bind {}: {e}", self.config.server.bind_addr)
            })?;

        tracing::info!(bind_addr = %listener.local_addr()?, "HTTP API listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {e}"))?;

        tracing::info!("HTTP API stopped");
        Ok(())
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &FirelogConfig {
        &self.config
    }
}

/// Load `config_path`, or fall back to built-in defaults when it does not exist.
///
/// Environment overrides apply in both cases. Validation is left to the caller
/// so CLI overrides can be applied first. The returned flag is `true` when the
/// file was found.
pub async fn load_config(config_path: &Path) -> Result<(FirelogConfig, bool)> {
    let (mut config, found) = match FirelogConfig::from_file(config_path).await {
        Ok(config) => (config, true),
        Err(FirelogError::Config(ConfigError::FileNotFound { .. })) => {
            (FirelogConfig::default(), false)
        }
        Err(e) => return Err(anyhow::anyhow!("failed to load config: {e}")),
    };
    config.apply_env_overrides();
    Ok((config, found))
}

/// Resolves on SIGTERM or SIGINT.
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler, waiting for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = tokio::signal::ctrl_c() => "SIGINT",
    };
    tracing::info!(signal = name, "shutdown signal received");
}
