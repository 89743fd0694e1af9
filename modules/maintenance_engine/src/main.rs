//! `maintenance-engine` binary: REST API plus the background due scan

use anyhow::{Context, Result};
use clap::Parser;
use maintenance_engine::config::LogConfig;
use maintenance_engine::{AppConfig, MaintenanceEngineModule};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "maintenance-engine", version, about = "Maintenance workflow engine")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `bind_addr`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut app = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        app.bind_addr = bind;
    }

    init_tracing(&app.log);

    let db = sea_orm::Database::connect(app.database_url.as_str())
        .await
        .context("connecting to database")?;
    let db = Arc::new(db);

    let module = Arc::new(MaintenanceEngineModule::new(app.maintenance.clone()));
    module.migrate(&db).await?;
    module.init(db.clone())?;

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(module.clone().serve(cancel.clone()));

    let router = module.register_rest(axum::Router::new())?;
    let listener = tokio::net::TcpListener::bind(&app.bind_addr)
        .await
        .with_context(|| format!("binding {}", app.bind_addr))?;
    info!(addr = %app.bind_addr, "maintenance engine listening");

    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("received Ctrl+C, initiating shutdown");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    match worker.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "due scan worker failed"),
        Err(e) => error!(error = %e, "due scan worker panicked"),
    }
    info!("maintenance engine stopped");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("maintenance_engine={},warn", log.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
