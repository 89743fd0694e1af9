//! Module declaration and lifecycle: wiring, migrations, routes and the
//! background due scan

use crate::config::Config;
use crate::contract::MaintenanceApi;
use crate::domain::{Repositories, Service};
use crate::infra::storage::repositories::{
    SeaOrmAssetRepository, SeaOrmInspectionRepository, SeaOrmOnboardingRepository,
    SeaOrmScheduleRepository, SeaOrmTicketRepository, SeaOrmUserRepository,
};
use anyhow::{anyhow, Result};
use chrono::Utc;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Maintenance engine module
pub struct MaintenanceEngineModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for MaintenanceEngineModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MaintenanceEngineModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
        }
    }

    /// Build the SeaORM repositories and the domain service
    pub fn init(&self, db: Arc<DatabaseConnection>) -> Result<()> {
        let repos = Repositories {
            onboarding: Arc::new(SeaOrmOnboardingRepository::new(db.clone())),
            assets: Arc::new(SeaOrmAssetRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            schedules: Arc::new(SeaOrmScheduleRepository::new(db.clone())),
            inspections: Arc::new(SeaOrmInspectionRepository::new(db.clone())),
            tickets: Arc::new(SeaOrmTicketRepository::new(db)),
        };
        self.init_with(repos)
    }

    /// Wire the service over caller-provided repositories
    pub fn init_with(&self, repos: Repositories) -> Result<()> {
        let config = self.config.read().clone();
        config
            .validate()
            .map_err(|e| anyhow!("invalid maintenance config: {}", e))?;

        let service = Arc::new(Service::new(repos, &config));
        *self.service.write() = Some(service);

        info!(
            scan_enabled = config.scan_enabled,
            scan_interval = ?config.scan_interval,
            "Maintenance engine initialized"
        );
        Ok(())
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        info!("Maintenance engine migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow!("Service not initialized"))
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn MaintenanceApi>> {
        let client = crate::api::native::NativeClient::new(self.service()?);
        Ok(Arc::new(client))
    }

    /// REST routes mounted on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        debug!("Registering maintenance engine REST routes");
        Ok(crate::api::rest::routes::register_routes(router, service))
    }

    /// Run the preventive due scan every `scan_interval` until cancelled.
    /// A pass already in progress completes before the loop exits.
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let service = self.service()?;
        let (enabled, period) = {
            let config = self.config.read();
            (config.scan_enabled, config.scan_interval)
        };

        if !enabled {
            info!("preventive due scan disabled");
            cancel.cancelled().await;
            return Ok(());
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick.
        interval.tick().await;

        info!(interval = ?period, "preventive due scan started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = service.scan_and_fire_due_schedules(Utc::now()).await {
                        warn!(error = %e, "due scan pass failed (non-fatal)");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("preventive due scan shutting down");
                    break;
                }
            }
        }
        Ok(())
    }
}
