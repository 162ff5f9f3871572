//! # Fundbridge API Main Entry Point
//!
//! This is the main entry point for the Fundbridge API service.

use fundbridge::artifacts::ArtifactStore;
use fundbridge::config::ConfigLoader;
use fundbridge::migration::{Migrator, MigratorTrait};
use fundbridge::server::run_server;
use fundbridge::{db, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;

    telemetry::init_tracing(&config)?;
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(config_json) = config.as_json() {
        tracing::debug!(config = %config_json, "Effective configuration");
    }

    let db = db::init_pool(&config).await?;
    Migrator::up(&db, None).await?;

    let artifacts = ArtifactStore::new(&config.artifacts_dir);

    run_server(config, db, artifacts).await
}
