//! SAMAJ Server — Application entry point.

use samaj_db::{DbConfig, DbManager, ensure_indexes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("samaj=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting SAMAJ server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(err) => {
            tracing::error!(error = %err, "Database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = ensure_indexes(manager.database()).await {
        tracing::error!(error = %err, "Index bootstrap failed");
        std::process::exit(1);
    }

    // TODO: Mount the HTTP router (societies, buildings, blocks, floors,
    //       units, parking, users)
    // TODO: Start the territory-cache queue consumer

    tracing::info!("SAMAJ server stopped.");
}
