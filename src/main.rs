use anyhow::Context;
use tokio::sync::watch;
use tracing::info;

use matchtracker::config::AppConfig;
use matchtracker::poller;
use matchtracker::services::store_service::{self, FileStore};
use matchtracker::services::update_service::UpdateService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();
    info!("🚀 matchtracker starting, schedule at {}", config.schedule_url());

    let state_path = store_service::resolve_state_path(&config)
        .context("could not determine a state file location (set MATCHTRACKER_STATE_PATH)")?;
    info!("state file: {}", state_path.display());

    let mut service = UpdateService::new(Box::new(FileStore::new(state_path)));
    service.load_state().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    poller::run(&mut service, shutdown_rx).await;
    info!("matchtracker stopped");
    Ok(())
}
