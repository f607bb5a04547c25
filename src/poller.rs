// src/poller.rs
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::services::update_service::{self, UpdateService};

/// Drive update cycles until shutdown. Configuration is re-read every
/// iteration so interval and path changes apply without a restart, and the
/// shutdown signal is only honored between cycles: an in-flight merge always
/// completes before the loop exits.
pub async fn run(service: &mut UpdateService, mut shutdown: watch::Receiver<bool>) {
    loop {
        let config = AppConfig::from_env();

        let interval = match service.run_cycle(&config).await {
            Ok(snapshot) => {
                info!(
                    upcoming = snapshot.upcoming.len(),
                    finished = snapshot.finished.len(),
                    live = snapshot.live.is_some(),
                    "update cycle complete"
                );
                update_service::next_interval(&config, &snapshot)
            }
            Err(e) => {
                warn!("update cycle failed: {}", e);
                std::time::Duration::from_secs(config.poll_interval_secs)
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {
                info!("shutdown requested, stopping poller");
                break;
            }
        }
    }
}
