use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::store::InMemorySessionStore;

/// How often expired in-memory sessions are dropped
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Periodically removes expired entries from the in-memory session store
///
/// Runs until the task is aborted; spawn it with `tokio::spawn`.
#[instrument(skip(store))]
pub async fn start_session_purge_task(
    store: Arc<InMemorySessionStore>,
    purge_interval: Duration,
) {
    info!(
        purge_interval_secs = purge_interval.as_secs(),
        "Starting session purge background task"
    );

    let mut ticker = interval(purge_interval);

    loop {
        ticker.tick().await;

        match store.purge_expired() {
            Ok(0) => {}
            Ok(removed_count) => {
                info!(removed_count, "Expired sessions purged");
            }
            Err(e) => {
                error!(error = %e, "Session purge task failed");
            }
        }
    }
}
