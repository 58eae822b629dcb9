//! Fixed-period snapshot polling

use crate::core::refresh::Refresher;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Default poll period
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Refresh once now, then every `period`, forever
///
/// Each tick spawns its own refresh so a slow or failing fetch never holds up
/// the next tick. Overlapping fetches are ordered by the refresher's tickets.
pub async fn run(refresher: Arc<Refresher>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        ticker.tick().await;
        debug!("poll tick");
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move {
            refresher.refresh().await;
        });
    }
}
