//! Startup wiring: load durable state, then start the loaders and pollers
//! for whichever optional sub-views this session shows.

use std::sync::Arc;

use tracing::info;

use crate::console::AdminConsole;
use crate::poll::StatusPoller;

/// Which optional sub-views are present.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagePresence {
    pub scheduler: bool,
    pub dashboard: bool,
}

/// Returns the poller handle when a scheduler region exists; dropping it
/// stops the polling loop.
pub async fn bootstrap(
    console: &Arc<AdminConsole>,
    presence: PagePresence,
) -> Option<StatusPoller> {
    console.load_scheduler_form().await;

    if presence.dashboard {
        console.load_stats().await;
    }

    if presence.scheduler {
        info!("scheduler view present, starting status poller");
        Some(StatusPoller::start(console.clone()))
    } else {
        None
    }
}
