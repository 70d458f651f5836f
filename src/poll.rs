//! Periodic scheduler-status refresh. Ticks every 30 s starting immediately;
//! overlapping fetches are issued independently, but each response carries a
//! sequence number and a response older than the last applied one is
//! discarded, so the displayed status never regresses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::console::AdminConsole;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Monotonic guard: a response is applied only if nothing newer has been
/// applied already.
#[derive(Default)]
pub(crate) struct SeqGuard(AtomicU64);

impl SeqGuard {
    /// True when `seq` is newer than everything applied so far.
    pub(crate) fn try_apply(&self, seq: u64) -> bool {
        self.0.fetch_max(seq, Ordering::SeqCst) < seq
    }
}

/// Running poller; dropping or stopping the handle ends the loop, the
/// analogue of the status region leaving the page.
pub struct StatusPoller {
    task: JoinHandle<()>,
}

impl StatusPoller {
    pub fn start(console: Arc<AdminConsole>) -> Self {
        let task = tokio::spawn(async move {
            let guard = Arc::new(SeqGuard::default());
            let mut next_seq: u64 = 0;
            let mut ticker = tokio::time::interval(POLL_INTERVAL);

            loop {
                ticker.tick().await;
                next_seq += 1;
                let seq = next_seq;
                let console = console.clone();
                let guard = guard.clone();
                // Each fetch runs on its own; a slow round trip must not
                // delay the next tick.
                tokio::spawn(async move {
                    let Some(status) = console.fetch_status().await else {
                        return;
                    };
                    if guard.try_apply(seq) {
                        console.apply_status(&status);
                    } else {
                        debug!(seq, "discarding stale scheduler status");
                    }
                });
            }
        });
        Self { task }
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyStatus;
    use crate::store::ConfigStore;
    use crate::view::{ConfirmGate, StatusPrompt};
    use async_trait::async_trait;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn guard_discards_older_sequences() {
        let guard = SeqGuard::default();
        assert!(guard.try_apply(2), "first response applies");
        assert!(!guard.try_apply(1), "older overlapping response is stale");
        assert!(!guard.try_apply(2), "same sequence does not re-apply");
        assert!(guard.try_apply(3), "newer response applies");
    }

    struct Deny;

    #[async_trait]
    impl ConfirmGate for Deny {
        async fn confirm(&self, _message: &str) -> bool {
            false
        }
    }

    #[async_trait]
    impl StatusPrompt for Deny {
        async fn choose_status(
            &self,
            _current: PropertyStatus,
            _options: &[PropertyStatus],
        ) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn first_poll_fires_immediately() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let router = Router::new().route(
                "/api/scheduler/status",
                get(|| async {
                    Json(json!({
                        "running": true,
                        "last_run": "Maintenant",
                        "next_run": "12:00"
                    }))
                }),
            );
            axum::serve(listener, router).await.unwrap();
        });

        let console = Arc::new(
            AdminConsole::new(
                format!("http://{addr}"),
                ConfigStore::new(std::env::temp_dir().join("scout-admin-poll-test")),
                Arc::new(Deny),
                Arc::new(Deny),
            )
            .unwrap(),
        );

        let poller = StatusPoller::start(console.clone());
        for _ in 0..300 {
            if console.with_views(|v| v.status.running == "En cours") {
                poller.stop();
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("status never applied by the immediate first poll");
    }
}
