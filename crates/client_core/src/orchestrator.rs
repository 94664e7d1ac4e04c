use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::{BulletRequest, ScoredBullet};
use tracing::{error, info, warn};

use crate::{
    api::BulletApi,
    error::Result,
    history::{HistoryLog, HistoryStore},
    view::{ResultsView, SubmitView},
};

/// Observable "request outstanding" flag. Views hold a clone and disable
/// submission while it is set; nothing here blocks a second submit.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn begin(&self) -> InFlightGuard {
        if self.0.swap(true, Ordering::AcqRel) {
            warn!("submitting while another request is still outstanding");
        }
        InFlightGuard(self.0.clone())
    }
}

struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the history state and ties one submission to one history entry.
pub struct BulletOrchestrator<A: BulletApi> {
    api: A,
    history: HistoryStore,
    log: HistoryLog,
    in_flight: InFlight,
}

impl<A: BulletApi> BulletOrchestrator<A> {
    /// Loads the history log up front. A malformed slot starts empty; a
    /// store that cannot be read is an error.
    pub async fn open(api: A, history: HistoryStore) -> Result<Self> {
        let log = history.load().await?;
        Ok(Self {
            api,
            history,
            log,
            in_flight: InFlight::default(),
        })
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut HistoryLog {
        &mut self.log
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Re-reads the durable log, dropping the current selection. On a read
    /// failure the in-memory log is kept as it was.
    pub async fn reload_history(&mut self) -> Result<&HistoryLog> {
        self.log = self.history.load().await?;
        Ok(&self.log)
    }

    /// One request, one response. History is only touched on success.
    pub async fn submit(&mut self, request: BulletRequest) -> Result<Vec<ScoredBullet>> {
        let _guard = self.in_flight.begin();
        let bullets = self.api.generate(&request).await?;
        if let Err(err) = self
            .history
            .record(&mut self.log, request, bullets.clone())
            .await
        {
            // best-effort cache
            error!(%err, "failed to persist history entry");
        }
        Ok(bullets)
    }

    pub async fn submit_for_display(&mut self, request: BulletRequest) -> SubmitView {
        match self.submit(request).await {
            Ok(bullets) => {
                info!(count = bullets.len(), "bullet suggestions ready");
                SubmitView::Results {
                    results: ResultsView::from_bullets(&bullets),
                }
            }
            Err(err) => {
                error!(%err, "bullet generation failed");
                SubmitView::failed()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
