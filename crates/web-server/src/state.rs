use crate::error::AppError;
use analytics::{AnalyticsEngine, HistoryData, LeagueHistory};
use async_trait::async_trait;
use database::{DbError, DbRepository};
use narrative::Narrator;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Where handlers get league rows from.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn load(&self) -> Result<HistoryData, DbError>;
}

#[async_trait]
impl HistorySource for DbRepository {
    async fn load(&self) -> Result<HistoryData, DbError> {
        self.load_history().await
    }
}

/// The shared application state that all handlers can access.
pub struct AppState {
    pub history: Arc<dyn HistorySource>,
    pub engine: AnalyticsEngine,
    pub narrator: Narrator,
    snapshot_ttl: Duration,
    cached: RwLock<Option<(Instant, Arc<LeagueHistory>)>>,
}

impl AppState {
    /// A zero `snapshot_ttl` reloads the history on every request.
    pub fn new(
        history: Arc<dyn HistorySource>,
        engine: AnalyticsEngine,
        narrator: Narrator,
        snapshot_ttl: Duration,
    ) -> Self {
        Self {
            history,
            engine,
            narrator,
            snapshot_ttl,
            cached: RwLock::new(None),
        }
    }

    /// The league snapshot, reloaded once it is older than the TTL.
    /// Failed loads are not cached.
    pub async fn snapshot(&self) -> Result<Arc<LeagueHistory>, AppError> {
        if self.snapshot_ttl.is_zero() {
            return Ok(Arc::new(LeagueHistory::new(self.history.load().await?)));
        }
        if let Some(history) = self.fresh(&*self.cached.read().await) {
            return Ok(history);
        }

        let mut slot = self.cached.write().await;
        // Another request may have reloaded while we waited for the lock.
        if let Some(history) = self.fresh(&slot) {
            return Ok(history);
        }
        let history = Arc::new(LeagueHistory::new(self.history.load().await?));
        tracing::debug!(ttl_secs = self.snapshot_ttl.as_secs(), "league snapshot reloaded");
        *slot = Some((Instant::now(), history.clone()));
        Ok(history)
    }

    fn fresh(&self, slot: &Option<(Instant, Arc<LeagueHistory>)>) -> Option<Arc<LeagueHistory>> {
        slot.as_ref()
            .filter(|(loaded_at, _)| loaded_at.elapsed() < self.snapshot_ttl)
            .map(|(_, history)| history.clone())
    }
}
