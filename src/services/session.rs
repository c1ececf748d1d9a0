use moka::future::{Cache, CacheBuilder};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{MatchId, MatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no match available yet")]
    NoMatchAvailable,
}

/// Holds computed matches until the submitter comes back to reveal them
///
/// Results are keyed by the [`MatchId`] handed out at submission time, so a
/// reveal only ever sees the match produced for that submission. The most
/// recent result is also kept in a single slot for the legacy reveal.
pub struct MatchSession {
    results: Cache<MatchId, MatchResult>,
    latest: RwLock<Option<MatchResult>>,
}

impl MatchSession {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let results = CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            results,
            latest: RwLock::new(None),
        }
    }

    /// Store a result and return the token that retrieves it
    pub async fn set(&self, result: MatchResult) -> MatchId {
        let id = MatchId::generate();
        self.results.insert(id, result.clone()).await;
        *self.latest.write().await = Some(result);

        tracing::trace!("Match session set: {}", id);
        id
    }

    /// Look up the result stored under `id`
    pub async fn get(&self, id: &MatchId) -> Result<MatchResult, SessionError> {
        self.results
            .get(id)
            .await
            .ok_or(SessionError::NoMatchAvailable)
    }

    /// Most recent result across all submitters
    pub async fn latest(&self) -> Result<MatchResult, SessionError> {
        self.latest
            .read()
            .await
            .clone()
            .ok_or(SessionError::NoMatchAvailable)
    }

    /// Number of live (unexpired) results
    pub async fn entry_count(&self) -> u64 {
        // moka applies inserts and expirations lazily
        self.results.run_pending_tasks().await;
        self.results.entry_count()
    }
}
