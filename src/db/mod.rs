mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::models::{Matchup, Tally};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// Storage for vote tallies. Implementations must make `record_vote` atomic.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Creates zeroed counters for both teams. A no-op if the matchup is already known.
    async fn register_matchup(&self, matchup: &Matchup) -> Result<(), StoreError>;

    /// Adds one vote for `team` and returns the updated tally.
    async fn record_vote(&self, matchup_id: &str, team: &str) -> Result<Tally, StoreError>;

    async fn tally(&self, matchup_id: &str) -> Result<Option<Tally>, StoreError>;

    /// Every known tally, ordered by matchup id.
    async fn all_tallies(&self) -> Result<Vec<Tally>, StoreError>;
}

/// Picks a backend from `DATABASE_URL`: unset keeps votes in memory.
pub async fn connect(database_url: Option<&str>) -> Result<Arc<dyn VoteStore>, StoreError> {
    match database_url {
        Some(url) => {
            info!("Using SQLite vote store at {}", url);
            Ok(Arc::new(SqliteStore::new(url).await?))
        }
        None => {
            info!("Using in-memory vote store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
