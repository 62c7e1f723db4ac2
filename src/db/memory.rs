use super::VoteStore;
use crate::error::StoreError;
use crate::models::{Matchup, Tally};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local tallies. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tallies: RwLock<HashMap<String, Tally>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn register_matchup(&self, matchup: &Matchup) -> Result<(), StoreError> {
        let mut tallies = self.tallies.write().await;
        tallies
            .entry(matchup.id.clone())
            .or_insert_with(|| Tally::empty(matchup.clone()));
        Ok(())
    }

    async fn record_vote(&self, matchup_id: &str, team: &str) -> Result<Tally, StoreError> {
        let mut tallies = self.tallies.write().await;
        let tally = tallies
            .get_mut(matchup_id)
            .ok_or_else(|| StoreError::UnknownMatchup(matchup_id.to_string()))?;

        if !tally.matchup.has_team(team) {
            return Err(StoreError::UnknownTeam {
                matchup_id: matchup_id.to_string(),
                team: team.to_string(),
            });
        }

        *tally.counts.entry(team.to_string()).or_insert(0) += 1;
        Ok(tally.clone())
    }

    async fn tally(&self, matchup_id: &str) -> Result<Option<Tally>, StoreError> {
        Ok(self.tallies.read().await.get(matchup_id).cloned())
    }

    async fn all_tallies(&self) -> Result<Vec<Tally>, StoreError> {
        let mut all: Vec<Tally> = self.tallies.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.matchup.id.cmp(&b.matchup.id));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn matchup() -> Matchup {
        Matchup::new("g1", "Home", "Away")
    }

    #[tokio::test]
    async fn voting_twice_counts_twice() {
        let store = MemoryStore::new();
        store.register_matchup(&matchup()).await.unwrap();
        store.record_vote("g1", "Home").await.unwrap();
        let tally = store.record_vote("g1", "Home").await.unwrap();
        assert_eq!(tally.count_for("Home"), 2);
        assert_eq!(tally.count_for("Away"), 0);
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let store = MemoryStore::new();
        store.register_matchup(&matchup()).await.unwrap();
        store.record_vote("g1", "Away").await.unwrap();
        store.register_matchup(&matchup()).await.unwrap();
        let tally = store.tally("g1").await.unwrap().unwrap();
        assert_eq!(tally.count_for("Away"), 1);
    }

    #[tokio::test]
    async fn unknown_matchup_and_team_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.record_vote("nope", "Home").await,
            Err(StoreError::UnknownMatchup(_))
        ));

        store.register_matchup(&matchup()).await.unwrap();
        assert!(matches!(
            store.record_vote("g1", "Somebody").await,
            Err(StoreError::UnknownTeam { .. })
        ));
        let tally = store.tally("g1").await.unwrap().unwrap();
        assert_eq!(tally.counts.len(), 2);
        assert_eq!(tally.counts.values().sum::<u64>(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        store.register_matchup(&matchup()).await.unwrap();

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let store = Arc::clone(&store);
                let team = if i % 2 == 0 { "Home" } else { "Away" };
                tokio::spawn(async move { store.record_vote("g1", team).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let tally = store.tally("g1").await.unwrap().unwrap();
        assert_eq!(tally.count_for("Home"), 100);
        assert_eq!(tally.count_for("Away"), 100);
    }

    #[tokio::test]
    async fn all_tallies_are_sorted_by_id() {
        let store = MemoryStore::new();
        store.register_matchup(&Matchup::new("b", "H", "A")).await.unwrap();
        store.register_matchup(&Matchup::new("a", "H", "A")).await.unwrap();
        let ids: Vec<String> = store
            .all_tallies()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.matchup.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
