use super::VoteStore;
use crate::error::StoreError;
use crate::models::{Matchup, Tally};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Row, Sqlite};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        let in_memory = db_url.contains(":memory:");

        // Create database file if it doesn't exist
        if !in_memory {
            let exists = match Sqlite::database_exists(db_url).await {
                Ok(exists) => exists,
                Err(e) => {
                    debug!("Could not check whether {} exists, creating it: {}", db_url, e);
                    false
                }
            };
            if !exists {
                Sqlite::create_database(db_url).await?;
            }
        }

        // Every connection to :memory: is its own database, so keep exactly one alive
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(db_url).await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS matchups (
                id TEXT PRIMARY KEY,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vote_counts (
                matchup_id TEXT NOT NULL,
                team TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (matchup_id, team),
                FOREIGN KEY (matchup_id) REFERENCES matchups(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                matchup_id TEXT NOT NULL,
                team TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (matchup_id) REFERENCES matchups(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn load_matchup(&self, matchup_id: &str) -> Result<Option<Matchup>, StoreError> {
        let row = sqlx::query("SELECT id, home_team, away_team FROM matchups WHERE id = ?")
            .bind(matchup_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Matchup {
            id: row.get::<String, _>("id"),
            home_team: row.get::<String, _>("home_team"),
            away_team: row.get::<String, _>("away_team"),
        }))
    }

    async fn load_counts(&self, matchup_id: &str) -> Result<BTreeMap<String, u64>, StoreError> {
        let counts = sqlx::query("SELECT team, count FROM vote_counts WHERE matchup_id = ?")
            .bind(matchup_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| (row.get::<String, _>("team"), row.get::<i64, _>("count").max(0) as u64))
            .collect();
        Ok(counts)
    }

    /// Number of rows in the per-vote log for a matchup.
    pub async fn vote_log_len(&self, matchup_id: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM votes WHERE matchup_id = ?")
            .bind(matchup_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n").max(0) as u64)
    }
}

#[async_trait]
impl VoteStore for SqliteStore {
    async fn register_matchup(&self, matchup: &Matchup) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO matchups (id, home_team, away_team, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&matchup.id)
        .bind(&matchup.home_team)
        .bind(&matchup.away_team)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for team in [&matchup.home_team, &matchup.away_team] {
            sqlx::query("INSERT OR IGNORE INTO vote_counts (matchup_id, team, count) VALUES (?, ?, 0)")
                .bind(&matchup.id)
                .bind(team)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn record_vote(&self, matchup_id: &str, team: &str) -> Result<Tally, StoreError> {
        // First verify the matchup and team exist
        let matchup = self
            .load_matchup(matchup_id)
            .await?
            .ok_or_else(|| StoreError::UnknownMatchup(matchup_id.to_string()))?;

        if !matchup.has_team(team) {
            return Err(StoreError::UnknownTeam {
                matchup_id: matchup_id.to_string(),
                team: team.to_string(),
            });
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO vote_counts (matchup_id, team, count)
            VALUES (?, ?, 1)
            ON CONFLICT(matchup_id, team)
            DO UPDATE SET count = count + 1
            "#,
        )
        .bind(matchup_id)
        .bind(team)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO votes (id, matchup_id, team, timestamp) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(matchup_id)
            .bind(team)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let counts = self.load_counts(matchup_id).await?;
        Ok(Tally { matchup, counts })
    }

    async fn tally(&self, matchup_id: &str) -> Result<Option<Tally>, StoreError> {
        match self.load_matchup(matchup_id).await? {
            Some(matchup) => {
                let counts = self.load_counts(matchup_id).await?;
                Ok(Some(Tally { matchup, counts }))
            }
            None => Ok(None),
        }
    }

    async fn all_tallies(&self) -> Result<Vec<Tally>, StoreError> {
        let mut counts: HashMap<String, BTreeMap<String, u64>> = HashMap::new();
        for row in sqlx::query("SELECT matchup_id, team, count FROM vote_counts")
            .fetch_all(&self.pool)
            .await?
        {
            counts
                .entry(row.get::<String, _>("matchup_id"))
                .or_default()
                .insert(row.get::<String, _>("team"), row.get::<i64, _>("count").max(0) as u64);
        }

        let tallies = sqlx::query("SELECT id, home_team, away_team FROM matchups ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| {
                let matchup = Matchup {
                    id: row.get::<String, _>("id"),
                    home_team: row.get::<String, _>("home_team"),
                    away_team: row.get::<String, _>("away_team"),
                };
                let counts = counts.remove(&matchup.id).unwrap_or_default();
                Tally { matchup, counts }
            })
            .collect();

        Ok(tallies)
    }
}
