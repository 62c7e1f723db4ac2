use crate::config::ScheduleConfig;
use crate::error::ScrapeError;
use crate::models::Game;
use crate::scrape;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CachedSchedule {
    fetched_at: Instant,
    games: Arc<Vec<Game>>,
}

/// Last scraped schedule, refetched once it is older than the TTL.
pub struct ScheduleCache {
    client: reqwest::Client,
    config: ScheduleConfig,
    ttl: Duration,
    cached: RwLock<Option<CachedSchedule>>,
}

impl ScheduleCache {
    pub fn new(config: ScheduleConfig, ttl: Duration) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: scrape::build_client(&config)?,
            config,
            ttl,
            cached: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// The full, unwindowed schedule.
    pub async fn games(&self) -> Result<Arc<Vec<Game>>, ScrapeError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!("Serving cached schedule ({} games)", cached.games.len());
                return Ok(Arc::clone(&cached.games));
            }
        }
        self.refresh().await
    }

    /// Scrapes unconditionally and replaces the cached copy. A failed scrape keeps the old copy.
    pub async fn refresh(&self) -> Result<Arc<Vec<Game>>, ScrapeError> {
        let games = Arc::new(scrape::scrape_schedule(&self.client, &self.config).await?);
        *self.cached.write().await = Some(CachedSchedule {
            fetched_at: Instant::now(),
            games: Arc::clone(&games),
        });
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = "<table><tr><th>#</th></tr>\
        <tr><td>1</td><td>2024-03-16</td><td>1:00 PM</td><td>A</td><td>B</td></tr></table>";

    fn config(server: &MockServer) -> ScheduleConfig {
        ScheduleConfig {
            url: server.uri(),
            page: None,
            ..ScheduleConfig::default()
        }
    }

    #[tokio::test]
    async fn fresh_cache_avoids_refetching() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let cache = ScheduleCache::new(config(&server), Duration::from_secs(60)).unwrap();
        assert_eq!(cache.games().await.unwrap().len(), 1);
        assert_eq!(cache.games().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(2)
            .mount(&server)
            .await;

        let cache = ScheduleCache::new(config(&server), Duration::ZERO).unwrap();
        cache.games().await.unwrap();
        cache.games().await.unwrap();
    }
}
