use crate::db::VoteStore;
use crate::error::ScrapeError;
use crate::schedule::ScheduleCache;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Re-scrapes the schedule on a fixed interval and registers every matchup found.
pub async fn refresh_schedule_task(schedule: Arc<ScheduleCache>, store: Arc<dyn VoteStore>, every: Duration) {
    info!("Starting background schedule refresh every {:?}", every);
    let mut interval = interval(every);

    loop {
        interval.tick().await;
        match refresh_once(&schedule, store.as_ref()).await {
            Ok(registered) => debug!("Schedule refresh registered {} matchups", registered),
            Err(e) => error!("Schedule refresh failed: {}", e),
        }
    }
}

/// One refresh pass. Registration failures are logged per matchup and do not abort the pass.
pub async fn refresh_once(schedule: &ScheduleCache, store: &dyn VoteStore) -> Result<usize, ScrapeError> {
    let games = schedule.refresh().await?;
    let mut registered = 0;

    for game in games.iter() {
        match store.register_matchup(&game.matchup()).await {
            Ok(()) => registered += 1,
            Err(e) => error!("Failed to register matchup {}: {}", game.id, e),
        }
    }

    info!("Refreshed schedule: {} games, {} matchups registered", games.len(), registered);
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;
    use crate::db::MemoryStore;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refresh_registers_scraped_matchups() {
        let server = MockServer::start().await;
        let page = "<table><tr><th>#</th></tr>\
            <tr><td>1</td><td>3/16</td><td>1:00 PM</td><td>Away</td><td>Home</td></tr>\
            <tr><td>2</td><td>3/17</td><td>2:00 PM</td><td>Rice</td><td>Baylor</td></tr></table>";
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let cfg = ScheduleConfig {
            url: server.uri(),
            page: None,
            ..ScheduleConfig::default()
        };
        let schedule = ScheduleCache::new(cfg, Duration::from_secs(60)).unwrap();
        let store = MemoryStore::new();

        assert_eq!(refresh_once(&schedule, &store).await.unwrap(), 2);
        assert!(store.tally("3/161:00 PMAwayHome").await.unwrap().is_some());
        let tally = store.tally("3/172:00 PMRiceBaylor").await.unwrap().unwrap();
        assert_eq!(tally.count_for("Baylor"), 0);
    }

    #[tokio::test]
    async fn refresh_failure_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let cfg = ScheduleConfig {
            url: server.uri(),
            page: None,
            ..ScheduleConfig::default()
        };
        let schedule = ScheduleCache::new(cfg, Duration::from_secs(60)).unwrap();
        let store = MemoryStore::new();
        assert!(refresh_once(&schedule, &store).await.is_err());
        assert!(store.all_tallies().await.unwrap().is_empty());
    }
}
