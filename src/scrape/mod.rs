pub mod csv;
pub mod dates;
pub mod table;

pub use dates::{filter_window, parse_game_date};
pub use table::{dom_id, matchup_id, normalize_rows, parse_table};

use crate::config::ScheduleConfig;
use crate::error::ScrapeError;
use crate::models::Game;
use log::{debug, info};
use std::time::Instant;

const USER_AGENT: &str = concat!("vcl-pickem/", env!("CARGO_PKG_VERSION"));

pub fn build_client(cfg: &ScheduleConfig) -> Result<reqwest::Client, ScrapeError> {
    reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(ScrapeError::Client)
}

/// GET the schedule page and return its body. Non-2xx responses are errors.
pub async fn fetch_schedule_html(client: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let response = client.get(url).send().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })
}

/// Runs fetch, parse and normalize. The date window is applied by the caller.
pub async fn scrape_schedule(client: &reqwest::Client, cfg: &ScheduleConfig) -> Result<Vec<Game>, ScrapeError> {
    let url = cfg.page_url();
    let started = Instant::now();
    let html = fetch_schedule_html(client, &url).await?;
    debug!("Fetched {} bytes from {} in {:?}", html.len(), url, started.elapsed());

    let games = games_from_html(&html, cfg.default_year)?;
    info!("Scraped {} games from {}", games.len(), url);
    Ok(games)
}

/// Parse step split out so it never lives across an await point.
pub fn games_from_html(html: &str, default_year: i32) -> Result<Vec<Game>, ScrapeError> {
    let rows = parse_table(html)?;
    Ok(normalize_rows(rows)
        .into_iter()
        .map(|record| Game::from_record(record, default_year))
        .collect())
}
