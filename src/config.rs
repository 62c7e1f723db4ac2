use crate::error::ConfigError;
use chrono::{Datelike, Utc};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SCHEDULE_URL: &str = "https://mcla.us/schedule/2024-03";
const DEFAULT_SCHEDULE_PAGE: &str = "5";
/// Upper bound for either side of the date window.
pub const MAX_WINDOW_DAYS: u32 = 3660;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub schedule: ScheduleConfig,
    pub cache_ttl: Duration,
    /// `None` disables the background refresher.
    pub refresh_interval: Option<Duration>,
    /// `None` selects the in-memory vote store.
    pub database_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub url: String,
    pub page: Option<u32>,
    pub default_year: i32,
    pub days_back: u32,
    pub days_ahead: u32,
    pub http_timeout: Duration,
}

impl ScheduleConfig {
    /// Full URL of the schedule page, including the `page` query if set.
    pub fn page_url(&self) -> String {
        match self.page {
            Some(page) => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}page={}", self.url, sep, page)
            }
            None => self.url.clone(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SCHEDULE_URL.to_string(),
            page: Some(5),
            default_year: Utc::now().year(),
            days_back: 0,
            days_ahead: 7,
            http_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_raw = lookup("SCHEDULE_PAGE").unwrap_or_else(|| DEFAULT_SCHEDULE_PAGE.to_string());
        let page = if page_raw.trim().is_empty() {
            None
        } else {
            Some(parse_value("SCHEDULE_PAGE", &page_raw)?)
        };

        let schedule = ScheduleConfig {
            url: lookup("SCHEDULE_URL").unwrap_or_else(|| DEFAULT_SCHEDULE_URL.to_string()),
            page,
            default_year: parse_or(&lookup, "SCHEDULE_YEAR", Utc::now().year())?,
            days_back: parse_days(&lookup, "WINDOW_DAYS_BACK", 0)?,
            days_ahead: parse_days(&lookup, "WINDOW_DAYS_AHEAD", 7)?,
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 15)?),
        };

        let refresh_secs: u64 = parse_or(&lookup, "REFRESH_INTERVAL_SECS", 600)?;

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string()),
            schedule,
            cache_ttl: Duration::from_secs(parse_or(&lookup, "SCHEDULE_CACHE_TTL_SECS", 300)?),
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_days<F>(lookup: &F, name: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let days: u32 = parse_or(lookup, name, default)?;
    if days > MAX_WINDOW_DAYS {
        return Err(ConfigError::Invalid {
            name,
            value: days.to_string(),
        });
    }
    Ok(days)
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:5000");
        assert_eq!(cfg.schedule.page_url(), "https://mcla.us/schedule/2024-03?page=5");
        assert_eq!(cfg.schedule.days_ahead, 7);
        assert_eq!(cfg.refresh_interval, Some(Duration::from_secs(600)));
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn empty_page_omits_query_and_zero_disables_refresh() {
        let cfg = config_from(&[
            ("SCHEDULE_URL", "http://localhost/sched?season=2024"),
            ("SCHEDULE_PAGE", ""),
            ("REFRESH_INTERVAL_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.schedule.page_url(), "http://localhost/sched?season=2024");
        assert!(cfg.refresh_interval.is_none());

        let cfg = config_from(&[("SCHEDULE_URL", "http://localhost/sched?season=2024")]).unwrap();
        assert_eq!(cfg.schedule.page_url(), "http://localhost/sched?season=2024&page=5");
    }

    #[test]
    fn bad_numbers_name_the_variable() {
        let err = config_from(&[("WINDOW_DAYS_AHEAD", "soon")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for WINDOW_DAYS_AHEAD: \"soon\"");
    }

    #[test]
    fn window_days_must_be_small_and_non_negative() {
        let err = config_from(&[("WINDOW_DAYS_AHEAD", "100000000")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "WINDOW_DAYS_AHEAD", .. }));

        let err = config_from(&[("WINDOW_DAYS_BACK", "-3")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "WINDOW_DAYS_BACK", .. }));

        let cfg = config_from(&[("WINDOW_DAYS_BACK", "3660")]).unwrap();
        assert_eq!(cfg.schedule.days_back, MAX_WINDOW_DAYS);
    }
}
