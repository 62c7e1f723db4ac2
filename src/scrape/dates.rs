use crate::models::Game;
use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WEEKDAY_PREFIX: Regex =
        Regex::new(r"(?i)^(mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("static regex");
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("static regex");
    static ref SLASH_DATE: Regex =
        Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?$").expect("static regex");
    static ref NAMED_DATE: Regex =
        Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?$").expect("static regex");
}

/// Parses the date cell of a schedule row. Year-less dates take `default_year`.
pub fn parse_game_date(raw: &str, default_year: i32) -> Option<NaiveDate> {
    let text = raw.trim();
    let text = WEEKDAY_PREFIX.replace(text, "");
    let text = text.trim();

    if let Some(caps) = ISO_DATE.captures(text) {
        return NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
    }

    if let Some(caps) = SLASH_DATE.captures(text) {
        let year = match caps.get(3) {
            Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
            Some(y) => y.as_str().parse().ok()?,
            None => default_year,
        };
        return NaiveDate::from_ymd_opt(year, caps[1].parse().ok()?, caps[2].parse().ok()?);
    }

    if let Some(caps) = NAMED_DATE.captures(text) {
        let month = month_number(&caps[1])?;
        let year = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => default_year,
        };
        return NaiveDate::from_ymd_opt(year, month, caps[2].parse().ok()?);
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = name.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| lower.starts_with(m))
        .map(|i| i as u32 + 1)
}

/// Keeps games dated inside `[today - days_back, today + days_ahead]`, in input order.
/// Games whose date could not be parsed are dropped. Bounds saturate at the calendar limits.
pub fn filter_window(games: Vec<Game>, today: NaiveDate, days_back: u32, days_ahead: u32) -> Vec<Game> {
    let start = today
        .checked_sub_days(Days::new(days_back.into()))
        .unwrap_or(NaiveDate::MIN);
    let end = today
        .checked_add_days(Days::new(days_ahead.into()))
        .unwrap_or(NaiveDate::MAX);

    games
        .into_iter()
        .filter(|game| matches!(game.parsed_date, Some(d) if d >= start && d <= end))
        .collect()
}
