use crate::error::ScrapeError;
use crate::models::GAME_FIELDS;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

lazy_static! {
    static ref UNSAFE_ID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]+").expect("static regex");
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

/// Cell text of every `<tr>` in the first `<table>` of the document.
/// Rows made only of `<th>` cells come back empty.
pub fn parse_table(html: &str) -> Result<Vec<Vec<String>>, ScrapeError> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let document = Html::parse_document(html);
    let table = document.select(&table_sel).next().ok_or(ScrapeError::NoTable)?;

    Ok(table
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| collapse_ws(&cell.text().collect::<String>()))
                .collect()
        })
        .collect())
}

/// Drops the header row and the leading column, then pads or truncates to a fixed width.
pub fn normalize_rows(rows: Vec<Vec<String>>) -> Vec<[String; GAME_FIELDS]> {
    rows.into_iter()
        .skip(1)
        .filter(|row| !row.is_empty())
        .filter_map(|row| {
            let mut fields = row.into_iter().skip(1);
            let record: [String; GAME_FIELDS] = std::array::from_fn(|_| fields.next().unwrap_or_default());
            // away / home
            if record[2].is_empty() || record[3].is_empty() {
                None
            } else {
                Some(record)
            }
        })
        .collect()
}

/// Synthetic matchup key: the trimmed fields concatenated with no separator.
pub fn matchup_id(date: &str, time: &str, away: &str, home: &str) -> String {
    [date, time, away, home].iter().map(|s| s.trim()).collect()
}

/// Matchup key made safe for element ids and single URL path segments.
/// Every run of characters outside `[A-Za-z0-9_-]` becomes one `_`.
pub fn dom_id(id: &str) -> String {
    UNSAFE_ID_CHARS.replace_all(id.trim(), "_").into_owned()
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
