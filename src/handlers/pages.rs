use super::AppState;
use crate::error::AppError;
use crate::models::GameWithVotes;
use crate::models::Tally;
use crate::scrape::{self, filter_window};
use crate::views;
use crate::voting;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::Local;

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let summaries: Vec<_> = state
        .store
        .all_tallies()
        .await?
        .iter()
        .map(voting::summarize)
        .collect();
    Ok(Html(views::home_page(&summaries)))
}

pub async fn games(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let games = windowed_games(&state).await?;
    Ok(Html(views::games_page(&games)))
}

pub async fn api_games(State(state): State<AppState>) -> Result<Json<Vec<GameWithVotes>>, AppError> {
    Ok(Json(windowed_games(&state).await?))
}

pub async fn games_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let games = state.schedule.games().await?;
    let mut body = Vec::new();
    scrape::csv::write_csv(&mut body, &games)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"schedule.csv\""),
        ],
        body,
    ))
}

pub async fn shop() -> Html<String> {
    Html(views::shop_page())
}

/// Scheduled games inside the configured date window, each registered for voting.
async fn windowed_games(state: &AppState) -> Result<Vec<GameWithVotes>, AppError> {
    let cfg = state.schedule.config();
    let all = state.schedule.games().await?;
    let today = Local::now().date_naive();
    let games = filter_window(all.to_vec(), today, cfg.days_back, cfg.days_ahead);

    let mut out = Vec::with_capacity(games.len());
    for game in games {
        let matchup = game.matchup();
        state.store.register_matchup(&matchup).await?;
        let tally = state
            .store
            .tally(&matchup.id)
            .await?
            .unwrap_or_else(|| Tally::empty(matchup));
        out.push(GameWithVotes {
            dom_id: game.dom_id(),
            votes: voting::summarize(&tally),
            game,
        });
    }
    Ok(out)
}
