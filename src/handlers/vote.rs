use super::AppState;
use crate::error::{AppError, StoreError};
use crate::models::{Matchup, Tally, VoteRequest, VoteResponse};
use crate::scrape::dom_id;
use crate::voting::{self, VoteSummary};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use log::{info, warn};

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing field: {}", field)))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected vote body: {}", rejection.body_text());
        AppError::BadRequest(format!("Invalid vote request: {}", rejection.body_text()))
    })?;

    let game_id = required(request.game_id, "game_id")?;
    let team_id = required(request.team_id, "team_id")?;

    // A client that knows both teams can open a matchup the schedule hasn't registered yet
    if state.store.tally(&game_id).await?.is_none() {
        match (request.home_team, request.away_team) {
            (Some(home), Some(away)) if !home.trim().is_empty() && !away.trim().is_empty() => {
                info!("Registering matchup {} from vote request", game_id);
                state
                    .store
                    .register_matchup(&Matchup::new(game_id.clone(), home.trim(), away.trim()))
                    .await?;
            }
            _ => return Err(StoreError::UnknownMatchup(game_id).into()),
        }
    }

    let tally = state.store.record_vote(&game_id, &team_id).await?;
    info!("Vote recorded for '{}' in {}", team_id, game_id);

    let summary = voting::summarize(&tally);
    Ok(Json(VoteResponse {
        success: true,
        game_id: summary.game_id,
        votes: summary.votes,
        total: summary.total,
        percentages: summary.percentages,
        home_team_percent: summary.home_team_percent,
        away_team_percent: summary.away_team_percent,
    }))
}

pub async fn all_votes(State(state): State<AppState>) -> Result<Json<Vec<VoteSummary>>, AppError> {
    let tallies = state.store.all_tallies().await?;
    Ok(Json(tallies.iter().map(voting::summarize).collect()))
}

/// Looks the matchup up by its id, falling back to the whitespace-free form used in page ids.
pub async fn game_votes(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<VoteSummary>, AppError> {
    let tally = match state.store.tally(&game_id).await? {
        Some(tally) => Some(tally),
        None => find_by_dom_id(&state, &game_id).await?,
    };

    tally
        .map(|t| Json(voting::summarize(&t)))
        .ok_or_else(|| AppError::NotFound(format!("No votes for game {}", game_id)))
}

async fn find_by_dom_id(state: &AppState, key: &str) -> Result<Option<Tally>, AppError> {
    Ok(state
        .store
        .all_tallies()
        .await?
        .into_iter()
        .find(|t| dom_id(&t.matchup.id) == key))
}
