mod pages;
mod vote;

use crate::db::VoteStore;
use crate::schedule::ScheduleCache;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VoteStore>,
    pub schedule: Arc<ScheduleCache>,
}

impl AppState {
    pub fn new(store: Arc<dyn VoteStore>, schedule: Arc<ScheduleCache>) -> Self {
        Self { store, schedule }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/games", get(pages::games))
        .route("/games.csv", get(pages::games_csv))
        .route("/shop", get(pages::shop))
        .route("/vote", post(vote::cast_vote))
        .route("/api/games", get(pages::api_games))
        .route("/api/votes", get(vote::all_votes))
        .route("/api/votes/{game_id}", get(vote::game_votes))
        .route("/health", get(|| async { "ok" }))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
