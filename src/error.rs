use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("no <table> found in schedule page")]
    NoTable,
    #[error("invalid selector `{0}`")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown game: {0}")]
    UnknownMatchup(String),
    #[error("Unknown team '{team}' for game {matchup_id}")]
    UnknownTeam { matchup_id: String, team: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownMatchup(_) | StoreError::UnknownTeam { .. } => {
                AppError::BadRequest(err.to_string())
            }
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Scrape(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Scrape(e) => {
                error!("Schedule scrape failed: {}", e);
                "Failed to load the schedule".to_string()
            }
            AppError::Store(e) => {
                error!("Vote store failure: {}", e);
                "Internal error".to_string()
            }
            AppError::Io(e) => {
                error!("I/O failure: {}", e);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_team_maps_to_bad_request() {
        let err: AppError = StoreError::UnknownTeam {
            matchup_id: "g1".into(),
            team: "Nobody".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Unknown team 'Nobody' for game g1");
    }

    #[test]
    fn scrape_failures_are_bad_gateway() {
        let err: AppError = ScrapeError::NoTable.into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn database_failures_are_internal() {
        let err: AppError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
