use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant is fatal to the selection run that raised it; callers re-run
/// the whole pipeline rather than retrying a single stage.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("Insufficient population: requested {requested} movies but only {available} distinct movies are eligible")]
    InsufficientPopulation { requested: usize, available: usize },

    #[error("Cannot build a distribution over an empty population")]
    EmptyPopulation,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::MalformedRecord(format!("CSV parse failure: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Transport(_) | AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedRecord(_)
            | AppError::InsufficientPopulation { .. }
            | AppError::EmptyPopulation => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) | AppError::UnsupportedStrategy(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
