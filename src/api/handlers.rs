use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{SelectionRequest, SelectionResponse},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    pub sheet_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeopleResponse {
    pub people: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Pick a weighted-random set of movies for tonight
pub async fn create_selection(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SelectionRequest>,
) -> AppResult<Json<SelectionResponse>> {
    tracing::info!(
        request_id = %request_id,
        num_movies = ?request.num_movies,
        participants = ?request.participants,
        filtering_strategy = ?request.filtering_strategy,
        probability_assignment = ?request.probability_assignment,
        "Processing selection request"
    );

    let selection = state.movie_night.select(request).await?;

    tracing::info!(
        request_id = %request_id,
        chosen = selection.movies.len(),
        "Selection completed"
    );

    Ok(Json(SelectionResponse::from(selection)))
}

/// List the people found in the sheet header
pub async fn list_people(
    State(state): State<AppState>,
    Query(query): Query<PeopleQuery>,
) -> AppResult<Json<PeopleResponse>> {
    let people = state
        .movie_night
        .list_people(query.sheet_url.as_deref())
        .await?;
    Ok(Json(PeopleResponse { people }))
}
