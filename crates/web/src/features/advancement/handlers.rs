use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::report::{
        AdvancementPreviewResponse, AdvancementSummary, FinalsBracketResponse,
        RoundCompletionResponse,
    },
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/complete",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Round completed and advancement persisted", body = RoundCompletionResponse),
        (status = 400, description = "Round configuration is missing its cutoff"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found"),
        (status = 409, description = "Round already completed or has no results"),
        (status = 500, description = "Some advancement status writes failed")
    ),
    tag = "advancement"
)]
pub async fn complete_round(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let completion = services::complete_round(db.pool(), round_id).await?;

    Ok(Json(completion).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/preview",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Advancement preview with report and statistics", body = AdvancementPreviewResponse),
        (status = 400, description = "Round configuration is missing its cutoff"),
        (status = 404, description = "Round not found"),
        (status = 409, description = "No results recorded for this round")
    ),
    tag = "advancement"
)]
pub async fn preview_advancement(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let preview = services::preview_advancement(db.pool(), round_id).await?;

    Ok(Json(preview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/advancement",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Advancement summary grouped by status", body = AdvancementSummary)
    ),
    tag = "advancement"
)]
pub async fn get_advancement_summary(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<AdvancementSummary>, WebError> {
    let summary = services::advancement_summary(db.pool(), round_id).await;

    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/advancing",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Ids of advancing students", body = Vec<Uuid>)
    ),
    tag = "advancement"
)]
pub async fn list_advancing_students(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, WebError> {
    let students = services::advancing_students(db.pool(), round_id).await;

    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/finals-bracket",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Seeded finals bracket from the round's advancing set", body = FinalsBracketResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "advancement"
)]
pub async fn get_finals_bracket(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let bracket = services::finals_bracket(db.pool(), round_id).await?;

    Ok(Json(bracket).into_response())
}
