use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::round::{CreateRoundRequest, RoundListFilter, RoundResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rounds",
    request_body = CreateRoundRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Round created successfully", body = RoundResponse),
        (status = 400, description = "Validation error or incomplete advancement policy"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Round number already exists for this event")
    ),
    tag = "rounds"
)]
pub async fn create_round(
    State(db): State<Database>,
    Json(req): Json<CreateRoundRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_policy()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let round = services::create_round(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(RoundResponse::from(round))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds",
    params(RoundListFilter),
    responses(
        (status = 200, description = "List rounds successfully", body = Vec<RoundResponse>)
    ),
    tag = "rounds"
)]
pub async fn list_rounds(
    State(db): State<Database>,
    Query(filter): Query<RoundListFilter>,
) -> Result<Json<Vec<RoundResponse>>, WebError> {
    let rounds = services::list_rounds(db.pool(), &filter).await?;

    let response: Vec<RoundResponse> = rounds.into_iter().map(RoundResponse::from).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Round found", body = RoundResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn get_round(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let round = services::get_round(db.pool(), round_id).await?;

    Ok(Json(RoundResponse::from(round)).into_response())
}
