use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::result::{RecordResultRequest, RoundResultResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/results",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    request_body = RecordResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Result recorded successfully", body = RoundResultResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found"),
        (status = 409, description = "Round already completed")
    ),
    tag = "results"
)]
pub async fn record_result(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
    Json(req): Json<RecordResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_result()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let result = services::record_result(db.pool(), round_id, &req).await?;

    Ok((StatusCode::CREATED, Json(RoundResultResponse::from(result))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/results",
    params(
        ("round_id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Results for the round", body = Vec<RoundResultResponse>),
        (status = 404, description = "Round not found")
    ),
    tag = "results"
)]
pub async fn list_results(
    State(db): State<Database>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<Vec<RoundResultResponse>>, WebError> {
    let results = services::list_results(db.pool(), round_id).await?;

    let response: Vec<RoundResultResponse> = results
        .into_iter()
        .map(RoundResultResponse::from)
        .collect();

    Ok(Json(response))
}
