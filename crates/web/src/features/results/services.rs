use sqlx::PgPool;
use storage::{
    dto::result::RecordResultRequest,
    error::{Result, StorageError},
    models::RoundResult,
    repository::{results::RoundResultRepository, round::RoundRepository},
};
use uuid::Uuid;

/// Record (or re-record) a competitor's result in a round. A completed
/// round no longer accepts results.
pub async fn record_result(
    pool: &PgPool,
    round_id: Uuid,
    request: &RecordResultRequest,
) -> Result<RoundResult> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    if round.is_completed() {
        return Err(StorageError::RoundAlreadyCompleted);
    }

    let repo = RoundResultRepository::new(pool);
    repo.upsert(round_id, request).await
}

/// List all results recorded for a round. An unknown round id is a not-found
/// error, not an empty list.
pub async fn list_results(pool: &PgPool, round_id: Uuid) -> Result<Vec<RoundResult>> {
    RoundRepository::new(pool).find_by_id(round_id).await?;

    let repo = RoundResultRepository::new(pool);
    repo.list_for_round(round_id).await
}
