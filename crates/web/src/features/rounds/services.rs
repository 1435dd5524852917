use sqlx::PgPool;
use storage::{
    dto::round::{CreateRoundRequest, RoundListFilter},
    error::Result,
    models::Round,
    repository::round::RoundRepository,
};
use uuid::Uuid;

/// Create a round with its advancement policy
pub async fn create_round(pool: &PgPool, request: &CreateRoundRequest) -> Result<Round> {
    let repo = RoundRepository::new(pool);
    repo.create(request).await
}

/// Get a round by id
pub async fn get_round(pool: &PgPool, round_id: Uuid) -> Result<Round> {
    let repo = RoundRepository::new(pool);
    repo.find_by_id(round_id).await
}

/// List rounds, optionally restricted to one event
pub async fn list_rounds(pool: &PgPool, filter: &RoundListFilter) -> Result<Vec<Round>> {
    let repo = RoundRepository::new(pool);
    repo.list(filter).await
}
