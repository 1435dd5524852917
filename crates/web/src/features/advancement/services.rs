use sqlx::PgPool;
use storage::{
    dto::report::{
        AdvancementPreviewResponse, AdvancementSummary, FinalsBracketResponse,
        RoundCompletionResponse,
    },
    error::Result,
    services::round_completion,
};
use uuid::Uuid;

/// Complete a round: compute advancement and persist one status per competitor
pub async fn complete_round(pool: &PgPool, round_id: Uuid) -> Result<RoundCompletionResponse> {
    round_completion::complete_round(pool, round_id).await
}

/// Preview a round's advancement without writing anything
pub async fn preview_advancement(
    pool: &PgPool,
    round_id: Uuid,
) -> Result<AdvancementPreviewResponse> {
    round_completion::preview_round(pool, round_id).await
}

/// Grouped view over a round's persisted advancement statuses
pub async fn advancement_summary(pool: &PgPool, round_id: Uuid) -> AdvancementSummary {
    round_completion::advancement_summary(pool, round_id).await
}

/// Ids of the students currently marked advancing in a round
pub async fn advancing_students(pool: &PgPool, round_id: Uuid) -> Vec<Uuid> {
    round_completion::fetch_advancing_students(pool, round_id).await
}

/// Seed a finals bracket from a round's advancing set
pub async fn finals_bracket(pool: &PgPool, round_id: Uuid) -> Result<FinalsBracketResponse> {
    round_completion::finals_bracket(pool, round_id).await
}
