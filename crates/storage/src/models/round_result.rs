use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoundResult {
    pub round_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub best_time_ms: Option<i64>,
    pub is_dnf: bool,
    pub is_dns: bool,
    pub advancement_status: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
