use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::advancement::{AdvancementType, RoundConfig};
use crate::error::AdvancementError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Round {
    pub round_id: Uuid,
    pub event_name: String,
    pub round_number: i32,
    pub is_finals: bool,
    pub advancement_type: String,
    pub cutoff_percentage: Option<f64>,
    pub cutoff_count: Option<i32>,
    pub cutoff_time_ms: Option<i64>,
    pub finals_size: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Round {
    /// Parse the stored advancement columns into a typed round configuration.
    pub fn advancement_config(&self) -> Result<RoundConfig, AdvancementError> {
        Ok(RoundConfig {
            advancement_type: AdvancementType::parse(&self.advancement_type)?,
            cutoff_percentage: self.cutoff_percentage,
            cutoff_count: self.cutoff_count,
            cutoff_time_ms: self.cutoff_time_ms,
            finals_size: self.finals_size,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
