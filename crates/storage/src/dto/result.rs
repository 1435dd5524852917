use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::RoundResult;

/// Request payload for recording a competitor's result in a round
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordResultRequest {
    pub student_id: Uuid,

    #[validate(length(
        min = 1,
        max = 120,
        message = "Student name must be between 1 and 120 characters"
    ))]
    pub student_name: String,

    pub best_time_ms: Option<i64>,

    #[serde(default)]
    pub is_dnf: bool,

    #[serde(default)]
    pub is_dns: bool,
}

impl RecordResultRequest {
    /// Additional validation that requires multiple fields: the two no-result
    /// flags are mutually exclusive, and a recorded time cannot be negative.
    pub fn validate_result(&self) -> Result<(), &'static str> {
        if self.is_dnf && self.is_dns {
            return Err("A result cannot be both DNF and DNS");
        }

        if let Some(time_ms) = self.best_time_ms
            && time_ms < 0
        {
            return Err("best_time_ms must not be negative");
        }

        Ok(())
    }
}

/// Response containing one recorded result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundResultResponse {
    pub student_id: Uuid,
    pub student_name: String,
    pub best_time_ms: Option<i64>,
    pub is_dnf: bool,
    pub is_dns: bool,
    pub advancement_status: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<RoundResult> for RoundResultResponse {
    fn from(row: RoundResult) -> Self {
        Self {
            student_id: row.student_id,
            student_name: row.student_name,
            best_time_ms: row.best_time_ms,
            is_dnf: row.is_dnf,
            is_dns: row.is_dns,
            advancement_status: row.advancement_status,
            recorded_at: row.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RecordResultRequest {
        RecordResultRequest {
            student_id: Uuid::new_v4(),
            student_name: "Ada Chen".to_string(),
            best_time_ms: Some(12_450),
            is_dnf: false,
            is_dns: false,
        }
    }

    #[test]
    fn test_dnf_and_dns_together_are_rejected() {
        let mut req = request();
        req.is_dnf = true;
        req.is_dns = true;
        assert!(req.validate_result().is_err());
    }

    #[test]
    fn test_negative_time_is_rejected() {
        let mut req = request();
        req.best_time_ms = Some(-200);
        assert!(req.validate_result().is_err());
    }

    #[test]
    fn test_dnf_without_time_is_accepted() {
        let mut req = request();
        req.best_time_ms = None;
        req.is_dnf = true;
        assert!(req.validate_result().is_ok());
    }
}
