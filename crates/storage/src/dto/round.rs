use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::advancement::AdvancementType;
use crate::models::Round;

/// Request payload for creating a new round
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoundRequest {
    #[validate(length(
        min = 1,
        max = 120,
        message = "Event name must be between 1 and 120 characters"
    ))]
    pub event_name: String,

    #[validate(range(min = 1, message = "Round number must be at least 1"))]
    pub round_number: i32,

    #[serde(default)]
    pub is_finals: bool,

    pub advancement_type: AdvancementType,

    pub cutoff_percentage: Option<f64>,

    pub cutoff_count: Option<i32>,

    pub cutoff_time_ms: Option<i64>,

    pub finals_size: Option<i32>,
}

impl CreateRoundRequest {
    /// Additional validation that requires multiple fields: each advancement
    /// type needs its own cutoff, within its valid range.
    pub fn validate_policy(&self) -> Result<(), &'static str> {
        match self.advancement_type {
            AdvancementType::Percentage => match self.cutoff_percentage {
                None => return Err("percentage advancement requires cutoff_percentage"),
                Some(percentage) if percentage <= 0.0 || percentage > 100.0 => {
                    return Err("cutoff_percentage must be in (0, 100]");
                }
                Some(_) => {}
            },
            AdvancementType::Count => match self.cutoff_count {
                None => return Err("count advancement requires cutoff_count"),
                Some(count) if count < 1 => {
                    return Err("cutoff_count must be at least 1");
                }
                Some(_) => {}
            },
            AdvancementType::Time => match self.cutoff_time_ms {
                None => return Err("time advancement requires cutoff_time_ms"),
                Some(time_ms) if time_ms < 0 => {
                    return Err("cutoff_time_ms must not be negative");
                }
                Some(_) => {}
            },
            AdvancementType::All => {}
        }

        if let Some(size) = self.finals_size
            && size < 1
        {
            return Err("finals_size must be at least 1");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoundListFilter {
    /// Restrict the listing to rounds of one event.
    pub event: Option<String>,
}

/// Response containing round details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundResponse {
    pub round_id: Uuid,
    pub event_name: String,
    pub round_number: i32,
    pub is_finals: bool,
    pub advancement_type: String,
    pub cutoff_percentage: Option<f64>,
    pub cutoff_count: Option<i32>,
    pub cutoff_time_ms: Option<i64>,
    pub finals_size: Option<i32>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Round> for RoundResponse {
    fn from(round: Round) -> Self {
        Self {
            completed: round.is_completed(),
            round_id: round.round_id,
            event_name: round.event_name,
            round_number: round.round_number,
            is_finals: round.is_finals,
            advancement_type: round.advancement_type,
            cutoff_percentage: round.cutoff_percentage,
            cutoff_count: round.cutoff_count,
            cutoff_time_ms: round.cutoff_time_ms,
            finals_size: round.finals_size,
            completed_at: round.completed_at,
            created_at: round.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(advancement_type: AdvancementType) -> CreateRoundRequest {
        CreateRoundRequest {
            event_name: "3x3 Cube".to_string(),
            round_number: 1,
            is_finals: false,
            advancement_type,
            cutoff_percentage: None,
            cutoff_count: None,
            cutoff_time_ms: None,
            finals_size: None,
        }
    }

    #[test]
    fn test_percentage_policy_requires_value_in_range() {
        let mut req = request(AdvancementType::Percentage);
        assert!(req.validate_policy().is_err());

        req.cutoff_percentage = Some(0.0);
        assert!(req.validate_policy().is_err());

        req.cutoff_percentage = Some(100.5);
        assert!(req.validate_policy().is_err());

        req.cutoff_percentage = Some(100.0);
        assert!(req.validate_policy().is_ok());
    }

    #[test]
    fn test_count_policy_requires_positive_count() {
        let mut req = request(AdvancementType::Count);
        assert!(req.validate_policy().is_err());

        req.cutoff_count = Some(0);
        assert!(req.validate_policy().is_err());

        req.cutoff_count = Some(8);
        assert!(req.validate_policy().is_ok());
    }

    #[test]
    fn test_time_policy_rejects_negative_cutoff() {
        let mut req = request(AdvancementType::Time);
        req.cutoff_time_ms = Some(-1);
        assert!(req.validate_policy().is_err());

        req.cutoff_time_ms = Some(0);
        assert!(req.validate_policy().is_ok());
    }

    #[test]
    fn test_all_policy_needs_no_cutoff() {
        assert!(request(AdvancementType::All).validate_policy().is_ok());
    }

    #[test]
    fn test_finals_size_must_be_positive_when_present() {
        let mut req = request(AdvancementType::All);
        req.finals_size = Some(0);
        assert!(req.validate_policy().is_err());

        req.finals_size = Some(8);
        assert!(req.validate_policy().is_ok());
    }
}
