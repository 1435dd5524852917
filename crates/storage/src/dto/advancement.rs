use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AdvancementError;
use crate::models::RoundResult;

/// One competitor's outcome in a round, as fed to the decision layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorResult {
    pub student_id: Uuid,
    pub student_name: String,
    pub best_time_ms: Option<i64>,
    pub is_dnf: bool,
    pub is_dns: bool,
    /// 1-based position, assigned once the field has been ranked.
    pub round_rank: Option<u32>,
}

impl CompetitorResult {
    /// The time this competitor can be ranked on. A DNF or DNS flag means no
    /// valid time regardless of what was recorded, and a result without a
    /// recorded time has none either.
    pub fn valid_time(&self) -> Option<i64> {
        if self.is_dnf || self.is_dns {
            return None;
        }
        self.best_time_ms
    }

    pub fn has_valid_time(&self) -> bool {
        self.valid_time().is_some()
    }
}

impl From<&RoundResult> for CompetitorResult {
    fn from(row: &RoundResult) -> Self {
        Self {
            student_id: row.student_id,
            student_name: row.student_name.clone(),
            best_time_ms: row.best_time_ms,
            is_dnf: row.is_dnf,
            is_dns: row.is_dns,
            round_rank: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdvancementType {
    Percentage,
    Count,
    Time,
    All,
}

impl AdvancementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Count => "count",
            Self::Time => "time",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AdvancementError> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "count" => Ok(Self::Count),
            "time" => Ok(Self::Time),
            "all" => Ok(Self::All),
            other => Err(AdvancementError::UnknownAdvancementType(other.to_string())),
        }
    }
}

impl fmt::Display for AdvancementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advancement policy of a round, fixed at round creation. The cutoff
/// columns are nullable in the store, so the policy is only usable once
/// [`RoundConfig::rule`] has resolved it into an [`AdvancementRule`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoundConfig {
    pub advancement_type: AdvancementType,
    pub cutoff_percentage: Option<f64>,
    pub cutoff_count: Option<i32>,
    pub cutoff_time_ms: Option<i64>,
    pub finals_size: Option<i32>,
}

impl RoundConfig {
    /// Resolve the configured policy into a concrete rule, failing when the
    /// cutoff field the advancement type requires is absent.
    pub fn rule(&self) -> Result<AdvancementRule, AdvancementError> {
        match self.advancement_type {
            AdvancementType::Percentage => self
                .cutoff_percentage
                .map(AdvancementRule::TopPercentage)
                .ok_or(AdvancementError::MissingCutoff {
                    advancement_type: self.advancement_type,
                    field: "cutoff_percentage",
                }),
            AdvancementType::Count => self
                .cutoff_count
                .map(|count| AdvancementRule::TopCount(count.max(0) as usize))
                .ok_or(AdvancementError::MissingCutoff {
                    advancement_type: self.advancement_type,
                    field: "cutoff_count",
                }),
            AdvancementType::Time => self
                .cutoff_time_ms
                .map(AdvancementRule::UnderTime)
                .ok_or(AdvancementError::MissingCutoff {
                    advancement_type: self.advancement_type,
                    field: "cutoff_time_ms",
                }),
            AdvancementType::All => Ok(AdvancementRule::All),
        }
    }
}

/// A fully resolved advancement rule, one variant per advancement type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdvancementRule {
    TopPercentage(f64),
    TopCount(usize),
    UnderTime(i64),
    All,
}

/// Durable per-student advancement state, stored as text on the result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementStatus {
    Advancing,
    Eliminated,
    Finalist,
    Champion,
    RunnerUp,
    ThirdPlace,
}

impl AdvancementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advancing => "advancing",
            Self::Eliminated => "eliminated",
            Self::Finalist => "finalist",
            Self::Champion => "champion",
            Self::RunnerUp => "runner_up",
            Self::ThirdPlace => "third_place",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AdvancementError> {
        match value {
            "advancing" => Ok(Self::Advancing),
            "eliminated" => Ok(Self::Eliminated),
            "finalist" => Ok(Self::Finalist),
            "champion" => Ok(Self::Champion),
            "runner_up" => Ok(Self::RunnerUp),
            "third_place" => Ok(Self::ThirdPlace),
            other => Err(AdvancementError::UnknownAdvancementStatus(
                other.to_string(),
            )),
        }
    }

    /// Every status except `eliminated` means the competitor moved on.
    pub fn is_advancing(&self) -> bool {
        !matches!(self, Self::Eliminated)
    }
}

/// Output of one advancement computation: who proceeds, who does not, and
/// the rule that was applied. Counts always satisfy
/// `advancing_count + eliminated_count == total_competitors`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvancementOutcome {
    pub advancing: Vec<CompetitorResult>,
    pub eliminated: Vec<CompetitorResult>,
    pub total_competitors: usize,
    pub advancing_count: usize,
    pub eliminated_count: usize,
    pub cutoff_applied: String,
}

impl AdvancementOutcome {
    pub fn new(
        advancing: Vec<CompetitorResult>,
        eliminated: Vec<CompetitorResult>,
        cutoff_applied: String,
    ) -> Self {
        let advancing_count = advancing.len();
        let eliminated_count = eliminated.len();
        Self {
            total_competitors: advancing_count + eliminated_count,
            advancing_count,
            eliminated_count,
            advancing,
            eliminated,
            cutoff_applied,
        }
    }
}

/// Podium of a finals round plus the remaining finalists (4th place on).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Medalists {
    pub champion: CompetitorResult,
    pub runner_up: CompetitorResult,
    pub third_place: CompetitorResult,
    pub finalists: Vec<CompetitorResult>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MedalistNames {
    pub champion: String,
    pub runner_up: String,
    pub third_place: String,
}

impl From<&Medalists> for MedalistNames {
    fn from(medalists: &Medalists) -> Self {
        Self {
            champion: medalists.champion.student_name.clone(),
            runner_up: medalists.runner_up.student_name.clone(),
            third_place: medalists.third_place.student_name.clone(),
        }
    }
}

/// A seeded slot in a finals bracket.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FinalsQualifier {
    pub seed: u32,
    pub student_id: Uuid,
    pub student_name: String,
    pub best_time_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(time_ms: Option<i64>, is_dnf: bool, is_dns: bool) -> CompetitorResult {
        CompetitorResult {
            student_id: Uuid::new_v4(),
            student_name: "Test Student".to_string(),
            best_time_ms: time_ms,
            is_dnf,
            is_dns,
            round_rank: None,
        }
    }

    #[test]
    fn test_dnf_overrides_recorded_time() {
        let result = competitor(Some(9_000), true, false);
        assert_eq!(result.valid_time(), None);
        assert!(!result.has_valid_time());
    }

    #[test]
    fn test_dns_overrides_recorded_time() {
        let result = competitor(Some(9_000), false, true);
        assert_eq!(result.valid_time(), None);
    }

    #[test]
    fn test_missing_time_is_not_valid() {
        let result = competitor(None, false, false);
        assert_eq!(result.valid_time(), None);
    }

    #[test]
    fn test_advancement_type_round_trips_through_text() {
        for advancement_type in [
            AdvancementType::Percentage,
            AdvancementType::Count,
            AdvancementType::Time,
            AdvancementType::All,
        ] {
            let parsed = AdvancementType::parse(advancement_type.as_str()).unwrap();
            assert_eq!(parsed, advancement_type);
        }
    }

    #[test]
    fn test_unknown_advancement_type_is_rejected() {
        let error = AdvancementType::parse("rank").unwrap_err();
        assert_eq!(
            error,
            AdvancementError::UnknownAdvancementType("rank".to_string())
        );
    }

    #[test]
    fn test_advancement_status_round_trips_through_text() {
        for status in [
            AdvancementStatus::Advancing,
            AdvancementStatus::Eliminated,
            AdvancementStatus::Finalist,
            AdvancementStatus::Champion,
            AdvancementStatus::RunnerUp,
            AdvancementStatus::ThirdPlace,
        ] {
            assert_eq!(AdvancementStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_only_eliminated_is_not_advancing() {
        assert!(!AdvancementStatus::Eliminated.is_advancing());
        assert!(AdvancementStatus::Advancing.is_advancing());
        assert!(AdvancementStatus::Champion.is_advancing());
    }

    #[test]
    fn test_rule_requires_cutoff_for_percentage() {
        let config = RoundConfig {
            advancement_type: AdvancementType::Percentage,
            cutoff_percentage: None,
            cutoff_count: None,
            cutoff_time_ms: None,
            finals_size: None,
        };
        assert_eq!(
            config.rule().unwrap_err(),
            AdvancementError::MissingCutoff {
                advancement_type: AdvancementType::Percentage,
                field: "cutoff_percentage",
            }
        );
    }

    #[test]
    fn test_rule_requires_cutoff_for_count_and_time() {
        let count_config = RoundConfig {
            advancement_type: AdvancementType::Count,
            cutoff_percentage: None,
            cutoff_count: None,
            cutoff_time_ms: None,
            finals_size: None,
        };
        let time_config = RoundConfig {
            advancement_type: AdvancementType::Time,
            ..count_config.clone()
        };
        assert!(matches!(
            count_config.rule(),
            Err(AdvancementError::MissingCutoff {
                field: "cutoff_count",
                ..
            })
        ));
        assert!(matches!(
            time_config.rule(),
            Err(AdvancementError::MissingCutoff {
                field: "cutoff_time_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_rule_resolves_configured_cutoffs() {
        let config = RoundConfig {
            advancement_type: AdvancementType::Count,
            cutoff_percentage: None,
            cutoff_count: Some(12),
            cutoff_time_ms: None,
            finals_size: None,
        };
        assert_eq!(config.rule().unwrap(), AdvancementRule::TopCount(12));

        let all_config = RoundConfig {
            advancement_type: AdvancementType::All,
            ..config
        };
        assert_eq!(all_config.rule().unwrap(), AdvancementRule::All);
    }
}
