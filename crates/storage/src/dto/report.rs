use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::advancement::{AdvancementStatus, FinalsQualifier, MedalistNames};

/// One display row of an advancement report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportRow {
    pub rank: Option<u32>,
    pub student_name: String,
    pub time: String,
    pub status: AdvancementStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvancementReport {
    pub cutoff_applied: String,
    pub rows: Vec<ReportRow>,
    pub fastest_advancing: Option<String>,
    pub slowest_advancing: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvancementStats {
    pub total_competitors: usize,
    pub advancing_count: usize,
    pub eliminated_count: usize,
    pub dnf_count: usize,
    pub dns_count: usize,
    pub advancing_percentage: f64,
    pub mean_time_ms: Option<f64>,
    pub median_time_ms: Option<f64>,
    pub fastest_time_ms: Option<i64>,
    pub slowest_time_ms: Option<i64>,
}

/// Everything a caller needs to render the outcome of a completed round.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundCompletionResponse {
    pub round_id: Uuid,
    pub total_competitors: usize,
    pub advancing_count: usize,
    pub eliminated_count: usize,
    pub cutoff_applied: String,
    pub medalists: Option<MedalistNames>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvancementPreviewResponse {
    pub round_id: Uuid,
    pub report: AdvancementReport,
    pub stats: AdvancementStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FinalsBracketResponse {
    pub round_id: Uuid,
    pub finals_size: usize,
    pub seeds: Vec<FinalsQualifier>,
}

/// Grouped view over the persisted advancement statuses of one round.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AdvancementSummary {
    pub advancing: Vec<SummaryEntry>,
    pub eliminated: Vec<SummaryEntry>,
    pub champion: Option<String>,
    pub runner_up: Option<String>,
    pub third_place: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryEntry {
    pub student_id: Uuid,
    pub student_name: String,
    pub best_time_ms: Option<i64>,
    pub status: AdvancementStatus,
}
