use futures_util::future::join_all;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::dto::advancement::{
    AdvancementOutcome, AdvancementStatus, CompetitorResult, MedalistNames, Medalists, RoundConfig,
};
use crate::dto::report::{
    AdvancementPreviewResponse, AdvancementSummary, FinalsBracketResponse, RoundCompletionResponse,
    SummaryEntry,
};
use crate::error::{Result, StorageError};
use crate::models::{Round, RoundResult};
use crate::repository::results::RoundResultRepository;
use crate::repository::round::RoundRepository;
use crate::services::advancement::{self, DEFAULT_FINALS_SIZE};
use crate::services::reporting;

/// One pending advancement-status write for a competitor in a round.
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub student_id: Uuid,
    pub status: AdvancementStatus,
}

/// The statuses a completed round will persist, plus the podium when the
/// round was a finals.
pub struct AdvancementPlan {
    pub updates: Vec<StatusUpdate>,
    pub medalists: Option<Medalists>,
}

/// Map an advancement outcome onto per-student statuses. In a finals round
/// the advancing set becomes finalists with the podium overwritten to their
/// medal statuses, and eliminated competitors keep whatever status they
/// already carry. In any other round the two sets map directly to
/// `advancing` and `eliminated`.
pub fn plan_status_updates(outcome: &AdvancementOutcome, is_finals: bool) -> AdvancementPlan {
    let mut updates: Vec<StatusUpdate> = Vec::with_capacity(outcome.total_competitors);
    let mut medalists = None;

    if is_finals {
        for competitor in &outcome.advancing {
            updates.push(StatusUpdate {
                student_id: competitor.student_id,
                status: AdvancementStatus::Finalist,
            });
        }

        medalists = advancement::determine_medalists(&outcome.advancing);
        if let Some(ref podium) = medalists {
            overwrite_status(&mut updates, podium.champion.student_id, AdvancementStatus::Champion);
            overwrite_status(&mut updates, podium.runner_up.student_id, AdvancementStatus::RunnerUp);
            overwrite_status(
                &mut updates,
                podium.third_place.student_id,
                AdvancementStatus::ThirdPlace,
            );
        }
    } else {
        for competitor in &outcome.advancing {
            updates.push(StatusUpdate {
                student_id: competitor.student_id,
                status: AdvancementStatus::Advancing,
            });
        }
        for competitor in &outcome.eliminated {
            updates.push(StatusUpdate {
                student_id: competitor.student_id,
                status: AdvancementStatus::Eliminated,
            });
        }
    }

    AdvancementPlan { updates, medalists }
}

fn overwrite_status(updates: &mut [StatusUpdate], student_id: Uuid, status: AdvancementStatus) {
    if let Some(update) = updates.iter_mut().find(|u| u.student_id == student_id) {
        update.status = status;
    }
}

/// Persist one advancement status per competitor, fanning the writes out
/// concurrently. Writes that succeed stay applied even when others fail;
/// a partial failure surfaces as [`StorageError::PartialWrite`] with the
/// failure count. Re-running the whole completion is safe because every
/// write sets an absolute status.
pub async fn apply_advancement(
    pool: &PgPool,
    round_id: Uuid,
    outcome: &AdvancementOutcome,
    is_finals: bool,
) -> Result<AdvancementPlan> {
    let repo = RoundResultRepository::new(pool);
    let plan = plan_status_updates(outcome, is_finals);

    let writes = plan.updates.iter().map(|update| {
        let repo = &repo;
        async move {
            repo.set_advancement_status(round_id, update.student_id, update.status)
                .await
                .map_err(|error| (update.student_id, error))
        }
    });

    let total = plan.updates.len();
    let mut failed = 0usize;
    for write in join_all(writes).await {
        if let Err((student_id, error)) = write {
            error!(%round_id, %student_id, %error, "Advancement status write failed");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(StorageError::PartialWrite { failed, total });
    }

    Ok(plan)
}

async fn load_round_competitors(pool: &PgPool, round_id: Uuid) -> Result<Vec<CompetitorResult>> {
    let repo = RoundResultRepository::new(pool);
    let rows = repo.list_for_round(round_id).await?;

    if rows.is_empty() {
        return Err(StorageError::NoResults);
    }

    Ok(rows.iter().map(CompetitorResult::from).collect())
}

/// Complete a round end to end: load its results, compute advancement under
/// the round's policy, and persist one status per competitor.
///
/// Only one caller can complete a given round. The round's `completed_at`
/// column doubles as the claim: it is set with a conditional update before
/// any status write, a second completion attempt finds it taken and gets
/// [`StorageError::RoundAlreadyCompleted`], and a failed run releases it so
/// the round can be retried.
pub async fn complete_round(pool: &PgPool, round_id: Uuid) -> Result<RoundCompletionResponse> {
    let rounds = RoundRepository::new(pool);
    let round = rounds.find_by_id(round_id).await?;

    // Reject an unusable policy before taking the claim.
    let config = round.advancement_config()?;
    config.rule()?;

    if !rounds.claim_completion(round_id).await? {
        return Err(StorageError::RoundAlreadyCompleted);
    }

    match run_completion(pool, &round, &config).await {
        Ok(response) => Ok(response),
        Err(completion_error) => {
            if let Err(release_error) = rounds.release_completion(round_id).await {
                error!(%round_id, %release_error, "Failed to release completion claim");
            }
            Err(completion_error)
        }
    }
}

async fn run_completion(
    pool: &PgPool,
    round: &Round,
    config: &RoundConfig,
) -> Result<RoundCompletionResponse> {
    let competitors = load_round_competitors(pool, round.round_id).await?;
    let outcome = advancement::calculate_advancement(&competitors, config)?;
    let plan = apply_advancement(pool, round.round_id, &outcome, round.is_finals).await?;

    Ok(RoundCompletionResponse {
        round_id: round.round_id,
        total_competitors: outcome.total_competitors,
        advancing_count: outcome.advancing_count,
        eliminated_count: outcome.eliminated_count,
        cutoff_applied: outcome.cutoff_applied,
        medalists: plan.medalists.as_ref().map(MedalistNames::from),
    })
}

/// Dry-run a round's advancement: same load and computation as
/// [`complete_round`], rendered as a report with statistics, with nothing
/// written back.
pub async fn preview_round(pool: &PgPool, round_id: Uuid) -> Result<AdvancementPreviewResponse> {
    let rounds = RoundRepository::new(pool);
    let round = rounds.find_by_id(round_id).await?;
    let config = round.advancement_config()?;

    let competitors = load_round_competitors(pool, round_id).await?;
    let outcome = advancement::calculate_advancement(&competitors, &config)?;

    Ok(AdvancementPreviewResponse {
        round_id,
        report: reporting::generate_report(&outcome),
        stats: reporting::advancement_stats(&outcome),
    })
}

/// Seed a finals bracket from a completed round's advancing set, using the
/// round's configured bracket size when it has one.
pub async fn finals_bracket(pool: &PgPool, round_id: Uuid) -> Result<FinalsBracketResponse> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    let advancing = RoundResultRepository::new(pool)
        .list_with_status(round_id, Some(AdvancementStatus::Advancing))
        .await?;

    let finals_size = round
        .finals_size
        .map(|size| size.max(0) as usize)
        .unwrap_or(DEFAULT_FINALS_SIZE);

    let qualifiers: Vec<CompetitorResult> = advancing.iter().map(CompetitorResult::from).collect();

    Ok(FinalsBracketResponse {
        round_id,
        finals_size,
        seeds: advancement::generate_finals(&qualifiers, finals_size),
    })
}

/// Student ids currently marked `advancing` in a round. Fails soft: a store
/// error is logged and yields an empty list.
pub async fn fetch_advancing_students(pool: &PgPool, round_id: Uuid) -> Vec<Uuid> {
    let repo = RoundResultRepository::new(pool);

    match repo
        .list_with_status(round_id, Some(AdvancementStatus::Advancing))
        .await
    {
        Ok(results) => results.iter().map(|r| r.student_id).collect(),
        Err(error) => {
            error!(%round_id, %error, "Failed to fetch advancing students");
            Vec::new()
        }
    }
}

/// Group a round's persisted statuses into advancing and eliminated buckets
/// and surface medalist names when present. Fails soft like
/// [`fetch_advancing_students`].
pub async fn advancement_summary(pool: &PgPool, round_id: Uuid) -> AdvancementSummary {
    let repo = RoundResultRepository::new(pool);

    let rows = match repo.list_with_status(round_id, None).await {
        Ok(rows) => rows,
        Err(error) => {
            error!(%round_id, %error, "Failed to load advancement summary");
            return AdvancementSummary::default();
        }
    };

    match build_summary(&rows) {
        Ok(summary) => summary,
        Err(error) => {
            error!(%round_id, %error, "Malformed advancement status in store");
            AdvancementSummary::default()
        }
    }
}

fn build_summary(rows: &[RoundResult]) -> Result<AdvancementSummary> {
    let mut summary = AdvancementSummary::default();

    for row in rows {
        let Some(ref status_text) = row.advancement_status else {
            continue;
        };
        let status = AdvancementStatus::parse(status_text).map_err(StorageError::from)?;

        match status {
            AdvancementStatus::Champion => summary.champion = Some(row.student_name.clone()),
            AdvancementStatus::RunnerUp => summary.runner_up = Some(row.student_name.clone()),
            AdvancementStatus::ThirdPlace => summary.third_place = Some(row.student_name.clone()),
            _ => {}
        }

        let entry = SummaryEntry {
            student_id: row.student_id,
            student_name: row.student_name.clone(),
            best_time_ms: row.best_time_ms,
            status,
        };
        if status.is_advancing() {
            summary.advancing.push(entry);
        } else {
            summary.eliminated.push(entry);
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::advancement::{advance_all, advance_by_count};
    use chrono::Utc;

    fn competitor(name: &str, time_ms: i64) -> CompetitorResult {
        CompetitorResult {
            student_id: Uuid::new_v4(),
            student_name: name.to_string(),
            best_time_ms: Some(time_ms),
            is_dnf: false,
            is_dns: false,
            round_rank: None,
        }
    }

    fn status_for(plan: &AdvancementPlan, student_id: Uuid) -> Option<AdvancementStatus> {
        plan.updates
            .iter()
            .find(|u| u.student_id == student_id)
            .map(|u| u.status)
    }

    fn result_row(name: &str, status: Option<&str>) -> RoundResult {
        RoundResult {
            round_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            student_name: name.to_string(),
            best_time_ms: Some(10_000),
            is_dnf: false,
            is_dns: false,
            advancement_status: status.map(str::to_string),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_marks_both_sets_outside_finals() {
        let field = vec![
            competitor("Fast", 10_000),
            competitor("Mid", 12_000),
            competitor("Slow", 14_000),
        ];
        let outcome = advance_by_count(&field, 2);
        let plan = plan_status_updates(&outcome, false);

        assert_eq!(plan.updates.len(), 3);
        assert!(plan.medalists.is_none());
        assert_eq!(
            status_for(&plan, outcome.advancing[0].student_id),
            Some(AdvancementStatus::Advancing)
        );
        assert_eq!(
            status_for(&plan, outcome.eliminated[0].student_id),
            Some(AdvancementStatus::Eliminated)
        );
    }

    #[test]
    fn test_plan_overwrites_podium_in_finals() {
        let field = vec![
            competitor("First", 10_000),
            competitor("Second", 10_500),
            competitor("Third", 11_000),
            competitor("Fourth", 12_000),
        ];
        let outcome = advance_all(&field);
        let plan = plan_status_updates(&outcome, true);

        let medalists = plan.medalists.as_ref().unwrap();
        assert_eq!(
            status_for(&plan, medalists.champion.student_id),
            Some(AdvancementStatus::Champion)
        );
        assert_eq!(
            status_for(&plan, medalists.runner_up.student_id),
            Some(AdvancementStatus::RunnerUp)
        );
        assert_eq!(
            status_for(&plan, medalists.third_place.student_id),
            Some(AdvancementStatus::ThirdPlace)
        );
        assert_eq!(
            status_for(&plan, medalists.finalists[0].student_id),
            Some(AdvancementStatus::Finalist)
        );
    }

    #[test]
    fn test_plan_leaves_eliminated_untouched_in_finals() {
        let field = vec![
            competitor("A", 10_000),
            competitor("B", 11_000),
            competitor("C", 12_000),
        ];
        let outcome = advance_by_count(&field, 2);
        let plan = plan_status_updates(&outcome, true);

        assert_eq!(plan.updates.len(), 2);
        assert_eq!(status_for(&plan, outcome.eliminated[0].student_id), None);
    }

    #[test]
    fn test_plan_finals_too_small_for_podium() {
        let field = vec![competitor("A", 10_000), competitor("B", 11_000)];
        let outcome = advance_all(&field);
        let plan = plan_status_updates(&outcome, true);

        assert!(plan.medalists.is_none());
        assert!(plan
            .updates
            .iter()
            .all(|u| u.status == AdvancementStatus::Finalist));
    }

    #[test]
    fn test_build_summary_groups_by_status() {
        let rows = vec![
            result_row("Winner", Some("champion")),
            result_row("Second", Some("runner_up")),
            result_row("Third", Some("third_place")),
            result_row("Rest", Some("finalist")),
            result_row("Out", Some("eliminated")),
        ];

        let summary = build_summary(&rows).unwrap();
        assert_eq!(summary.advancing.len(), 4);
        assert_eq!(summary.eliminated.len(), 1);
        assert_eq!(summary.champion.as_deref(), Some("Winner"));
        assert_eq!(summary.runner_up.as_deref(), Some("Second"));
        assert_eq!(summary.third_place.as_deref(), Some("Third"));
    }

    #[test]
    fn test_build_summary_skips_rows_without_status() {
        let rows = vec![
            result_row("Marked", Some("advancing")),
            result_row("Unmarked", None),
        ];

        let summary = build_summary(&rows).unwrap();
        assert_eq!(summary.advancing.len(), 1);
        assert!(summary.eliminated.is_empty());
    }

    #[test]
    fn test_build_summary_rejects_unknown_status() {
        let rows = vec![result_row("Bad", Some("promoted"))];
        assert!(build_summary(&rows).is_err());
    }
}
