use std::cmp::Ordering;

use crate::dto::advancement::{
    AdvancementOutcome, AdvancementRule, CompetitorResult, FinalsQualifier, Medalists, RoundConfig,
};
use crate::error::AdvancementError;

/// Bracket size used when a finals round does not configure its own.
pub const DEFAULT_FINALS_SIZE: usize = 8;

/// Rank a field of competitors: valid times ascending, then everyone with a
/// DNF or DNS flag in input order. Equal times keep input order as well.
/// Ranks are assigned 1-based across the whole sorted field.
pub fn sort_by_time(results: &[CompetitorResult]) -> Vec<CompetitorResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| match (a.valid_time(), b.valid_time()) {
        (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    for (index, competitor) in sorted.iter_mut().enumerate() {
        competitor.round_rank = Some(index as u32 + 1);
    }

    sorted
}

/// Advance the top `percentage` of competitors holding a valid time. The
/// advancing count is `ceil(valid_count * percentage / 100)`, so a field
/// where everyone DNF'd advances nobody.
pub fn advance_by_percentage(results: &[CompetitorResult], percentage: f64) -> AdvancementOutcome {
    let mut advancing = sort_by_time(results);
    let valid_count = advancing.iter().filter(|c| c.has_valid_time()).count();
    let advance_count =
        ((valid_count as f64 * percentage / 100.0).ceil() as usize).min(advancing.len());

    let eliminated = advancing.split_off(advance_count);
    let cutoff_applied = format!("Top {}% ({} competitors)", percentage, advancing.len());

    AdvancementOutcome::new(advancing, eliminated, cutoff_applied)
}

/// Advance the `top_count` fastest competitors. A count larger than the
/// field advances everyone.
pub fn advance_by_count(results: &[CompetitorResult], top_count: usize) -> AdvancementOutcome {
    let mut advancing = sort_by_time(results);
    let advance_count = top_count.min(advancing.len());

    let eliminated = advancing.split_off(advance_count);
    let cutoff_applied = format!("Top {} competitors", advancing.len());

    AdvancementOutcome::new(advancing, eliminated, cutoff_applied)
}

/// Advance every competitor at or under the cutoff time. DNF/DNS and
/// missing times never qualify, whatever time was recorded.
pub fn advance_by_time(results: &[CompetitorResult], cutoff_time_ms: i64) -> AdvancementOutcome {
    let sorted = sort_by_time(results);
    let (advancing, eliminated): (Vec<_>, Vec<_>) = sorted
        .into_iter()
        .partition(|c| c.valid_time().is_some_and(|time| time <= cutoff_time_ms));

    let cutoff_applied = format!("Under {:.2}s", cutoff_time_ms as f64 / 1000.0);

    AdvancementOutcome::new(advancing, eliminated, cutoff_applied)
}

/// Advance the whole field, ranked. Used for qualification rounds.
pub fn advance_all(results: &[CompetitorResult]) -> AdvancementOutcome {
    let advancing = sort_by_time(results);

    AdvancementOutcome::new(advancing, Vec::new(), "All competitors advance".to_string())
}

/// Apply a round's configured advancement policy to a field of results.
/// Fails before touching the field when the configuration is missing the
/// cutoff its type requires.
pub fn calculate_advancement(
    results: &[CompetitorResult],
    config: &RoundConfig,
) -> Result<AdvancementOutcome, AdvancementError> {
    let outcome = match config.rule()? {
        AdvancementRule::TopPercentage(percentage) => advance_by_percentage(results, percentage),
        AdvancementRule::TopCount(count) => advance_by_count(results, count),
        AdvancementRule::UnderTime(cutoff_time_ms) => advance_by_time(results, cutoff_time_ms),
        AdvancementRule::All => advance_all(results),
    };

    Ok(outcome)
}

/// Seed a finals bracket from an advancing set: the `finals_size` fastest
/// competitors, seeded 1-based from the fastest.
pub fn generate_finals(results: &[CompetitorResult], finals_size: usize) -> Vec<FinalsQualifier> {
    sort_by_time(results)
        .into_iter()
        .take(finals_size)
        .enumerate()
        .map(|(index, competitor)| FinalsQualifier {
            seed: index as u32 + 1,
            student_id: competitor.student_id,
            student_name: competitor.student_name,
            best_time_ms: competitor.best_time_ms,
        })
        .collect()
}

/// Pick the podium from a finals field. Fewer than three competitors cannot
/// fill a podium, so that case yields no medalists rather than an error.
pub fn determine_medalists(results: &[CompetitorResult]) -> Option<Medalists> {
    if results.len() < 3 {
        return None;
    }

    let mut sorted = sort_by_time(results);
    let finalists = sorted.split_off(3);
    let mut podium = sorted.into_iter();

    Some(Medalists {
        champion: podium.next()?,
        runner_up: podium.next()?,
        third_place: podium.next()?,
        finalists,
    })
}
