use crate::dto::advancement::{AdvancementOutcome, AdvancementStatus, CompetitorResult};
use crate::dto::report::{AdvancementReport, AdvancementStats, ReportRow};

/// Render a time in seconds with two decimals, or "N/A" when there is none.
pub fn format_time(time_ms: Option<i64>) -> String {
    match time_ms {
        Some(ms) => format!("{:.2}s", ms as f64 / 1000.0),
        None => "N/A".to_string(),
    }
}

/// Turn an advancement outcome into display rows, advancing competitors
/// first, each with the rank the sort assigned.
pub fn generate_report(outcome: &AdvancementOutcome) -> AdvancementReport {
    let rows = outcome
        .advancing
        .iter()
        .map(|competitor| report_row(competitor, AdvancementStatus::Advancing))
        .chain(
            outcome
                .eliminated
                .iter()
                .map(|competitor| report_row(competitor, AdvancementStatus::Eliminated)),
        )
        .collect();

    let fastest_advancing = outcome
        .advancing
        .first()
        .map(|competitor| format_time(competitor.valid_time()));
    let slowest_advancing = outcome
        .advancing
        .last()
        .map(|competitor| format_time(competitor.valid_time()));

    AdvancementReport {
        cutoff_applied: outcome.cutoff_applied.clone(),
        rows,
        fastest_advancing,
        slowest_advancing,
    }
}

fn report_row(competitor: &CompetitorResult, status: AdvancementStatus) -> ReportRow {
    ReportRow {
        rank: competitor.round_rank,
        student_name: competitor.student_name.clone(),
        time: format_time(competitor.valid_time()),
        status,
    }
}

/// Aggregate statistics over an advancement outcome. Time aggregates cover
/// valid times only; DNF/DNS show up in their own counters.
pub fn advancement_stats(outcome: &AdvancementOutcome) -> AdvancementStats {
    let field: Vec<&CompetitorResult> = outcome
        .advancing
        .iter()
        .chain(outcome.eliminated.iter())
        .collect();

    let mut valid_times: Vec<i64> = field.iter().filter_map(|c| c.valid_time()).collect();
    valid_times.sort_unstable();

    let advancing_percentage = if outcome.total_competitors == 0 {
        0.0
    } else {
        outcome.advancing_count as f64 * 100.0 / outcome.total_competitors as f64
    };

    AdvancementStats {
        total_competitors: outcome.total_competitors,
        advancing_count: outcome.advancing_count,
        eliminated_count: outcome.eliminated_count,
        dnf_count: field.iter().filter(|c| c.is_dnf).count(),
        dns_count: field.iter().filter(|c| c.is_dns).count(),
        advancing_percentage,
        mean_time_ms: mean(&valid_times),
        median_time_ms: median(&valid_times),
        fastest_time_ms: valid_times.first().copied(),
        slowest_time_ms: valid_times.last().copied(),
    }
}

fn mean(sorted_times: &[i64]) -> Option<f64> {
    if sorted_times.is_empty() {
        return None;
    }
    let sum: i64 = sorted_times.iter().sum();
    Some(sum as f64 / sorted_times.len() as f64)
}

fn median(sorted_times: &[i64]) -> Option<f64> {
    if sorted_times.is_empty() {
        return None;
    }
    let middle = sorted_times.len() / 2;
    if sorted_times.len() % 2 == 0 {
        Some((sorted_times[middle - 1] + sorted_times[middle]) as f64 / 2.0)
    } else {
        Some(sorted_times[middle] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::advancement::{advance_by_count, advance_by_time};
    use uuid::Uuid;

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

    fn flagged(name: &str, is_dnf: bool, is_dns: bool) -> CompetitorResult {
        CompetitorResult {
            best_time_ms: None,
            is_dnf,
            is_dns,
            ..competitor(name, 0)
        }
    }

    #[test]
    fn test_format_time_renders_two_decimals() {
        assert_eq!(format_time(Some(12_345)), "12.35s");
        assert_eq!(format_time(Some(10_000)), "10.00s");
        assert_eq!(format_time(None), "N/A");
    }

    #[test]
    fn test_report_orders_advancing_before_eliminated() {
        let field = vec![
            competitor("Slow", 20_000),
            competitor("Fast", 10_000),
            competitor("Mid", 15_000),
        ];
        let report = generate_report(&advance_by_count(&field, 2));

        let names: Vec<&str> = report.rows.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Fast", "Mid", "Slow"]);
        assert_eq!(report.rows[0].status, AdvancementStatus::Advancing);
        assert_eq!(report.rows[2].status, AdvancementStatus::Eliminated);
        assert_eq!(report.rows[0].rank, Some(1));
        assert_eq!(report.rows[2].rank, Some(3));
    }

    #[test]
    fn test_report_tracks_advancing_time_range() {
        let field = vec![
            competitor("A", 10_000),
            competitor("B", 12_500),
            competitor("C", 30_000),
        ];
        let report = generate_report(&advance_by_time(&field, 13_000));

        assert_eq!(report.fastest_advancing.as_deref(), Some("10.00s"));
        assert_eq!(report.slowest_advancing.as_deref(), Some("12.50s"));
    }

    #[test]
    fn test_report_with_nobody_advancing_has_no_time_range() {
        let field = vec![competitor("A", 20_000)];
        let report = generate_report(&advance_by_time(&field, 10_000));

        assert!(report.fastest_advancing.is_none());
        assert!(report.slowest_advancing.is_none());
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_stats_aggregate_valid_times() {
        let field = vec![
            competitor("A", 10_000),
            competitor("B", 12_000),
            competitor("C", 14_000),
            flagged("D", true, false),
        ];
        let stats = advancement_stats(&advance_by_count(&field, 2));

        assert_eq!(stats.total_competitors, 4);
        assert_eq!(stats.advancing_count, 2);
        assert_eq!(stats.eliminated_count, 2);
        assert_eq!(stats.dnf_count, 1);
        assert_eq!(stats.dns_count, 0);
        assert_eq!(stats.advancing_percentage, 50.0);
        assert_eq!(stats.mean_time_ms, Some(12_000.0));
        assert_eq!(stats.median_time_ms, Some(12_000.0));
        assert_eq!(stats.fastest_time_ms, Some(10_000));
        assert_eq!(stats.slowest_time_ms, Some(14_000));
    }

    #[test]
    fn test_stats_median_averages_middle_pair() {
        let field = vec![
            competitor("A", 10_000),
            competitor("B", 11_000),
            competitor("C", 13_000),
            competitor("D", 15_000),
        ];
        let stats = advancement_stats(&advance_by_count(&field, 4));
        assert_eq!(stats.median_time_ms, Some(12_000.0));
    }

    #[test]
    fn test_stats_with_no_valid_times() {
        let field = vec![flagged("A", true, false), flagged("B", false, true)];
        let stats = advancement_stats(&advance_by_count(&field, 1));

        assert_eq!(stats.dnf_count, 1);
        assert_eq!(stats.dns_count, 1);
        assert!(stats.mean_time_ms.is_none());
        assert!(stats.median_time_ms.is_none());
        assert!(stats.fastest_time_ms.is_none());
    }
}
