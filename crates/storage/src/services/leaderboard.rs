use std::collections::HashMap;
use std::collections::hash_map::Entry;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardResponse};
use crate::dto::rider::RiderSummary;
use crate::dto::round::RoundResponse;
use crate::error::Result;
use crate::models::display_name;
use crate::repository::leaderboard::{LeaderboardRepository, LeaderboardRow};
use crate::repository::round::RoundRepository;

use super::lap_time::format_lap_time;
use super::scoring;

/// Leaderboard of a round: each rider's best approved run, ranked.
pub async fn round_leaderboard(pool: &PgPool, slug: &str) -> Result<LeaderboardResponse> {
    let round = RoundRepository::new(pool).find_by_slug(slug).await?;
    let rows = LeaderboardRepository::new(pool)
        .approved_for_round(round.round_id)
        .await?;

    tracing::debug!(round = %round.slug, approved = rows.len(), "Building leaderboard");

    Ok(build_leaderboard(RoundResponse::from(round), rows))
}

pub fn build_leaderboard(round: RoundResponse, rows: Vec<LeaderboardRow>) -> LeaderboardResponse {
    let best_runs = best_per_rider(rows);
    let ranked = scoring::rank(&best_runs);
    let best_time_ms = ranked.first().map(|r| r.final_time_ms);

    let entries = ranked
        .into_iter()
        .map(|ranked| {
            let row = ranked.entry;
            let gap_ms = ranked.final_time_ms - best_time_ms.unwrap_or(ranked.final_time_ms);
            LeaderboardEntry {
                position: ranked.position,
                submission_id: row.submission_id,
                rider: RiderSummary {
                    rider_id: row.rider_id,
                    display_name: display_name(
                        &row.first_name,
                        &row.last_name,
                        row.nickname.as_deref(),
                    ),
                    motorcycle: row.motorcycle.clone(),
                },
                raw_time_ms: row.raw_time_ms,
                raw_time: format_lap_time(row.raw_time_ms),
                penalties: row.penalties,
                final_time_ms: ranked.final_time_ms,
                final_time: format_lap_time(ranked.final_time_ms),
                percent_of_best: round_2dp(ranked.percent_of_best),
                gap_ms,
                gap: format!("+{}", format_lap_time(gap_ms)),
                submitted_at: row.submitted_at,
            }
        })
        .collect();

    LeaderboardResponse {
        round,
        best_time_ms,
        entries,
    }
}

/// Keep one run per rider: lowest final time, earliest submission on a tie.
/// The surviving runs keep the order of their first appearance.
pub fn best_per_rider(rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    let mut best: Vec<LeaderboardRow> = Vec::new();
    let mut index_by_rider: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        match index_by_rider.entry(row.rider_id) {
            Entry::Vacant(slot) => {
                slot.insert(best.len());
                best.push(row);
            }
            Entry::Occupied(slot) => {
                let current = &mut best[*slot.get()];
                if beats(&row, current) {
                    *current = row;
                }
            }
        }
    }

    best
}

fn beats(candidate: &LeaderboardRow, current: &LeaderboardRow) -> bool {
    let candidate_key = (final_time(candidate), candidate.submitted_at);
    let current_key = (final_time(current), current.submitted_at);
    candidate_key < current_key
}

fn final_time(row: &LeaderboardRow) -> i64 {
    scoring::final_time_ms(row.raw_time_ms, i64::from(row.penalties))
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .and_then(|d| d.and_hms_opt(10, minute, 0))
            .unwrap()
    }

    fn row(rider: u128, raw_time_ms: i64, penalties: i32, minute: u32) -> LeaderboardRow {
        LeaderboardRow {
            submission_id: Uuid::from_u128(rider * 1000 + u128::from(minute)),
            rider_id: Uuid::from_u128(rider),
            first_name: format!("Rider{}", rider),
            last_name: "Test".to_string(),
            nickname: None,
            motorcycle: None,
            raw_time_ms,
            penalties,
            submitted_at: at(minute),
        }
    }

    fn round() -> RoundResponse {
        RoundResponse {
            round_id: Uuid::nil(),
            name: "Round 1".to_string(),
            slug: "round-1".to_string(),
            description: None,
            status: "open".to_string(),
            created_at: at(0),
            closed_at: None,
        }
    }

    #[test]
    fn test_best_per_rider_keeps_lowest_final_time() {
        let rows = vec![
            row(1, 80_000, 0, 1),
            row(2, 75_000, 0, 2),
            row(1, 76_000, 1, 3),
            row(1, 78_000, 0, 4),
        ];

        let best = best_per_rider(rows);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].rider_id, Uuid::from_u128(1));
        assert_eq!(best[0].submitted_at, at(3));
        assert_eq!(best[1].rider_id, Uuid::from_u128(2));
    }

    #[test]
    fn test_best_per_rider_tie_keeps_earlier_run() {
        let rows = vec![row(1, 60_000, 0, 9), row(1, 59_000, 1, 5)];
        let best = best_per_rider(rows);
        assert_eq!(best[0].submitted_at, at(5));
    }

    #[test]
    fn test_build_leaderboard() {
        let rows = vec![
            row(1, 80_000, 0, 1),
            row(2, 90_000, 1, 2),
            row(3, 70_000, 0, 3),
        ];

        let leaderboard = build_leaderboard(round(), rows);
        assert_eq!(leaderboard.best_time_ms, Some(70_000));

        let entries = &leaderboard.entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rider.display_name, "Rider3 Test");
        assert_eq!(entries[0].gap, "+0:00.000");
        assert_eq!(entries[1].position, 2);
        assert_eq!(entries[1].percent_of_best, 114.29);
        assert_eq!(entries[1].gap_ms, 10_000);
        assert_eq!(entries[2].final_time, "1:31.000");
        assert_eq!(entries[2].raw_time, "1:30.000");
        assert_eq!(entries[2].gap, "+0:21.000");
    }

    #[test]
    fn test_build_leaderboard_empty() {
        let leaderboard = build_leaderboard(round(), Vec::new());
        assert!(leaderboard.entries.is_empty());
        assert_eq!(leaderboard.best_time_ms, None);
    }
}
