use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::lap_time::{LapTime, MS_PER_SECOND};

/// Time added to a run for every penalty.
pub const PENALTY_MS: i64 = MS_PER_SECOND;

/// Raw time plus penalty contribution. Negative penalty counts add nothing.
pub fn final_time_ms(raw_time_ms: i64, penalties: i64) -> i64 {
    raw_time_ms.saturating_add(penalties.max(0).saturating_mul(PENALTY_MS))
}

/// `final / best * 100`, or `0.0` when the best time is not positive.
pub fn percent_of_best(final_time_ms: i64, best_time_ms: i64) -> f64 {
    if best_time_ms > 0 {
        final_time_ms as f64 / best_time_ms as f64 * 100.0
    } else {
        0.0
    }
}

/// Anything that can take part in a ranking.
///
/// Returning `None` from either accessor marks the entry as unreadable;
/// [`rank`] skips such entries instead of failing.
pub trait TimedEntry {
    fn raw_time_ms(&self) -> Option<i64>;

    fn penalties(&self) -> Option<i64>;

    /// Used to order entries with equal final times: earlier wins.
    fn submitted_at(&self) -> Option<NaiveDateTime> {
        None
    }
}

impl TimedEntry for (i64, i64) {
    fn raw_time_ms(&self) -> Option<i64> {
        Some(self.0)
    }

    fn penalties(&self) -> Option<i64> {
        Some(self.1)
    }
}

/// Entry read from free text, e.g. a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub label: String,
    pub time: String,
    pub penalties: String,
}

impl TimedEntry for TextEntry {
    fn raw_time_ms(&self) -> Option<i64> {
        self.time.parse::<LapTime>().ok().map(|time| time.as_millis())
    }

    fn penalties(&self) -> Option<i64> {
        let penalties = self.penalties.trim();
        if penalties.is_empty() {
            return Some(0);
        }
        penalties.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<E> {
    pub entry: E,
    pub final_time_ms: i64,
    /// 1-based
    pub position: usize,
    pub percent_of_best: f64,
}

/// Rank entries by ascending final time.
///
/// Entries with an unreadable or negative raw time, or unreadable penalties,
/// are left out. Equal final times are ordered by submission time, then by
/// their position in `entries`. Positions are always sequential.
pub fn rank<T: TimedEntry>(entries: &[T]) -> Vec<Ranked<&T>> {
    let mut scored: Vec<(usize, &T, i64)> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let raw = entry.raw_time_ms().filter(|raw| *raw >= 0)?;
            let penalties = entry.penalties()?;
            Some((index, entry, final_time_ms(raw, penalties)))
        })
        .collect();

    scored.sort_by(|a, b| {
        a.2.cmp(&b.2)
            .then_with(|| earlier_first(a.1.submitted_at(), b.1.submitted_at()))
            .then(a.0.cmp(&b.0))
    });

    let best = scored.first().map(|(_, _, final_ms)| *final_ms).unwrap_or(0);

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (_, entry, final_ms))| Ranked {
            entry,
            final_time_ms: final_ms,
            position: index + 1,
            percent_of_best: percent_of_best(final_ms, best),
        })
        .collect()
}

fn earlier_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(label: &str, time: &str, penalties: &str) -> TextEntry {
        TextEntry {
            label: label.to_string(),
            time: time.to_string(),
            penalties: penalties.to_string(),
        }
    }

    struct Stamped {
        raw: i64,
        at: NaiveDateTime,
    }

    impl TimedEntry for Stamped {
        fn raw_time_ms(&self) -> Option<i64> {
            Some(self.raw)
        }

        fn penalties(&self) -> Option<i64> {
            Some(0)
        }

        fn submitted_at(&self) -> Option<NaiveDateTime> {
            Some(self.at)
        }
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_final_time_adds_one_second_per_penalty() {
        assert_eq!(final_time_ms(83_456, 2), 85_456);
        assert_eq!(final_time_ms(83_456, 0), 83_456);
    }

    #[test]
    fn test_final_time_ignores_negative_penalties() {
        assert_eq!(final_time_ms(83_456, -3), 83_456);
    }

    #[test]
    fn test_final_time_never_below_raw() {
        for penalties in -5..5 {
            assert!(final_time_ms(10_000, penalties) >= 10_000);
        }
    }

    #[test]
    fn test_rank_orders_by_final_time() {
        let entries = [(80_000, 0), (90_000, 1), (70_000, 0)];
        let ranked = rank(&entries);

        let finals: Vec<i64> = ranked.iter().map(|r| r.final_time_ms).collect();
        let positions: Vec<usize> = ranked.iter().map(|r| r.position).collect();
        assert_eq!(finals, vec![70_000, 80_000, 91_000]);
        assert_eq!(positions, vec![1, 2, 3]);

        assert_eq!(ranked[0].percent_of_best, 100.0);
        assert!((ranked[1].percent_of_best - 114.2857).abs() < 0.001);
        assert!((ranked[2].percent_of_best - 130.0).abs() < 0.001);
    }

    #[test]
    fn test_rank_does_not_reorder_input() {
        let entries = [(80_000, 0), (70_000, 0)];
        let ranked = rank(&entries);
        assert_eq!(*ranked[0].entry, (70_000, 0));
        assert_eq!(entries, [(80_000, 0), (70_000, 0)]);
    }

    #[test]
    fn test_rank_empty() {
        let entries: [(i64, i64); 0] = [];
        assert!(rank(&entries).is_empty());
    }

    #[test]
    fn test_rank_zero_best_reports_zero_percent() {
        let entries = [(0, 0), (5_000, 0)];
        let ranked = rank(&entries);
        assert!(ranked.iter().all(|r| r.percent_of_best == 0.0));
    }

    #[test]
    fn test_rank_skips_unreadable_entries() {
        let entries = [
            text("alice", "1:20.000", "0"),
            text("bob", "1:10.000", "two"),
            text("carol", "1:30.000", ""),
            text("dave", "not a time", "0"),
        ];
        let ranked = rank(&entries);

        let labels: Vec<&str> = ranked.iter().map(|r| r.entry.label.as_str()).collect();
        assert_eq!(labels, vec!["alice", "carol"]);
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[1].position, 2);
        assert!((ranked[1].percent_of_best - 112.5).abs() < 1e-9);
    }

    #[test]
    fn test_rank_all_unreadable_is_empty() {
        let entries = [text("bob", "1:10.000", "x")];
        assert!(rank(&entries).is_empty());
    }

    #[test]
    fn test_rank_skips_negative_raw_time() {
        let entries = [(-1_000, 0), (5_000, 0)];
        let ranked = rank(&entries);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].final_time_ms, 5_000);
    }

    #[test]
    fn test_rank_ties_earlier_submission_wins() {
        let entries = [
            Stamped { raw: 60_000, at: at(12) },
            Stamped { raw: 60_000, at: at(9) },
            Stamped { raw: 59_000, at: at(15) },
        ];
        let ranked = rank(&entries);

        let hours: Vec<NaiveDateTime> = ranked.iter().map(|r| r.entry.at).collect();
        assert_eq!(hours, vec![at(15), at(9), at(12)]);
        assert_eq!(ranked[1].position, 2);
        assert_eq!(ranked[2].position, 3);
    }

    #[test]
    fn test_rank_ties_without_timestamps_keep_input_order() {
        let entries = [(60_000, 1), (61_000, 0), (50_000, 0)];
        let ranked = rank(&entries);
        assert_eq!(*ranked[1].entry, (60_000, 1));
        assert_eq!(*ranked[2].entry, (61_000, 0));
    }
}
