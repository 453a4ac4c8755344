//! Offline ranking of a CSV file with `rider,time,penalties` columns.

use std::io::Read;

use serde::Deserialize;
use storage::services::{
    lap_time::format_lap_time,
    scoring::{self, TimedEntry, TextEntry},
};

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct CsvEntry {
    rider: String,
    time: String,
    #[serde(default)]
    penalties: String,
}

/// Rows read from a rank file, plus the line numbers of rows that could
/// not be decoded.
#[derive(Debug, Default)]
pub struct RankFile {
    pub entries: Vec<TextEntry>,
    pub skipped_rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedLine {
    pub position: usize,
    pub rider: String,
    pub raw_time: String,
    pub penalties: i64,
    pub final_time: String,
    pub percent_of_best: f64,
}

impl RankFile {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut file = Self::default();
        for (index, record) in reader.deserialize::<CsvEntry>().enumerate() {
            // header is line 1
            let line = index + 2;
            match record {
                Ok(row) => file.entries.push(TextEntry {
                    label: row.rider,
                    time: row.time,
                    penalties: row.penalties,
                }),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping unreadable row");
                    file.skipped_rows.push(line);
                }
            }
        }

        Ok(file)
    }

    pub fn rank(&self) -> Vec<RankedLine> {
        scoring::rank(&self.entries)
            .into_iter()
            .map(|ranked| RankedLine {
                position: ranked.position,
                rider: ranked.entry.label.clone(),
                raw_time: format_lap_time(ranked.entry.raw_time_ms().unwrap_or(0)),
                penalties: ranked.entry.penalties().unwrap_or(0),
                final_time: format_lap_time(ranked.final_time_ms),
                percent_of_best: ranked.percent_of_best,
            })
            .collect()
    }

    /// Riders whose time or penalties could not be read
    pub fn unranked(&self) -> Vec<&TextEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                entry.raw_time_ms().is_none_or(|raw| raw < 0) || entry.penalties().is_none()
            })
            .collect()
    }
}

pub fn render_table(lines: &[RankedLine]) -> String {
    let rider_width = lines
        .iter()
        .map(|line| line.rider.chars().count())
        .max()
        .unwrap_or(0)
        .max("Rider".len());

    let mut out = format!(
        "{:>3}  {:<rider_width$}  {:>10}  {:>3}  {:>10}  {:>8}\n",
        "#", "Rider", "Raw", "Pen", "Final", "%"
    );
    for line in lines {
        out.push_str(&format!(
            "{:>3}  {:<rider_width$}  {:>10}  {:>3}  {:>10}  {:>8.2}\n",
            line.position,
            line.rider,
            line.raw_time,
            line.penalties,
            line.final_time,
            line.percent_of_best
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
rider,time,penalties
Alice,1:23.456,0
Bob,80.0,2
Carol,1:2x.000,0
Dave,79.9,
Eve
Frank,-5.0,0
";

    #[test]
    fn test_reads_rows_and_skips_unreadable_ones() {
        let file = RankFile::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(file.entries.len(), 5);
        assert_eq!(file.skipped_rows, vec![6]);
        assert_eq!(file.entries[3].label, "Dave");
        assert_eq!(file.entries[3].penalties, "");
    }

    #[test]
    fn test_rank_orders_by_final_time() {
        let file = RankFile::from_reader(SAMPLE.as_bytes()).unwrap();
        let lines = file.rank();

        let riders: Vec<&str> = lines.iter().map(|l| l.rider.as_str()).collect();
        assert_eq!(riders, vec!["Dave", "Bob", "Alice"]);
        assert_eq!(lines[0].position, 1);
        assert_eq!(lines[0].final_time, "1:19.900");
        assert_eq!(lines[0].percent_of_best, 100.0);
        assert_eq!(lines[1].raw_time, "1:20.000");
        assert_eq!(lines[1].final_time, "1:22.000");
        assert_eq!(lines[2].position, 3);
    }

    #[test]
    fn test_unranked_entries() {
        let file = RankFile::from_reader(SAMPLE.as_bytes()).unwrap();
        let unranked: Vec<&str> = file.unranked().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(unranked, vec!["Carol", "Frank"]);
    }

    #[test]
    fn test_render_table() {
        let lines = vec![RankedLine {
            position: 1,
            rider: "Alice".to_string(),
            raw_time: "1:23.456".to_string(),
            penalties: 1,
            final_time: "1:24.456".to_string(),
            percent_of_best: 100.0,
        }];

        let table = render_table(&lines);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Rider"));
        assert!(rows[1].contains("Alice"));
        assert!(rows[1].ends_with("100.00"));
    }
}
