use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::rider::RiderSummary;
use super::round::RoundResponse;
use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub submission_id: Uuid,
    pub rider: RiderSummary,
    pub raw_time_ms: i64,
    pub raw_time: String,
    pub penalties: i32,
    pub final_time_ms: i64,
    pub final_time: String,
    /// Final time as a percentage of the leader's, 2 decimals
    pub percent_of_best: f64,
    pub gap_ms: i64,
    pub gap: String,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub round: RoundResponse,
    pub best_time_ms: Option<i64>,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    position: usize,
    rider: &'a str,
    motorcycle: &'a str,
    raw_time: &'a str,
    penalties: i32,
    final_time: &'a str,
    percent_of_best: String,
}

impl LeaderboardResponse {
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for entry in &self.entries {
            writer.serialize(CsvRow {
                position: entry.position,
                rider: &entry.rider.display_name,
                motorcycle: entry.rider.motorcycle.as_deref().unwrap_or(""),
                raw_time: &entry.raw_time,
                penalties: entry.penalties,
                final_time: &entry.final_time,
                percent_of_best: format!("{:.2}", entry.percent_of_best),
            })?;
        }

        if self.entries.is_empty() {
            writer.write_record([
                "position",
                "rider",
                "motorcycle",
                "raw_time",
                "penalties",
                "final_time",
                "percent_of_best",
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| StorageError::Export(e.to_string()))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LapTimePreviewQuery {
    /// Time as typed by the rider
    pub time: String,
    pub penalties: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LapTimePreviewResponse {
    pub raw_time_ms: i64,
    pub raw_time: String,
    pub penalties: i64,
    pub final_time_ms: i64,
    pub final_time: String,
}
