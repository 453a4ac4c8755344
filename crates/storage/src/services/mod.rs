pub mod lap_time;
pub mod leaderboard;
pub mod scoring;
