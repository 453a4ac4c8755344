pub mod common;
pub mod leaderboard;
pub mod rider;
pub mod round;
pub mod submission;
