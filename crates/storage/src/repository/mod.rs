pub mod leaderboard;
pub mod rider;
pub mod round;
pub mod session;
pub mod submission;
