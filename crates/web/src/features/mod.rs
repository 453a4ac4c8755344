pub mod lap_times;
pub mod leaderboard;
pub mod review;
pub mod riders;
pub mod rounds;
pub mod sessions;
pub mod submissions;
