pub mod error;
pub mod rank_file;

pub use error::{AdminError, Result};
pub use rank_file::{RankFile, RankedLine};
