use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),
}
