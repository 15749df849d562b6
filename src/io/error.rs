use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid record at line {line}: {msg}")]
    InvalidRecord { line: u64, msg: String },

    #[error("Unknown station group: {0}")]
    UnknownGroup(String),
}
