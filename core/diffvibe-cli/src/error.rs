use diffvibe_core::DiffVibeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] DiffVibeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No recent comparison at index {index} (have {len})")]
    NoSuchRecent { index: usize, len: usize },
}
