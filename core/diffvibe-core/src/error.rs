//! Error types for diffvibe-core operations.
//!
//! Only collaborator boundaries (persistence, highlighting) produce errors.
//! Session-state operations are total and never return one.

use std::path::PathBuf;

/// All errors that can occur in diffvibe-core operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffVibeError {
    // ─────────────────────────────────────────────────────────────────────
    // Persistence Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage file malformed: {path}: {details}")]
    StorageMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Highlighting Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Highlighter initialization failed: {0}")]
    HighlighterInit(String),

    #[error("Tokenizing {language} failed: {details}")]
    Tokenize { language: String, details: String },
}

/// Convenience type alias for Results using DiffVibeError.
pub type Result<T> = std::result::Result<T, DiffVibeError>;

// Tauri commands return errors as strings.
impl From<DiffVibeError> for String {
    fn from(err: DiffVibeError) -> String {
        err.to_string()
    }
}
