//! Storage configuration and path management for DiffVibe.
//!
//! `StorageConfig` is the single place that decides where DiffVibe keeps its
//! data. Production code uses [`StorageConfig::from_env`], which honours
//! `DIFFVIBE_HOME` and otherwise points at `~/.diffvibe/`. Tests use
//! [`StorageConfig::with_root`] with a temp directory for isolation.

use std::path::{Path, PathBuf};

/// Environment variable overriding the storage root.
pub const HOME_ENV_VAR: &str = "DIFFVIBE_HOME";

/// Central configuration for all DiffVibe storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all DiffVibe data (default: ~/.diffvibe)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(".diffvibe"))
            .unwrap_or_else(|| PathBuf::from(".diffvibe"));
        Self { root }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Uses `DIFFVIBE_HOME` when set and non-empty, the default root otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(HOME_ENV_VAR) {
            Some(value) if !value.is_empty() => Self::with_root(PathBuf::from(value)),
            _ => Self::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to recent.json (most-recently-used comparisons).
    pub fn recent_file(&self) -> PathBuf {
        self.root.join("recent.json")
    }

    /// Path to local-storage.json (theme and syntax theme preferences).
    pub fn local_storage_file(&self) -> PathBuf {
        self.root.join("local-storage.json")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directories
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to logs/ directory (CLI log files).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)?;
        fs_err::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_root_is_diffvibe() {
        let config = StorageConfig::default();
        assert!(config.root().ends_with(".diffvibe"));
    }

    #[test]
    fn test_with_root_sets_custom_path() {
        let config = StorageConfig::with_root(PathBuf::from("/tmp/test-diffvibe"));
        assert_eq!(config.root(), Path::new("/tmp/test-diffvibe"));
    }

    #[test]
    fn test_file_paths() {
        let config = StorageConfig::with_root(PathBuf::from("/tmp/diffvibe"));
        assert_eq!(
            config.recent_file(),
            PathBuf::from("/tmp/diffvibe/recent.json")
        );
        assert_eq!(
            config.local_storage_file(),
            PathBuf::from("/tmp/diffvibe/local-storage.json")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/diffvibe/logs"));
    }

    #[test]
    fn test_ensure_dirs_creates_structure() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig::with_root(temp.path().join("nested"));

        config.ensure_dirs().unwrap();

        assert!(config.root().exists());
        assert!(config.logs_dir().exists());
    }
}
