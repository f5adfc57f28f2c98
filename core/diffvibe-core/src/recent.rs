//! Most-recently-used list of comparisons, persisted across restarts.
//!
//! Entries are newest first, capped at [`MAX_RECENT`], and unique per
//! `(left, right)` pair. Re-adding a pair moves it to the front with a fresh
//! timestamp.
//!
//! Mutations update memory first and then persist. A failed write is returned
//! to the caller but the in-memory list keeps the change, so memory and disk
//! can diverge until the next successful write.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{DiffVibeError, Result};
use crate::kv::{get_json, set_json, SharedKeyValueStore};
use crate::tabs::CompareMode;

/// Key under which the list is stored.
pub const STORE_KEY: &str = "recent_comparisons";

/// Maximum number of remembered comparisons.
pub const MAX_RECENT: usize = 10;

/// A remembered comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentComparison {
    pub left: String,
    pub right: String,
    pub mode: CompareMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Unix time in milliseconds.
    pub timestamp: i64,
}

/// A comparison about to be recorded; the store stamps the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecentComparison {
    pub left: String,
    pub right: String,
    pub mode: CompareMode,
    pub base: Option<String>,
}

impl NewRecentComparison {
    pub fn new(left: impl Into<String>, right: impl Into<String>, mode: CompareMode) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            mode,
            base: None,
        }
    }

    pub fn with_base(mut self, base: Option<String>) -> Self {
        self.base = base;
        self
    }
}

pub struct RecentStore {
    items: Vec<RecentComparison>,
    store: SharedKeyValueStore,
    initialized: bool,
    /// Cleared when the saved list could not be read, so it is never overwritten.
    persist: bool,
}

impl RecentStore {
    pub fn new(store: SharedKeyValueStore) -> Self {
        Self {
            items: Vec::new(),
            store,
            initialized: false,
            persist: true,
        }
    }

    /// Loads the persisted list once. Later calls do nothing.
    ///
    /// A load failure is logged and leaves the list empty. Unparseable contents
    /// are replaced by the next write. Any other failure (e.g. an I/O error)
    /// keeps the session in memory only, leaving the saved list untouched.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match get_json::<Vec<RecentComparison>>(&self.store, STORE_KEY) {
            Ok(Some(mut saved)) => {
                saved.truncate(MAX_RECENT);
                debug!(count = saved.len(), "Loaded recent comparisons");
                self.items = saved;
            }
            Ok(None) => {}
            Err(err @ (DiffVibeError::StorageMalformed { .. } | DiffVibeError::Json { .. })) => {
                error!(error = %err, "Recent comparisons unreadable, next save replaces them");
            }
            Err(err) => {
                self.persist = false;
                error!(
                    error = %err,
                    "Failed to load recent comparisons, keeping changes in memory only"
                );
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn items(&self) -> &[RecentComparison] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&RecentComparison> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records a comparison at the front of the list and persists.
    pub fn add(&mut self, comparison: NewRecentComparison) -> Result<()> {
        self.init();

        self.items
            .retain(|item| !(item.left == comparison.left && item.right == comparison.right));

        self.items.insert(
            0,
            RecentComparison {
                left: comparison.left,
                right: comparison.right,
                mode: comparison.mode,
                base: comparison.base,
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        self.items.truncate(MAX_RECENT);

        self.save()
    }

    /// Drops the entry at `index`. An out-of-range index changes nothing.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.init();
        if index < self.items.len() {
            self.items.remove(index);
        }
        self.save()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.init();
        self.items.clear();
        self.save()
    }

    /// False when changes are kept in memory only.
    pub fn is_persistent(&self) -> bool {
        self.persist
    }

    fn save(&self) -> Result<()> {
        if !self.persist {
            debug!(count = self.items.len(), "Skipping save of recent comparisons");
            return Ok(());
        }
        set_json(&self.store, STORE_KEY, &self.items)
    }
}
