//! Data types for open comparison tabs.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Fixed id of the home tab.
pub const HOME_TAB_ID: &str = "home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Home,
    Compare,
    Directory,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    #[default]
    File,
    Directory,
    Merge,
}

impl CompareMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareMode::File => "file",
            CompareMode::Directory => "directory",
            CompareMode::Merge => "merge",
        }
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(CompareMode::File),
            "directory" => Ok(CompareMode::Directory),
            "merge" => Ok(CompareMode::Merge),
            other => Err(format!("unknown compare mode: {}", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scan Cache
// ═══════════════════════════════════════════════════════════════════════════════

/// Cached directory scan, opaque to the session layer.
///
/// Cloning shares the underlying value. The backend that produced it gets its
/// concrete type back with [`ScanResult::downcast_ref`].
#[derive(Clone)]
pub struct ScanResult(Arc<dyn Any + Send + Sync>);

impl ScanResult {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True if both handles share the same cached value.
    pub fn ptr_eq(&self, other: &ScanResult) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScanResult(..)")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Directory View State
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-entry comparison status reported by the directory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Identical,
    Modified,
    LeftOnly,
    RightOnly,
}

/// Which rows a directory view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Identical,
    Modified,
    LeftOnly,
    RightOnly,
}

impl StatusFilter {
    pub fn matches(self, status: FileStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Identical => status == FileStatus::Identical,
            StatusFilter::Modified => status == FileStatus::Modified,
            StatusFilter::LeftOnly => status == FileStatus::LeftOnly,
            StatusFilter::RightOnly => status == FileStatus::RightOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectoryState {
    /// Relative paths of expanded directory rows.
    pub expanded: BTreeSet<String>,
    pub scroll_top: f64,
    pub left_selection: Option<String>,
    pub right_selection: Option<String>,
    pub filter: StatusFilter,
    pub show_ignored: bool,
}

/// Partial update for [`DirectoryState`]; `None` fields keep their value.
/// Selections are doubly optional so a patch can clear them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectoryStatePatch {
    pub expanded: Option<BTreeSet<String>>,
    pub scroll_top: Option<f64>,
    pub left_selection: Option<Option<String>>,
    pub right_selection: Option<Option<String>>,
    pub filter: Option<StatusFilter>,
    pub show_ignored: Option<bool>,
}

impl DirectoryState {
    pub fn apply(&mut self, patch: DirectoryStatePatch) {
        if let Some(expanded) = patch.expanded {
            self.expanded = expanded;
        }
        if let Some(scroll_top) = patch.scroll_top {
            self.scroll_top = scroll_top;
        }
        if let Some(selection) = patch.left_selection {
            self.left_selection = selection;
        }
        if let Some(selection) = patch.right_selection {
            self.right_selection = selection;
        }
        if let Some(filter) = patch.filter {
            self.filter = filter;
        }
        if let Some(show_ignored) = patch.show_ignored {
            self.show_ignored = show_ignored;
        }
    }

    /// Expands `rel_path` if collapsed, collapses it otherwise. Returns the new state.
    pub fn toggle_expanded(&mut self, rel_path: &str) -> bool {
        if self.expanded.remove(rel_path) {
            false
        } else {
            self.expanded.insert(rel_path.to_string());
            true
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Home Form
// ═══════════════════════════════════════════════════════════════════════════════

/// Unsubmitted contents of the home screen's comparison form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HomeState {
    pub mode: CompareMode,
    pub left_path: String,
    pub right_path: String,
    pub base_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomeStatePatch {
    pub mode: Option<CompareMode>,
    pub left_path: Option<String>,
    pub right_path: Option<String>,
    pub base_path: Option<String>,
}

impl HomeState {
    pub fn apply(&mut self, patch: HomeStatePatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(left_path) = patch.left_path {
            self.left_path = left_path;
        }
        if let Some(right_path) = patch.right_path {
            self.right_path = right_path;
        }
        if let Some(base_path) = patch.base_path {
            self.base_path = base_path;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tab
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: String,
    pub kind: TabKind,
    pub title: String,
    pub left_path: Option<String>,
    pub right_path: Option<String>,
    pub base_path: Option<String>,
    /// Merge result destination.
    pub output_path: Option<String>,
    pub mode: Option<CompareMode>,
    pub dirty: bool,
    /// Directory tab this tab was drilled into from.
    pub parent_tab_id: Option<String>,
    pub scan_result: Option<ScanResult>,
    pub dir_state: Option<DirectoryState>,
}

impl Tab {
    pub fn home() -> Self {
        Self {
            id: HOME_TAB_ID.to_string(),
            kind: TabKind::Home,
            title: "Home".to_string(),
            left_path: None,
            right_path: None,
            base_path: None,
            output_path: None,
            mode: None,
            dirty: false,
            parent_tab_id: None,
            scan_result: None,
            dir_state: None,
        }
    }

    pub fn is_home(&self) -> bool {
        self.kind == TabKind::Home
    }
}

/// Last path component, accepting either separator. Falls back to the whole path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_handles_both_separators() {
        assert_eq!(file_name("/home/me/a.txt"), "a.txt");
        assert_eq!(file_name("C:\\work\\b.txt"), "b.txt");
        assert_eq!(file_name("/home/me/dir/"), "dir");
        assert_eq!(file_name("plain"), "plain");
        assert_eq!(file_name("/"), "/");
    }

    #[test]
    fn test_directory_state_default() {
        let state = DirectoryState::default();
        assert!(state.expanded.is_empty());
        assert_eq!(state.scroll_top, 0.0);
        assert!(state.left_selection.is_none());
        assert!(state.right_selection.is_none());
        assert_eq!(state.filter, StatusFilter::All);
        assert!(!state.show_ignored);
    }

    #[test]
    fn test_patch_merges_shallowly_and_can_clear_selection() {
        let mut state = DirectoryState {
            left_selection: Some("src/lib.rs".to_string()),
            scroll_top: 40.0,
            ..Default::default()
        };

        state.apply(DirectoryStatePatch {
            left_selection: Some(None),
            filter: Some(StatusFilter::Modified),
            ..Default::default()
        });

        assert!(state.left_selection.is_none());
        assert_eq!(state.scroll_top, 40.0);
        assert_eq!(state.filter, StatusFilter::Modified);
    }

    #[test]
    fn test_toggle_expanded() {
        let mut state = DirectoryState::default();
        assert!(state.toggle_expanded("src"));
        assert!(state.expanded.contains("src"));
        assert!(!state.toggle_expanded("src"));
        assert!(state.expanded.is_empty());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(FileStatus::LeftOnly));
        assert!(StatusFilter::Modified.matches(FileStatus::Modified));
        assert!(!StatusFilter::Modified.matches(FileStatus::Identical));
        assert_eq!(
            serde_json::to_value(StatusFilter::LeftOnly).unwrap(),
            serde_json::json!("left-only")
        );
    }

    #[test]
    fn test_scan_result_downcasts_and_shares() {
        let scan = ScanResult::new(vec![1u32, 2, 3]);
        let copy = scan.clone();

        assert_eq!(copy.downcast_ref::<Vec<u32>>(), Some(&vec![1, 2, 3]));
        assert!(copy.downcast_ref::<String>().is_none());
        assert!(scan.ptr_eq(&copy));
    }

    #[test]
    fn test_compare_mode_parses() {
        assert_eq!("directory".parse::<CompareMode>(), Ok(CompareMode::Directory));
        assert!("tree".parse::<CompareMode>().is_err());
        assert_eq!(CompareMode::Merge.to_string(), "merge");
    }
}
