//! Application session: owns every store and the shared highlighter.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DiffVibeError, Result};
use crate::highlight::{HighlightRequests, Highlighter};
use crate::kv::{shared, JsonFileStore, MemoryStore, SharedKeyValueStore};
use crate::preferences::{SyntaxThemeStore, SystemAppearance, ThemeStore};
use crate::recent::RecentStore;
use crate::storage::StorageConfig;
use crate::tabs::{TabEvent, TabStore};

/// One instance per application window; tests construct their own.
pub struct AppSession {
    storage: Option<StorageConfig>,
    pub tabs: TabStore,
    pub theme: ThemeStore,
    pub syntax_theme: SyntaxThemeStore,
    pub highlighter: Arc<Highlighter>,
    /// Pending highlight jobs, keyed by [`pane_key`]. Entries for closed tabs
    /// are dropped automatically.
    pub highlight_requests: Arc<HighlightRequests>,
}

/// Panes a tab can request highlighting for.
pub const PANES: [&str; 4] = ["left", "right", "base", "output"];

impl AppSession {
    /// Opens a session backed by the JSON files under `storage`.
    ///
    /// Only directory creation can fail here; the files themselves are read
    /// lazily by [`AppSession::init`].
    pub fn open(storage: StorageConfig) -> Result<Self> {
        storage
            .ensure_dirs()
            .map_err(|source| DiffVibeError::Io {
                context: format!("creating {}", storage.root().display()),
                source,
            })?;

        let recent = shared(JsonFileStore::new(storage.recent_file()));
        let local = shared(JsonFileStore::new(storage.local_storage_file()));
        debug!(root = %storage.root().display(), "Opened session storage");

        Ok(Self::build(
            Some(storage),
            recent,
            local,
            Arc::new(Highlighter::syntect()),
        ))
    }

    /// Session with nothing persisted, for tests and previews.
    pub fn in_memory() -> Self {
        Self::with_stores(
            shared(MemoryStore::new()),
            shared(MemoryStore::new()),
            Arc::new(Highlighter::syntect()),
        )
    }

    /// Session over caller-provided stores and highlighter.
    pub fn with_stores(
        recent: SharedKeyValueStore,
        local: SharedKeyValueStore,
        highlighter: Arc<Highlighter>,
    ) -> Self {
        Self::build(None, recent, local, highlighter)
    }

    fn build(
        storage: Option<StorageConfig>,
        recent: SharedKeyValueStore,
        local: SharedKeyValueStore,
        highlighter: Arc<Highlighter>,
    ) -> Self {
        let highlight_requests = Arc::new(HighlightRequests::new());
        let mut tabs = TabStore::new(RecentStore::new(recent));

        let requests = highlight_requests.clone();
        tabs.subscribe(move |event| match event {
            TabEvent::Closed { id } => {
                for pane in PANES {
                    requests.forget(&pane_key(id, pane));
                }
            }
            TabEvent::Reset => requests.clear(),
            _ => {}
        });

        Self {
            storage,
            tabs,
            theme: ThemeStore::new(local.clone()),
            syntax_theme: SyntaxThemeStore::new(local).with_highlighter(highlighter.clone()),
            highlighter,
            highlight_requests,
        }
    }

    /// Loads persisted recents and preferences. Safe to call more than once.
    pub fn init(&mut self, system: SystemAppearance) {
        self.tabs.recent_mut().init();
        self.theme.init(system);
        self.syntax_theme.init(system);
    }

    /// Reacts to an OS appearance change.
    pub fn on_system_appearance_change(&mut self, system: SystemAppearance) {
        self.theme.on_system_change(system);
    }

    /// Closes a tab. Pending highlight requests for its panes become stale.
    pub fn close_tab(&mut self, id: &str, force: bool) -> bool {
        self.tabs.close(id, force)
    }

    /// Storage location, or `None` for sessions not backed by files.
    pub fn storage(&self) -> Option<&StorageConfig> {
        self.storage.as_ref()
    }
}

/// Request key for one pane of a tab, as used with [`HighlightRequests`].
pub fn pane_key(tab_id: &str, pane: &str) -> String {
    format!("{}:{}", tab_id, pane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::test_utils::EchoTokenizer;
    use crate::preferences::Theme;
    use crate::tabs::{CompareMode, HOME_TAB_ID};
    use serde_json::json;
    use tempfile::TempDir;

    fn echo_session() -> AppSession {
        AppSession::with_stores(
            shared(MemoryStore::new()),
            shared(MemoryStore::new()),
            Arc::new(Highlighter::with_tokenizer(EchoTokenizer)),
        )
    }

    #[test]
    fn test_in_memory_session_starts_on_home() {
        let mut session = AppSession::in_memory();
        session.init(SystemAppearance::Dark);

        assert_eq!(session.tabs.active_tab_id(), HOME_TAB_ID);
        assert!(session.tabs.recent().is_empty());
        assert_eq!(session.theme.value(), Theme::Dark);
        assert_eq!(session.syntax_theme.value(), "github-dark");
        assert!(session.storage().is_none());
    }

    #[test]
    fn test_init_loads_saved_preferences_into_highlighter() {
        let local = shared(MemoryStore::new().with_entry("diffvibe-syntax-theme", json!("nord")));
        let mut session = AppSession::with_stores(
            shared(MemoryStore::new()),
            local,
            Arc::new(Highlighter::with_tokenizer(EchoTokenizer)),
        );
        session.init(SystemAppearance::Light);

        assert_eq!(session.theme.value(), Theme::Light);
        assert_eq!(session.highlighter.theme(), "nord");
        let markup = session.highlighter.highlight_lines(&["x".to_string()], "a.rs");
        assert_eq!(markup, vec!["<span class=\"rust nord\">x</span>".to_string()]);
    }

    #[test]
    fn test_close_tab_forgets_pending_highlights() {
        let mut session = echo_session();
        let id = session
            .tabs
            .open_compare("a.rs", "b.rs", CompareMode::File, None, None);
        let ticket = session.highlight_requests.begin(&pane_key(&id, "left"));

        assert!(session.close_tab(&id, false));
        assert!(!session.highlight_requests.is_current(&ticket));
    }

    #[test]
    fn test_blocked_close_keeps_pending_highlights() {
        let mut session = echo_session();
        let id = session
            .tabs
            .open_compare("a.rs", "b.rs", CompareMode::File, None, None);
        session.tabs.set_dirty(&id, true);
        let ticket = session.highlight_requests.begin(&pane_key(&id, "right"));

        assert!(!session.close_tab(&id, false));
        assert!(session.highlight_requests.is_current(&ticket));
    }

    #[test]
    fn test_close_others_forgets_pending_highlights_of_discarded_tabs() {
        let mut session = echo_session();
        let keep = session
            .tabs
            .open_compare("a.rs", "b.rs", CompareMode::File, None, None);
        let gone = session
            .tabs
            .open_merge("base.rs", "ours.rs", "theirs.rs", None);
        let kept_ticket = session.highlight_requests.begin(&pane_key(&keep, "left"));
        let gone_ticket = session.highlight_requests.begin(&pane_key(&gone, "base"));

        session.tabs.close_others(&keep);

        assert!(session.highlight_requests.is_current(&kept_ticket));
        assert!(!session.highlight_requests.is_current(&gone_ticket));
    }

    #[test]
    fn test_close_all_forgets_every_pending_highlight() {
        let mut session = echo_session();
        let id = session
            .tabs
            .open_compare("a.rs", "b.rs", CompareMode::File, None, None);
        let ticket = session.highlight_requests.begin(&pane_key(&id, "left"));

        session.tabs.close_all();

        assert!(session.tabs.tab(&id).is_none());
        assert!(!session.highlight_requests.is_current(&ticket));
        assert!(session
            .highlight_requests
            .accept(&ticket, vec!["late".to_string()])
            .is_none());
    }

    #[test]
    fn test_open_creates_storage_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join(".diffvibe");
        let session = AppSession::open(StorageConfig::with_root(root.clone())).unwrap();

        assert!(root.join("logs").is_dir());
        assert_eq!(session.storage().unwrap().root(), root.as_path());
    }
}
