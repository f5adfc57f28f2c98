//! The tab/session state machine.
//!
//! State is `(tabs, active_tab_id, home_state)`. Every operation is total:
//! unknown ids are silent no-ops, and policy refusals (closing the last tab,
//! closing a dirty tab without `force`) return `false` instead of erroring.
//!
//! # Invariants
//!
//! - `tabs` is never empty and `active_tab_id` always names a tab in it.
//! - At most one compare/directory tab per `(kind, left, right)` and one merge
//!   tab per `(base, left, right)`; opening a duplicate re-activates it.
//! - The home tab's id is always [`HOME_TAB_ID`]; other ids are fresh ULIDs.

use tracing::{debug, warn};
use ulid::Ulid;

use super::types::{
    file_name, CompareMode, DirectoryState, DirectoryStatePatch, HomeState, HomeStatePatch,
    ScanResult, Tab, TabKind, HOME_TAB_ID,
};
use crate::recent::{NewRecentComparison, RecentStore};

/// Change notification delivered to subscribers after the state has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    Opened { id: String },
    Activated { id: String },
    Closed { id: String },
    DirtyChanged { id: String, dirty: bool },
    ScanChanged { id: String },
    DirectoryStateChanged { id: String },
    /// All tabs were discarded and the home tab recreated.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&TabEvent) + Send>;

pub struct TabStore {
    tabs: Vec<Tab>,
    active_tab_id: String,
    home_state: HomeState,
    recent: RecentStore,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TabStore {
    pub fn new(recent: RecentStore) -> Self {
        Self {
            tabs: vec![Tab::home()],
            active_tab_id: HOME_TAB_ID.to_string(),
            home_state: HomeState::default(),
            recent,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn active_tab(&self) -> &Tab {
        self.tab(&self.active_tab_id).unwrap_or(&self.tabs[0])
    }

    pub fn home_state(&self) -> &HomeState {
        &self.home_state
    }

    pub fn set_home_state(&mut self, patch: HomeStatePatch) {
        self.home_state.apply(patch);
    }

    pub fn recent(&self) -> &RecentStore {
        &self.recent
    }

    pub fn recent_mut(&mut self) -> &mut RecentStore {
        &mut self.recent
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Opening
    // ─────────────────────────────────────────────────────────────────────────────

    /// Opens (or re-activates) a file or directory comparison and returns its id.
    ///
    /// New top-level comparisons are recorded in the recent list. Comparisons
    /// drilled into from a directory tab (`parent_tab_id` set) are not.
    pub fn open_compare(
        &mut self,
        left: &str,
        right: &str,
        mode: CompareMode,
        base: Option<&str>,
        parent_tab_id: Option<&str>,
    ) -> String {
        let kind = if mode == CompareMode::Directory {
            TabKind::Directory
        } else {
            TabKind::Compare
        };

        let existing = self
            .tabs
            .iter()
            .find(|t| {
                t.kind == kind
                    && t.left_path.as_deref() == Some(left)
                    && t.right_path.as_deref() == Some(right)
            })
            .map(|t| t.id.clone());
        if let Some(id) = existing {
            debug!(tab_id = %id, "Re-activating existing comparison tab");
            self.activate(&id);
            return id;
        }

        let id = self.generate_id();
        let title = format!("{} ↔ {}", file_name(left), file_name(right));
        self.tabs.push(Tab {
            id: id.clone(),
            kind,
            title,
            left_path: Some(left.to_string()),
            right_path: Some(right.to_string()),
            base_path: base.map(str::to_string),
            output_path: None,
            mode: Some(mode),
            dirty: false,
            parent_tab_id: parent_tab_id.map(str::to_string),
            scan_result: None,
            dir_state: None,
        });
        debug!(tab_id = %id, %mode, left, right, "Opened comparison tab");
        self.emit(TabEvent::Opened { id: id.clone() });
        self.activate(&id);

        if parent_tab_id.is_none() {
            self.record_recent(
                NewRecentComparison::new(left, right, mode).with_base(base.map(str::to_string)),
            );
        }

        id
    }

    /// Opens (or re-activates) a three-way merge and returns its id.
    pub fn open_merge(
        &mut self,
        base: &str,
        local: &str,
        remote: &str,
        output_path: Option<&str>,
    ) -> String {
        let existing = self
            .tabs
            .iter()
            .find(|t| {
                t.kind == TabKind::Merge
                    && t.base_path.as_deref() == Some(base)
                    && t.left_path.as_deref() == Some(local)
                    && t.right_path.as_deref() == Some(remote)
            })
            .map(|t| t.id.clone());
        if let Some(id) = existing {
            debug!(tab_id = %id, "Re-activating existing merge tab");
            self.activate(&id);
            return id;
        }

        let id = self.generate_id();
        self.tabs.push(Tab {
            id: id.clone(),
            kind: TabKind::Merge,
            title: format!("Merge: {}", file_name(base)),
            left_path: Some(local.to_string()),
            right_path: Some(remote.to_string()),
            base_path: Some(base.to_string()),
            output_path: output_path.map(str::to_string),
            mode: Some(CompareMode::Merge),
            dirty: false,
            parent_tab_id: None,
            scan_result: None,
            dir_state: None,
        });
        debug!(tab_id = %id, base, local, remote, "Opened merge tab");
        self.emit(TabEvent::Opened { id: id.clone() });
        self.activate(&id);

        self.record_recent(
            NewRecentComparison::new(local, remote, CompareMode::Merge)
                .with_base(Some(base.to_string())),
        );

        id
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Activation & Flags
    // ─────────────────────────────────────────────────────────────────────────────

    /// Activates `id` if it exists; otherwise does nothing.
    pub fn set_active(&mut self, id: &str) {
        if self.tab(id).is_some() {
            self.activate(id);
        }
    }

    pub fn set_dirty(&mut self, id: &str, dirty: bool) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if tab.dirty == dirty {
            return;
        }
        tab.dirty = dirty;
        self.emit(TabEvent::DirtyChanged {
            id: id.to_string(),
            dirty,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Id of the directory tab `id` was drilled into from.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.tab(id).and_then(|t| t.parent_tab_id.as_deref())
    }

    pub fn children_of(&self, id: &str) -> Vec<&Tab> {
        self.tabs
            .iter()
            .filter(|t| t.parent_tab_id.as_deref() == Some(id))
            .collect()
    }

    /// Activates the parent of `id`. False if there is none or it was closed.
    pub fn activate_parent(&mut self, id: &str) -> bool {
        let Some(parent) = self.parent_of(id).map(str::to_string) else {
            return false;
        };
        if self.tab(&parent).is_none() {
            return false;
        }
        self.activate(&parent);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Closing
    // ─────────────────────────────────────────────────────────────────────────────

    /// Closes `id`. Returns false if the close was refused or the tab is unknown.
    ///
    /// Refuses to close the only remaining tab, and refuses a dirty tab unless
    /// `force` is set; callers confirm with the user and retry with `force`.
    pub fn close(&mut self, id: &str, force: bool) -> bool {
        if self.tabs.len() == 1 {
            return false;
        }

        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };

        if !force && self.tabs[idx].dirty {
            debug!(tab_id = %id, "Close blocked by unsaved changes");
            return false;
        }

        self.tabs.remove(idx);
        debug!(tab_id = %id, remaining = self.tabs.len(), "Closed tab");
        self.emit(TabEvent::Closed { id: id.to_string() });

        if self.active_tab_id == id {
            // Prefer the tab that slid into the vacated slot
            let next = idx.min(self.tabs.len() - 1);
            let next_id = self.tabs[next].id.clone();
            self.activate(&next_id);
        }

        true
    }

    pub fn force_close(&mut self, id: &str) -> bool {
        self.close(id, true)
    }

    /// Keeps only `id`, discarding every other tab without checking dirtiness.
    pub fn close_others(&mut self, id: &str) {
        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return;
        };

        let keep = self.tabs.swap_remove(idx);
        let discarded = std::mem::replace(&mut self.tabs, vec![keep]);
        debug!(tab_id = %id, discarded = discarded.len(), "Closed other tabs");
        for tab in &discarded {
            self.emit(TabEvent::Closed { id: tab.id.clone() });
        }
        self.activate(id);
    }

    /// Discards every tab and cache, leaving only a fresh home tab.
    pub fn close_all(&mut self) {
        self.tabs = vec![Tab::home()];
        self.active_tab_id = HOME_TAB_ID.to_string();
        debug!("Closed all tabs");
        self.emit(TabEvent::Reset);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Per-tab Caches
    // ─────────────────────────────────────────────────────────────────────────────

    /// Replaces the cached directory scan for `id`; `None` drops it.
    pub fn set_scan_result(&mut self, id: &str, result: Option<ScanResult>) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return;
        };
        tab.scan_result = result;
        self.emit(TabEvent::ScanChanged { id: id.to_string() });
    }

    pub fn scan_result(&self, id: &str) -> Option<&ScanResult> {
        self.tab(id).and_then(|t| t.scan_result.as_ref())
    }

    pub fn set_directory_state(&mut self, id: &str, patch: DirectoryStatePatch) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return;
        };
        tab.dir_state.get_or_insert_with(DirectoryState::default).apply(patch);
        self.emit(TabEvent::DirectoryStateChanged { id: id.to_string() });
    }

    /// Directory view state for `id`, or the default if none was stored.
    pub fn directory_state(&self, id: &str) -> DirectoryState {
        self.tab(id)
            .and_then(|t| t.dir_state.clone())
            .unwrap_or_default()
    }

    /// Expands or collapses a directory row. Returns whether it is now expanded.
    pub fn toggle_directory_row(&mut self, id: &str, rel_path: &str) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        let expanded = tab
            .dir_state
            .get_or_insert_with(DirectoryState::default)
            .toggle_expanded(rel_path);
        self.emit(TabEvent::DirectoryStateChanged { id: id.to_string() });
        expanded
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&TabEvent) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────────

    fn activate(&mut self, id: &str) {
        self.active_tab_id = id.to_string();
        self.emit(TabEvent::Activated { id: id.to_string() });
    }

    fn emit(&self, event: TabEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    fn generate_id(&self) -> String {
        loop {
            let id = format!("tab-{}", Ulid::new().to_string().to_lowercase());
            if self.tab(&id).is_none() {
                return id;
            }
        }
    }

    fn record_recent(&mut self, comparison: NewRecentComparison) {
        if let Err(err) = self.recent.add(comparison) {
            warn!(error = %err, "Failed to persist recent comparison");
        }
    }
}
