//! # diffvibe-core
//!
//! Session layer for DiffVibe, shared by every client (Tauri shell, CLI).
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with async if needed.
//! - **Not thread-safe**: Stores take `&mut self`; clients provide their own synchronization.
//! - **Graceful degradation**: Persistence and highlighting failures are logged and
//!   fall back to safe defaults instead of failing a UI action.
//! - **Explicit instances**: No hidden globals. [`AppSession`] wires the stores together
//!   and tests construct fresh instances.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use diffvibe_core::{AppSession, CompareMode, StorageConfig, SystemAppearance};
//!
//! let mut session = AppSession::open(StorageConfig::from_env())?;
//! session.init(SystemAppearance::Dark);
//! let id = session.tabs.open_compare("a.txt", "b.txt", CompareMode::File, None, None);
//! ```

pub mod error;
pub mod highlight;
pub mod history;
pub mod kv;
pub mod preferences;
pub mod recent;
pub mod session;
pub mod storage;
pub mod tabs;

pub use error::{DiffVibeError, Result};
pub use highlight::{
    detect_language, escape_html, HighlightRequests, Highlighter, Language, RequestTicket,
    SyntectTokenizer, Tokenizer,
};
pub use history::History;
pub use kv::{get_json, set_json, JsonFileStore, KeyValueStore, MemoryStore, SharedKeyValueStore};
pub use preferences::{SyntaxThemeStore, SystemAppearance, Theme, ThemeStore};
pub use recent::{NewRecentComparison, RecentComparison, RecentStore, MAX_RECENT};
pub use session::{pane_key, AppSession, PANES};
pub use storage::StorageConfig;
pub use tabs::{
    CompareMode, DirectoryState, DirectoryStatePatch, FileStatus, HomeState, HomeStatePatch,
    ScanResult, StatusFilter, SubscriptionId, Tab, TabEvent, TabKind, TabStore, HOME_TAB_ID,
};
