//! UI preference stores persisted in "local storage".
//!
//! Each preference is a single string key in a shared [`KeyValueStore`](crate::kv::KeyValueStore),
//! read once at init and written on every explicit change. Storage failures are
//! logged and never block the in-memory change.

mod syntax_theme;
mod theme;

pub use syntax_theme::{SyntaxThemeStore, DEFAULT_DARK_SYNTAX_THEME, DEFAULT_LIGHT_SYNTAX_THEME};
pub use theme::{Theme, ThemeStore};

use serde_json::Value;
use tracing::warn;

use crate::kv::SharedKeyValueStore;

/// Color scheme the operating system currently prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemAppearance {
    Light,
    #[default]
    Dark,
}

impl SystemAppearance {
    pub fn prefers_light(self) -> bool {
        self == SystemAppearance::Light
    }
}

fn read_string(storage: &SharedKeyValueStore, key: &str) -> Option<String> {
    let mut guard = storage
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.get(key) {
        Ok(Some(Value::String(value))) => Some(value),
        Ok(_) => None,
        Err(err) => {
            warn!(key, error = %err, "Failed to read preference");
            None
        }
    }
}

fn write_string(storage: &SharedKeyValueStore, key: &str, value: &str) {
    let mut guard = storage
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Err(err) = guard.set(key, Value::String(value.to_string())) {
        warn!(key, error = %err, "Failed to persist preference");
    }
}
