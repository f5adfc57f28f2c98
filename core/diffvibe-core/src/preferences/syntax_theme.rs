//! Code highlighting theme, forwarded to the highlighter when attached.

use std::sync::Arc;

use super::{read_string, write_string, SystemAppearance};
use crate::highlight::Highlighter;
use crate::kv::SharedKeyValueStore;

pub const STORAGE_KEY: &str = "diffvibe-syntax-theme";
pub const DEFAULT_DARK_SYNTAX_THEME: &str = "github-dark";
pub const DEFAULT_LIGHT_SYNTAX_THEME: &str = "github-light";

pub struct SyntaxThemeStore {
    theme: String,
    storage: SharedKeyValueStore,
    highlighter: Option<Arc<Highlighter>>,
    initialized: bool,
}

impl SyntaxThemeStore {
    pub fn new(storage: SharedKeyValueStore) -> Self {
        Self {
            theme: DEFAULT_DARK_SYNTAX_THEME.to_string(),
            storage,
            highlighter: None,
            initialized: false,
        }
    }

    /// Pushes every theme change to `highlighter`.
    pub fn with_highlighter(mut self, highlighter: Arc<Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn value(&self) -> &str {
        &self.theme
    }

    pub fn init(&mut self, system: SystemAppearance) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.theme = read_string(&self.storage, STORAGE_KEY)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                if system.prefers_light() {
                    DEFAULT_LIGHT_SYNTAX_THEME.to_string()
                } else {
                    DEFAULT_DARK_SYNTAX_THEME.to_string()
                }
            });
        self.apply();
    }

    pub fn set(&mut self, theme: &str) {
        self.theme = theme.to_string();
        write_string(&self.storage, STORAGE_KEY, theme);
        self.apply();
    }

    fn apply(&self) {
        if let Some(highlighter) = &self.highlighter {
            highlighter.set_theme(&self.theme);
        }
    }
}
