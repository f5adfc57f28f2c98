//! Light/dark application theme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_string, write_string, SystemAppearance};
use crate::kv::SharedKeyValueStore;

pub const STORAGE_KEY: &str = "diffvibe-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Value for the root element's `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn for_appearance(appearance: SystemAppearance) -> Self {
        if appearance.prefers_light() {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

pub struct ThemeStore {
    theme: Theme,
    storage: SharedKeyValueStore,
    initialized: bool,
}

impl ThemeStore {
    pub fn new(storage: SharedKeyValueStore) -> Self {
        Self {
            theme: Theme::Dark,
            storage,
            initialized: false,
        }
    }

    pub fn value(&self) -> Theme {
        self.theme
    }

    /// Reads the stored theme once, falling back to the system appearance.
    pub fn init(&mut self, system: SystemAppearance) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.theme = self
            .stored()
            .unwrap_or_else(|| Theme::for_appearance(system));
        debug!(theme = %self.theme, "Theme initialized");
    }

    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set(next);
        next
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        write_string(&self.storage, STORAGE_KEY, theme.as_str());
    }

    /// Follows a system appearance change unless the user picked a theme explicitly.
    pub fn on_system_change(&mut self, system: SystemAppearance) {
        if self.stored().is_none() {
            self.theme = Theme::for_appearance(system);
        }
    }

    fn stored(&self) -> Option<Theme> {
        read_string(&self.storage, STORAGE_KEY).and_then(|value| value.parse().ok())
    }
}
