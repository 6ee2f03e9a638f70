//! # UI Preferences
//!
//! User-facing toggles that change how components react to input. Held in a
//! `Store` so components re-render when a toggle flips at runtime.

use crate::core::config::ResolvedConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPreferences {
    /// Double-clicking a conversation title starts renaming it.
    pub double_click_to_edit: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            double_click_to_edit: true,
        }
    }
}

impl UiPreferences {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            double_click_to_edit: config.double_click_to_edit,
        }
    }

    pub fn toggle_double_click_to_edit(&mut self) {
        self.double_click_to_edit = !self.double_click_to_edit;
    }
}
