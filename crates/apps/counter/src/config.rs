//! Plugin configuration with optional overrides from the prefs store.

use leptos::logging;
use nextbox_contract::{join_storage_path, load_pref_with, FileSelectOptions, PrefsStore};
use serde::{Deserialize, Serialize};

/// Prefs key holding a JSON [`CounterConfig`] override.
pub const CONFIG_PREF_KEY: &str = "nextbox.counter.config.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Counter plugin settings.
pub struct CounterConfig {
    /// Node holding the counter. Relative paths resolve against the host storage path.
    pub target_path: String,
    /// Minimum time between autosaves.
    pub autosave_interval_ms: u64,
    /// Prefs key of the last-save timestamp.
    pub last_save_key: String,
    /// Allow picking several elements in the file picker.
    pub multi_select: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            target_path: "counter.json".to_string(),
            autosave_interval_ms: 5_000,
            last_save_key: "nextbox.counter.last-save.v1".to_string(),
            multi_select: false,
        }
    }
}

impl CounterConfig {
    /// Loads the override from `prefs`, falling back to defaults when absent or malformed.
    pub fn load(prefs: &dyn PrefsStore) -> Self {
        match load_pref_with::<dyn PrefsStore, Self>(prefs, CONFIG_PREF_KEY) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                logging::warn!("counter config ignored: {err}");
                Self::default()
            }
        }
    }

    /// Resolves the target node against the host storage path.
    pub fn resolve_target(&self, storage_path: &str) -> String {
        if self.target_path.starts_with('/') {
            self.target_path.clone()
        } else {
            join_storage_path(storage_path, &self.target_path)
        }
    }

    /// Options passed to the host file picker.
    pub fn file_select_options(&self) -> FileSelectOptions {
        FileSelectOptions {
            multiple: self.multi_select,
            ..FileSelectOptions::default()
        }
    }
}
