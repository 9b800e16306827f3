//! Autosave throttle keyed by a persisted last-save timestamp.

use std::rc::Rc;

use leptos::logging;
use nextbox_contract::{load_pref_with, save_pref_with, PrefsStore};

/// Returns `true` when `interval_ms` has passed since `last_save_ms`, or nothing was saved yet.
pub fn should_save(now_ms: u64, last_save_ms: Option<u64>, interval_ms: u64) -> bool {
    match last_save_ms {
        Some(last) => now_ms.saturating_sub(last) >= interval_ms,
        None => true,
    }
}

/// Throttle whose timestamp lives in the prefs store, so it survives reloads.
#[derive(Clone)]
pub struct AutosaveThrottle {
    prefs: Rc<dyn PrefsStore>,
    key: String,
    interval_ms: u64,
}

impl AutosaveThrottle {
    /// Creates a throttle storing its timestamp under `key`.
    pub fn new(prefs: Rc<dyn PrefsStore>, key: impl Into<String>, interval_ms: u64) -> Self {
        Self {
            prefs,
            key: key.into(),
            interval_ms,
        }
    }

    /// Last recorded save, if any. A malformed value counts as no save.
    pub fn last_save(&self) -> Option<u64> {
        load_pref_with::<dyn PrefsStore, u64>(self.prefs.as_ref(), &self.key).unwrap_or_else(
            |err| {
                logging::warn!("autosave timestamp ignored: {err}");
                None
            },
        )
    }

    /// Stores `now_ms` as the last save.
    pub fn record(&self, now_ms: u64) {
        if let Err(err) = save_pref_with(self.prefs.as_ref(), &self.key, &now_ms) {
            logging::warn!("autosave timestamp not stored: {err}");
        }
    }

    /// Records `now_ms` and returns `true` when an autosave is due.
    pub fn try_begin(&self, now_ms: u64) -> bool {
        if !should_save(now_ms, self.last_save(), self.interval_ms) {
            return false;
        }
        self.record(now_ms);
        true
    }
}
