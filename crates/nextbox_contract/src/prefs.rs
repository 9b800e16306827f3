//! Small key/value preference storage used for plugin-local settings and timestamps.
//!
//! Values are stored as JSON text per key. Browser builds back this with `localStorage`, which is
//! synchronous, so the trait is synchronous as well.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Preference store keyed by string.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_raw(&self, key: &str) -> Option<String>;

    /// Stores raw JSON under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the write.
    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the delete.
    fn delete(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_raw(&self, _key: &str) -> Option<String> {
        None
    }

    fn save_raw(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store; clones share the same map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl PrefsStore for MemoryPrefsStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed value; malformed JSON is reported as an error.
///
/// # Errors
///
/// Returns an error when the stored text is not valid JSON for `T`.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key) else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| format!("pref `{key}` is malformed: {err}"))
}

/// Serializes and saves a typed value.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|err| err.to_string())?;
    store.save_raw(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_helpers_round_trip_through_memory_store() {
        let store = MemoryPrefsStore::default();
        save_pref_with(&store, "last-save", &1_700_000_000_000u64).expect("save");
        let loaded: Option<u64> = load_pref_with(&store, "last-save").expect("load");
        assert_eq!(loaded, Some(1_700_000_000_000));

        store.delete("last-save").expect("delete");
        let loaded: Option<u64> = load_pref_with(&store, "last-save").expect("load");
        assert_eq!(loaded, None);
    }

    #[test]
    fn malformed_value_names_the_key() {
        let store = MemoryPrefsStore::default();
        store.save_raw("cfg", "{not json").expect("save");
        let err = load_pref_with::<_, u64>(&store, "cfg").expect_err("malformed");
        assert!(err.contains("`cfg`"));
    }

    #[test]
    fn noop_store_is_always_empty() {
        let store: &dyn PrefsStore = &NoopPrefsStore;
        store.save_raw("k", "1").expect("save");
        assert_eq!(store.load_raw("k"), None);
    }
}
