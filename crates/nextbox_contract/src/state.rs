//! Host connection state delivered once by the platform lifecycle `init` callback.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Deserializer, Serialize};

use crate::transport::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Storage namespace the plugin currently operates in.
pub enum StorageRoot {
    /// Storage owned by the current user.
    My,
    /// Storage shared with the current user.
    Share,
    /// Divided (team) storage addressed by a root id.
    Divide,
    /// Root kind this plugin does not special-case.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Host operating mode for the extension.
pub enum ExtensionType {
    /// Paths are expressed relative to a sandboxed working directory.
    #[serde(alias = "workdir")]
    WorkDir,
    /// Extension opened against a single file.
    File,
    /// Any other host mode.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// API endpoint settings the plugin uses to compose raw requests.
pub struct ApiState {
    /// Scheme and authority, for example `https://cloud.example.org`.
    pub host: String,
    /// Path prefix appended to `host`, for example `/api`.
    #[serde(default)]
    pub prefix: String,
    /// Headers the host expects on every API request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ApiState {
    /// Builds an absolute URL for an API endpoint such as `/storage/element`.
    pub fn endpoint(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.host, self.prefix, endpoint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Storage location the extension was opened in.
pub struct StorageState {
    /// Storage root kind.
    pub root: StorageRoot,
    /// Divide id for [`StorageRoot::Divide`] roots.
    #[serde(rename = "rootID", default, deserialize_with = "root_id_from_number_or_text")]
    pub root_id: Option<u64>,
    /// Root path of the working directory.
    #[serde(default = "default_root_path")]
    pub path: String,
}

fn default_root_path() -> String {
    "/".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RootIdRepr {
    Number(u64),
    Text(String),
}

// The SDK sends `rootID` either as a number or as its decimal text.
fn root_id_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RootIdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RootIdRepr::Number(id)) => Ok(Some(id)),
        Some(RootIdRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RootIdRepr::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid rootID `{text}`"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Extension descriptor.
pub struct ExtensionState {
    /// Extension operating mode.
    #[serde(rename = "type")]
    pub kind: ExtensionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Read-only snapshot of the host configuration.
pub struct HostState {
    /// API endpoint settings.
    pub api: ApiState,
    /// Storage location.
    pub storage: StorageState,
    /// Extension descriptor (the SDK spells the field `extenstion`).
    #[serde(rename = "extension", alias = "extenstion")]
    pub extension: ExtensionState,
    /// Document mode the host opened the extension in, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewMode>,
}

impl HostState {
    /// Returns `true` when the host runs the extension in work-directory mode.
    pub fn is_work_dir(&self) -> bool {
        self.extension.kind == ExtensionType::WorkDir
    }

    /// Returns the divide id when the storage root is a divided root.
    pub fn divide_id(&self) -> Option<u64> {
        match self.storage.root {
            StorageRoot::Divide => self.storage.root_id,
            _ => None,
        }
    }
}

/// Shared slot for the host state.
///
/// Empty until the lifecycle `init` callback fires; the plugin never writes it afterwards.
#[derive(Debug, Clone, Default)]
pub struct HostStateCell {
    inner: Rc<RefCell<Option<HostState>>>,
}

impl HostStateCell {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell that already holds `state`.
    pub fn initialized(state: HostState) -> Self {
        let cell = Self::new();
        cell.set(state);
        cell
    }

    /// Stores the state delivered by the host.
    pub fn set(&self, state: HostState) {
        *self.inner.borrow_mut() = Some(state);
    }

    /// Returns a copy of the current state, if any.
    pub fn get(&self) -> Option<HostState> {
        self.inner.borrow().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&HostState>) -> R) -> R {
        f(self.inner.borrow().as_ref())
    }

    /// Returns `true` once the host delivered its state.
    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn host_state_parses_sdk_payload() {
        let state: HostState = serde_json::from_value(json!({
            "api": {
                "host": "https://cloud.example.org",
                "prefix": "/api",
                "headers": { "Authorization": "Bearer t" }
            },
            "storage": { "root": "divide", "rootID": 42, "path": "/team/docs" },
            "extenstion": { "type": "work_dir" }
        }))
        .expect("parse host state");

        assert_eq!(state.storage.root, StorageRoot::Divide);
        assert_eq!(state.divide_id(), Some(42));
        assert!(state.is_work_dir());
        assert_eq!(
            state.api.endpoint("/storage/element"),
            "https://cloud.example.org/api/storage/element"
        );
    }

    #[test]
    fn unknown_root_and_mode_fall_back_to_other() {
        let state: HostState = serde_json::from_value(json!({
            "api": { "host": "h" },
            "storage": { "root": "trash" },
            "extension": { "type": "viewer" }
        }))
        .expect("parse host state");

        assert_eq!(state.storage.root, StorageRoot::Other);
        assert_eq!(state.storage.path, "/");
        assert_eq!(state.extension.kind, ExtensionType::Other);
        assert_eq!(state.divide_id(), None);
        assert_eq!(state.view, None);
    }

    #[test]
    fn root_id_accepts_numeric_text_and_initial_view() {
        let state: HostState = serde_json::from_value(json!({
            "api": { "host": "h" },
            "storage": { "root": "divide", "rootID": "42", "path": "/team" },
            "extension": { "type": "work_dir" },
            "view": "edit"
        }))
        .expect("parse host state");

        assert_eq!(state.divide_id(), Some(42));
        assert_eq!(state.view, Some(ViewMode::Edit));

        let missing: StorageState =
            serde_json::from_value(json!({ "root": "divide", "rootID": null }))
                .expect("parse storage state");
        assert_eq!(missing.root_id, None);

        assert!(serde_json::from_value::<StorageState>(
            json!({ "root": "divide", "rootID": "team" })
        )
        .is_err());
    }

    #[test]
    fn state_cell_is_shared_between_clones() {
        let cell = HostStateCell::new();
        let observer = cell.clone();
        assert!(!observer.is_initialized());

        cell.set(
            serde_json::from_value(json!({
                "api": { "host": "h" },
                "storage": { "root": "my", "path": "/home" },
                "extension": { "type": "file" }
            }))
            .expect("parse host state"),
        );

        assert!(observer.is_initialized());
        assert_eq!(
            observer.with(|state| state.map(|s| s.storage.path.clone())),
            Some("/home".to_string())
        );
    }
}
