//! Work-directory path normalization.

use nextbox_contract::{HostState, StorageRoot};

use crate::error::NextboxError;

/// Maps a storage path to the form the storage SDK expects for the current host state.
///
/// In work-directory mode the SDK addresses elements relative to the working directory, so the
/// root path is removed from `path` for owned roots, and for shared or divided roots unless the
/// root is `/`. Outside work-directory mode paths pass through unchanged.
///
/// # Errors
///
/// Returns [`NextboxError::Uninitialized`] when the host has not delivered its state.
pub fn normalize_path(path: &str, state: Option<&HostState>) -> Result<String, NextboxError> {
    let state = state.ok_or(NextboxError::Uninitialized)?;
    if !state.is_work_dir() {
        return Ok(path.to_string());
    }

    let root_path = state.storage.path.as_str();
    Ok(match state.storage.root {
        StorageRoot::My => path.replacen(root_path, "", 1),
        StorageRoot::Share | StorageRoot::Divide if root_path != "/" => {
            path.replacen(root_path, "", 1)
        }
        _ => path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use nextbox_contract::{ApiState, ExtensionState, ExtensionType, StorageState};

    use super::*;

    fn state(root: StorageRoot, path: &str, kind: ExtensionType) -> HostState {
        HostState {
            api: ApiState {
                host: "https://h".to_string(),
                prefix: String::new(),
                headers: Default::default(),
            },
            storage: StorageState {
                root,
                root_id: None,
                path: path.to_string(),
            },
            extension: ExtensionState { kind },
            view: None,
        }
    }

    #[test]
    fn owned_root_strips_root_path_in_work_dir_mode() {
        let host = state(StorageRoot::My, "/projects/demo", ExtensionType::WorkDir);
        for suffix in ["/data.json", "/nested/x.txt", ""] {
            let input = format!("/projects/demo{suffix}");
            assert_eq!(normalize_path(&input, Some(&host)).expect("normalize"), suffix);
        }
    }

    #[test]
    fn paths_pass_through_outside_work_dir_mode() {
        for kind in [ExtensionType::File, ExtensionType::Other] {
            let host = state(StorageRoot::My, "/projects/demo", kind);
            for input in ["/projects/demo/a.json", "/b", ""] {
                assert_eq!(normalize_path(input, Some(&host)).expect("normalize"), input);
            }
        }
    }

    #[test]
    fn shared_roots_keep_paths_under_slash_root() {
        let slash = state(StorageRoot::Share, "/", ExtensionType::WorkDir);
        assert_eq!(normalize_path("/a/b", Some(&slash)).expect("normalize"), "/a/b");

        let team = state(StorageRoot::Divide, "/team", ExtensionType::WorkDir);
        assert_eq!(normalize_path("/team/a", Some(&team)).expect("normalize"), "/a");

        let other = state(StorageRoot::Other, "/team", ExtensionType::WorkDir);
        assert_eq!(normalize_path("/team/a", Some(&other)).expect("normalize"), "/team/a");
    }

    #[test]
    fn missing_state_is_an_initialization_error() {
        assert_eq!(normalize_path("/a", None), Err(NextboxError::Uninitialized));
    }
}
