//! Host service factory for browser builds.

use std::rc::Rc;

use nextbox_contract::{HostError, HostServices, HostState, HostStateCell};

use crate::{bridge, WebHostTransport, WebHttpTransport, WebPrefsStore, WebStorageApi};

/// Bundles the browser adapters around `state`.
pub fn build_host_services(state: HostStateCell) -> HostServices {
    HostServices {
        state,
        storage: Rc::new(WebStorageApi),
        http: Rc::new(WebHttpTransport),
        transport: Rc::new(WebHostTransport),
        prefs: Rc::new(WebPrefsStore),
    }
}

/// Waits for the host lifecycle `init` callback and returns the delivered state.
///
/// # Errors
///
/// Returns an error when the SDK is missing or the state payload cannot be decoded.
pub async fn wait_for_host_state() -> Result<HostState, HostError> {
    bridge::host_init().await
}

/// Returns the state the SDK currently holds, if `init` already fired.
pub fn current_host_state() -> Option<HostState> {
    bridge::host_state()
}

/// Waits for host `init` and builds services around the delivered state.
///
/// # Errors
///
/// See [`wait_for_host_state`].
pub async fn connect_host_services() -> Result<HostServices, HostError> {
    let state = wait_for_host_state().await?;
    Ok(build_host_services(HostStateCell::initialized(state)))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use nextbox_contract::PrefsStore;

    use super::*;

    #[test]
    fn built_services_share_the_given_state_cell() {
        let cell = HostStateCell::new();
        let services = build_host_services(cell.clone());
        assert!(!services.state.is_initialized());
        assert_eq!(services.prefs.load_raw("missing"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn connect_fails_without_sdk() {
        assert!(block_on(connect_host_services()).is_err());
        assert!(current_host_state().is_none());
    }
}
