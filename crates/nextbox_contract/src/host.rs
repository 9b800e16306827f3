//! Host service bundle handed to the storage adapter and the UI.

use std::rc::Rc;

use crate::{
    HostStateCell, HostTransport, HttpTransport, MemoryHostTransport, MemoryHttpTransport,
    MemoryPrefsStore, MemoryStorageApi, PrefsStore, StorageApi,
};

/// Concrete services selected for the current build, erased behind the contract traits.
///
/// Browser builds assemble this in `nextbox_host_web`; tests use [`HostServices::memory`].
#[derive(Clone)]
pub struct HostServices {
    /// Host state slot filled by the lifecycle `init` callback.
    pub state: HostStateCell,
    /// Storage SDK.
    pub storage: Rc<dyn StorageApi>,
    /// Raw HTTP transport for endpoints outside the storage SDK.
    pub http: Rc<dyn HttpTransport>,
    /// Toasts, dirty flag, file picker, and lifecycle events.
    pub transport: Rc<dyn HostTransport>,
    /// Plugin-local preferences.
    pub prefs: Rc<dyn PrefsStore>,
}

/// Handles onto the in-memory adapters behind a [`HostServices::memory`] bundle.
#[derive(Clone, Default)]
pub struct MemoryHost {
    /// Storage tree.
    pub storage: MemoryStorageApi,
    /// Scripted HTTP routes.
    pub http: MemoryHttpTransport,
    /// Recorded transport calls.
    pub transport: MemoryHostTransport,
    /// Preference map.
    pub prefs: MemoryPrefsStore,
}

impl HostServices {
    /// Builds a bundle over in-memory adapters and returns handles to inspect them.
    pub fn memory(state: HostStateCell) -> (Self, MemoryHost) {
        let host = MemoryHost::default();
        let services = Self {
            state,
            storage: Rc::new(host.storage.clone()),
            http: Rc::new(host.http.clone()),
            transport: Rc::new(host.transport.clone()),
            prefs: Rc::new(host.prefs.clone()),
        };
        (services, host)
    }
}
