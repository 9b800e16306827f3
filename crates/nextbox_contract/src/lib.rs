//! Typed contracts for the Nextbox host platform as consumed by the plugin.
//!
//! The platform injects its SDK when the plugin boots. This crate models the pieces the plugin
//! depends on (host state, storage elements, raw HTTP responses, lifecycle events) and the
//! object-safe service traits implemented by the browser bindings in `nextbox_host_web`.
//! In-memory adapters live next to each trait so the storage adapter and UI can be exercised
//! without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod connections;
pub mod host;
pub mod http;
pub mod path;
pub mod prefs;
pub mod state;
pub mod storage;
pub mod time;
pub mod transport;

pub use connections::Connection;
pub use host::{HostServices, MemoryHost};
pub use http::{
    HostError, HttpFuture, HttpMethod, HttpRequest, HttpTransport, MemoryHttpTransport,
    NoopHttpTransport, RawResponse,
};
pub use path::{collapse_separators, join_storage_path, parent_storage_path};
pub use prefs::{load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore};
pub use state::{
    ApiState, ExtensionState, ExtensionType, HostState, HostStateCell, StorageRoot, StorageState,
};
pub use storage::memory::{MemoryStorageApi, StorageOp};
pub use storage::service::{NoopStorageApi, StorageApi, StorageFuture};
pub use storage::types::{
    ListPage, ListParams, OrderDirection, ResponseItem, StorageElement, StorageElementType,
};
pub use time::unix_time_ms_now;
pub use transport::{
    FileSelectOptions, HostEvent, HostEventHandler, HostEventKind, HostTransport,
    MemoryHostTransport, NoopHostTransport, SelectedFile, Subscription, ToastPayload,
    ToastSeverity, ViewMode,
};
