//! Browser (`wasm32`) implementations of the [`nextbox_contract`] service traits.
//!
//! The platform SDK is reached through the global `NextBoxSDK` object. Bridge bindings live
//! under `bridge/`:
//! - `bridge::interop` (wasm inline JS and the non-wasm shim)
//! - `bridge::payload` (SDK payload conversions)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host service factory and lifecycle helpers.
pub mod adapters;
mod bridge;
pub mod prefs;
pub mod storage;
pub mod transport;

pub use adapters::{
    build_host_services, connect_host_services, current_host_state, wait_for_host_state,
};
pub use prefs::WebPrefsStore;
pub use storage::{WebHttpTransport, WebStorageApi};
pub use transport::WebHostTransport;
