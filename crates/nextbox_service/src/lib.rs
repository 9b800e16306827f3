//! Storage adapter for the Nextbox plugin.
//!
//! [`NextboxService`] wraps the platform storage SDK and the raw REST endpoints the plugin calls
//! directly. Around every call it normalizes paths for work-directory mode, classifies failures
//! (403/404 are expected outcomes, everything else is surfaced), raises host toasts, and
//! maintains the [`SaveGate`] latch that stops mutating calls after an unexpected read failure.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod classify;
pub mod error;
pub mod normalize;
pub mod notifications;
pub mod options;
pub mod service;

pub use classify::{error_message, is_expected_status, should_surface, should_surface_error};
pub use error::NextboxError;
pub use normalize::normalize_path;
pub use notifications::{notification, notification_with_message, NotificationKey};
pub use options::{
    CreateNode, CreateNodeOptions, GetListOptions, NodeContent, ReadNodeOptions, UpdateNode,
    UpdateNodeOptions,
};
pub use service::{NextboxService, SaveGate};
