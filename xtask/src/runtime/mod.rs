//! Shared automation runtime services.

pub mod artifacts;
pub mod context;
pub mod error;
pub mod process;
