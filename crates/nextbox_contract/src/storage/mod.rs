//! Storage SDK contract: element models, the `StorageApi` trait, and adapters.

pub mod memory;
pub mod service;
pub mod types;
