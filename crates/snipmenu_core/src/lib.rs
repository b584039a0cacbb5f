//! Core domain library for snipmenu (config, storage, merge/index, surfaces).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Template merge/index protocol.
pub mod index;
/// Data models for requests and persistence.
pub mod models;
/// Remote template source fetching.
pub mod remote;
/// Persistent key-value store.
pub mod store;
/// Editable surfaces and caret-aware insertion.
pub mod surface;

pub use config::Config;
pub use constants::*;
pub use error::AppError;
pub use index::TemplateIndex;
pub use remote::RemoteFetcher;
pub use store::Store;
