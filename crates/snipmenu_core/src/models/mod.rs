//! Data models shared across snipmenu crates.

/// Template records and request payloads.
pub mod template;
