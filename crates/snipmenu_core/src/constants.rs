//! Shared constants used across snipmenu crates.

/// File name for the redb database within the configured store directory.
pub const STORE_FILE_NAME: &str = "store.redb";

/// Store key holding the user-defined template list (JSON array).
pub const KEY_TEMPLATES: &str = "templates";
/// Store key holding the remote template source URL (JSON string).
pub const KEY_REMOTE_SOURCE_URL: &str = "remote_source_url";

/// Identifier of the context-menu root entry.
pub const MENU_ROOT_ID: &str = "snipmenu-root";
/// Title of the context-menu root entry.
pub const MENU_ROOT_TITLE: &str = "Insert template";
/// Identifier prefix for template menu entries; the decimal index position
/// in the snapshot the menu was built from follows the prefix.
pub const MENU_ENTRY_PREFIX: &str = "snipmenu-entry-";
/// Label suffix marking remote-sourced (read-only) templates in the menu.
pub const LOCKED_LABEL_SUFFIX: &str = " (default)";

/// Window within which an identical insert payload counts as a duplicate
/// delivery from the message bridge.
pub const DUPLICATE_INSERT_WINDOW_MS: u64 = 500;
