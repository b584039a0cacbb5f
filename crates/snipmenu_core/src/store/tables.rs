//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Persisted extension state, keyed by setting name. Values are the external
/// persistence contract: JSON text (a record array under the templates key, a
/// URL string under the remote source key).
pub const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");
