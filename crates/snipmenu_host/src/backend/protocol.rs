//! Protocol types for the coordinator worker.
//!
//! Both enums cross the stdio bridge as JSON lines, so they derive serde with
//! an explicit tag; the in-process channel and the wire share one shape.

use crate::menu::MenuOp;
use serde::{Deserialize, Serialize};
use snipmenu_core::index::IndexEntry;
use snipmenu_core::models::template::Template;

/// Commands issued to the coordinator worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreCmd {
    /// Recompute the template index (user list + fresh remote fetch) and
    /// rebuild the native menu.
    ReloadMenu,
    /// Resolve a clicked menu entry against the current cached index.
    MenuClicked { entry_id: String },
    /// Fetch a snapshot of the merged template index.
    ListTemplates,
    /// Create a user-defined template.
    CreateTemplate { name: String, content: String },
    /// Persist changes to a user-defined template.
    UpdateTemplate {
        id: String,
        name: Option<String>,
        content: Option<String>,
    },
    /// Delete a user-defined template by id.
    DeleteTemplate { id: String },
    /// Persist a new remote source URL (empty clears it).
    SetRemoteSource { url: String },
    /// Validating fetch of a candidate remote source URL; failures are
    /// surfaced, not degraded.
    ValidateRemoteSource { url: String },
}

/// Which coordinator path an error event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreErrorSource {
    Save,
    Remote,
    Menu,
    Other,
}

/// Events produced by the coordinator worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreEvent {
    /// A native-menu mutation to mirror into the embedding environment.
    Menu { op: MenuOp },
    /// The menu was rebuilt from a fresh index snapshot.
    MenuRebuilt { entries: Vec<TemplateSummary> },
    /// Deliver resolved template text toward the focused surface.
    InsertText { text: String },
    /// Response containing the merged index snapshot.
    TemplateList { entries: Vec<TemplateSummary> },
    /// Response confirming a template was created or updated.
    TemplateSaved { template: Template },
    /// Response confirming a template was deleted.
    TemplateDeleted { id: String },
    /// The requested template id is not in the user-defined list.
    TemplateMissing { id: String },
    /// Response confirming the remote source URL was persisted.
    RemoteSourceSaved { url: String },
    /// A validating fetch succeeded with this many records.
    RemoteSourceValidated { url: String, count: usize },
    /// A coordinator operation failed.
    Error {
        source: CoreErrorSource,
        message: String,
    },
}

/// Lightweight summary used for list rendering and menu snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Position in the merged index the menu identifiers embed.
    pub position: usize,
    pub id: String,
    pub name: String,
    pub content_len: usize,
    pub locked: bool,
}

impl TemplateSummary {
    /// Build a summary from a merged index entry.
    ///
    /// # Returns
    /// A list-row payload for UI rendering.
    pub fn from_entry(position: usize, entry: &IndexEntry) -> Self {
        Self {
            position,
            id: entry.template.id.clone(),
            name: entry.template.name.clone(),
            content_len: entry.template.content.len(),
            locked: entry.locked,
        }
    }
}
