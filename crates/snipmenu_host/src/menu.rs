//! Native menu synchronization.
//!
//! The native menu API lives in the embedding environment, behind the
//! [`MenuHost`] seam. A rebuild replaces the whole subtree; the API has no
//! transactional update, so observers can briefly see the menu root-less
//! between the removal and the re-adds.

use crate::backend::CoreEvent;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use snipmenu_core::constants::{
    LOCKED_LABEL_SUFFIX, MENU_ENTRY_PREFIX, MENU_ROOT_ID, MENU_ROOT_TITLE,
};
use snipmenu_core::error::AppError;
use snipmenu_core::index::TemplateIndex;
use tracing::warn;

/// A single native-menu mutation, mirrored by the embedding shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuOp {
    RemoveAll,
    AddRoot {
        id: String,
        title: String,
        /// The root is shown only when the click target is an editable
        /// surface.
        editable_only: bool,
    },
    AddEntry {
        id: String,
        parent_id: String,
        title: String,
    },
}

/// Seam over the environment's native menu API.
pub trait MenuHost {
    /// Remove every menu entry this system owns.
    fn remove_all(&mut self) -> Result<(), AppError>;
    /// Add the root entry, shown over editable click targets only.
    fn add_root(&mut self, id: &str, title: &str) -> Result<(), AppError>;
    /// Add one child entry under `parent_id`.
    fn add_entry(&mut self, id: &str, parent_id: &str, title: &str) -> Result<(), AppError>;
}

/// Identifier for the menu entry at `position` in the index snapshot.
pub fn entry_id(position: usize) -> String {
    format!("{}{}", MENU_ENTRY_PREFIX, position)
}

/// Parse an entry identifier back to its index position.
///
/// # Returns
/// `None` for foreign identifiers or non-decimal suffixes. Callers must
/// re-validate the position against the current cached index before use.
pub fn parse_entry_id(id: &str) -> Option<usize> {
    id.strip_prefix(MENU_ENTRY_PREFIX)?.parse().ok()
}

/// Replace the entire menu subtree from an index snapshot.
///
/// Removal is best-effort: a failed cleanup is logged and the rebuild
/// proceeds. Records missing a name or content are skipped with a warning,
/// but their positions still count toward entry identifiers, so identifier
/// `i` always resolves to position `i` of the snapshot the menu was built
/// from. Locked records are labeled with the default-marker suffix.
///
/// # Returns
/// The number of child entries added.
///
/// # Errors
/// Returns an error when adding the root or a child entry fails.
pub fn rebuild(host: &mut dyn MenuHost, index: &TemplateIndex) -> Result<usize, AppError> {
    if let Err(err) = host.remove_all() {
        warn!("menu cleanup failed, proceeding with rebuild: {}", err);
    }

    host.add_root(MENU_ROOT_ID, MENU_ROOT_TITLE)?;

    let mut added = 0;
    for (position, entry) in index.entries().iter().enumerate() {
        if !entry.template.is_menu_ready() {
            warn!(position, "skipping template with empty name or content");
            continue;
        }
        let mut title = entry.template.name.clone();
        if entry.locked {
            title.push_str(LOCKED_LABEL_SUFFIX);
        }
        host.add_entry(&entry_id(position), MENU_ROOT_ID, &title)?;
        added += 1;
    }
    Ok(added)
}

/// Menu host that forwards ops over the coordinator event channel, for
/// shells that mirror the menu on the far side of the bridge.
///
/// Delivery is at-most-once with no acknowledgement; ops sent after the
/// bridge has shut down are dropped.
pub struct ChannelMenuHost {
    tx: Sender<CoreEvent>,
}

impl ChannelMenuHost {
    pub fn new(tx: Sender<CoreEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, op: MenuOp) {
        let _ = self.tx.send(CoreEvent::Menu { op });
    }
}

impl MenuHost for ChannelMenuHost {
    fn remove_all(&mut self) -> Result<(), AppError> {
        self.forward(MenuOp::RemoveAll);
        Ok(())
    }

    fn add_root(&mut self, id: &str, title: &str) -> Result<(), AppError> {
        self.forward(MenuOp::AddRoot {
            id: id.to_string(),
            title: title.to_string(),
            editable_only: true,
        });
        Ok(())
    }

    fn add_entry(&mut self, id: &str, parent_id: &str, title: &str) -> Result<(), AppError> {
        self.forward(MenuOp::AddEntry {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
pub(crate) struct RecordingMenuHost {
    pub(crate) ops: Vec<MenuOp>,
    pub(crate) fail_remove_all: bool,
}

#[cfg(test)]
impl RecordingMenuHost {
    pub(crate) fn new() -> Self {
        Self {
            ops: Vec::new(),
            fail_remove_all: false,
        }
    }
}

#[cfg(test)]
impl MenuHost for RecordingMenuHost {
    fn remove_all(&mut self) -> Result<(), AppError> {
        if self.fail_remove_all {
            return Err(AppError::StorageMessage(
                "menu removal unavailable".to_string(),
            ));
        }
        self.ops.push(MenuOp::RemoveAll);
        Ok(())
    }

    fn add_root(&mut self, id: &str, title: &str) -> Result<(), AppError> {
        self.ops.push(MenuOp::AddRoot {
            id: id.to_string(),
            title: title.to_string(),
            editable_only: true,
        });
        Ok(())
    }

    fn add_entry(&mut self, id: &str, parent_id: &str, title: &str) -> Result<(), AppError> {
        self.ops.push(MenuOp::AddEntry {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }
}
