//! Template merge/index protocol.
//!
//! The index is derived state: rebuilt from the user-defined list and the
//! latest remote fetch on every reload trigger, never persisted. Positions in
//! the merged order are what menu entry identifiers embed, so a snapshot must
//! stay untouched for as long as a menu built from it is live.

use crate::models::template::Template;
use std::collections::HashSet;

/// A merged index position: the record plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub template: Template,
    /// Remote-sourced records are read-only in editing UIs.
    pub locked: bool,
}

/// Ordered, de-duplicated view over user-defined and remote-fetched records.
#[derive(Debug, Clone, Default)]
pub struct TemplateIndex {
    entries: Vec<IndexEntry>,
}

impl TemplateIndex {
    /// Merge remote and user records into one ordered index.
    ///
    /// Remote records come first in fetch order, de-duplicated by id with the
    /// first occurrence kept in place. User records follow in storage order,
    /// skipping ids already claimed by the remote set. A record with an empty
    /// id is treated as unknown; it is always kept and is never locked.
    ///
    /// Inputs are not mutated; the result is a fresh sequence. Malformed
    /// individual records (empty name or content) are tolerated here and
    /// rejected only at menu-build time.
    pub fn build(user: &[Template], remote: &[Template]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries = Vec::with_capacity(remote.len() + user.len());

        for template in remote {
            if !template.id.is_empty() && !seen.insert(template.id.as_str()) {
                continue;
            }
            entries.push(IndexEntry {
                template: template.clone(),
                locked: !template.id.is_empty(),
            });
        }

        for template in user {
            if !template.id.is_empty() && seen.contains(template.id.as_str()) {
                continue;
            }
            entries.push(IndexEntry {
                template: template.clone(),
                locked: false,
            });
        }

        Self { entries }
    }

    /// The merged entries in index order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// The entry at `position`, when in range.
    pub fn get(&self, position: usize) -> Option<&IndexEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` names a remote-sourced record in this snapshot.
    ///
    /// Always `false` for an empty id, which cannot be locked.
    pub fn is_locked(&self, id: &str) -> bool {
        !id.is_empty()
            && self
                .entries
                .iter()
                .any(|entry| entry.locked && entry.template.id == id)
    }
}
