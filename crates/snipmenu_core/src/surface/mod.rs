//! Editable surfaces and the caret-aware insertion entry point.

/// Plain-text surfaces (linear value + numeric caret offsets).
pub mod plain;
/// Rich-text surfaces (structural nodes + selection range).
pub mod rich;

pub use plain::{PlainSurface, SurfaceEvent};
pub use rich::{Node, RichSurface, Selection};

/// A focused editable region, tagged by capability.
///
/// Kind dispatch happens once, when the host resolves what currently holds
/// focus: a region exposing a linear value with numeric caret offsets is
/// plain, a region flagged editable is rich. Anything else (locked fields,
/// non-text inputs) has no representation here and resolves to no target.
#[derive(Clone)]
pub enum Surface {
    Plain(PlainSurface),
    Rich(RichSurface),
}

/// Outcome of an insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The surface was mutated and the caret collapsed after the insert.
    Inserted,
    /// Nothing held focus; the operation was a no-op.
    NoTarget,
    /// A rich surface had no active selection range; no caret to anchor to.
    NoCaret,
}

/// Insert `text` into whatever surface currently has focus.
///
/// Both no-target and no-caret outcomes are normal, not exceptional.
pub fn insert(target: Option<&mut Surface>, text: &str) -> InsertOutcome {
    match target {
        None => InsertOutcome::NoTarget,
        Some(Surface::Plain(surface)) => {
            surface.insert_at_caret(text);
            InsertOutcome::Inserted
        }
        Some(Surface::Rich(surface)) => {
            if surface.insert_at_selection(text) {
                InsertOutcome::Inserted
            } else {
                InsertOutcome::NoCaret
            }
        }
    }
}
