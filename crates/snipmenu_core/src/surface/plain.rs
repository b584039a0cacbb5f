//! Plain-text surface: a linear value with numeric caret offsets.

use ropey::Rope;

/// Notification synthesized after a programmatic edit.
///
/// Direct value mutation does not notify listeners on this surface kind, so
/// every mutation queues one of these; hosts drain the queue and feed it to
/// whatever change-observation mechanism their environment uses, making
/// programmatic edits observable exactly like user-typed ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    InputChanged,
}

/// An input/textarea-like surface: a linear string value and a caret range
/// `[start, end]` expressed in characters.
#[derive(Clone, Default)]
pub struct PlainSurface {
    value: Rope,
    selection_start: usize,
    selection_end: usize,
    revision: u64,
    pending_events: Vec<SurfaceEvent>,
}

impl PlainSurface {
    /// Create a surface with the caret collapsed at the end of `value`.
    pub fn new(value: &str) -> Self {
        let rope = Rope::from_str(value);
        let end = rope.len_chars();
        Self {
            value: rope,
            selection_start: end,
            selection_end: end,
            revision: 0,
            pending_events: Vec::new(),
        }
    }

    /// Create a surface with an explicit caret range (clamped to the value).
    pub fn with_selection(value: &str, start: usize, end: usize) -> Self {
        let mut surface = Self::new(value);
        surface.set_selection(start, end);
        surface
    }

    /// Returns a UTF-8 snapshot of the whole value.
    pub fn value(&self) -> String {
        self.value.to_string()
    }

    /// Returns the value length in characters.
    pub fn len_chars(&self) -> usize {
        self.value.len_chars()
    }

    /// Returns the caret range `(start, end)`.
    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Move the caret range, clamping each offset to the value length.
    ///
    /// An inverted range (`start > end`) is kept as given; insertion treats
    /// it as a collapsed caret at `start`.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.value.len_chars();
        self.selection_start = start.min(len);
        self.selection_end = end.min(len);
    }

    /// Returns the current revision of the value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drain the queued change notifications.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Insert `text` over the current caret range.
    ///
    /// The new value is `value[..start] + text + value[end..]` and the caret
    /// collapses to `start + chars(text)`. An inverted range deletes nothing
    /// and inserts at `start`.
    pub fn insert_at_caret(&mut self, text: &str) {
        let len = self.value.len_chars();
        let start = self.selection_start.min(len);
        let end = self.selection_end.min(len);

        if start < end {
            self.value.remove(start..end);
        }
        self.value.insert(start, text);

        let caret = start + text.chars().count();
        self.selection_start = caret;
        self.selection_end = caret;
        self.revision = self.revision.wrapping_add(1);
        self.pending_events.push(SurfaceEvent::InputChanged);
    }
}
