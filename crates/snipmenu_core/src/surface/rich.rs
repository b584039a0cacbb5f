//! Rich-text surface: structural nodes with an optional selection range.
//!
//! Plain newline characters are not honored by rich-text rendering, so
//! inserted text is translated into text nodes interleaved with explicit
//! line-break nodes. The surface keeps a canonical form: no empty text nodes,
//! adjacent text runs coalesced.

/// A node in the editable region's fragment model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
}

impl Node {
    fn len_chars(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::LineBreak => 1,
        }
    }
}

/// A selection range between two character positions in flattened document
/// order (a line break occupies one position). `start` and `end` may arrive
/// in either order; operations normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Collapsed selection at `position`.
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    fn ordered(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// A contenteditable-like surface: a node list plus zero or one selection.
#[derive(Debug, Clone, Default)]
pub struct RichSurface {
    nodes: Vec<Node>,
    selection: Option<Selection>,
}

/// Build the fragment for `text`: text nodes split on newline, with exactly
/// one line break between adjacent lines and none at the very start or end.
fn fragment_from_text(text: &str) -> Vec<Node> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut nodes = Vec::new();
    for (position, segment) in text.split('\n').enumerate() {
        if position > 0 {
            nodes.push(Node::LineBreak);
        }
        if !segment.is_empty() {
            nodes.push(Node::Text(segment.to_string()));
        }
    }
    nodes
}

/// Coalesce adjacent text runs and drop empty ones.
fn normalize(nodes: Vec<Node>) -> Vec<Node> {
    let mut normalized: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => match normalized.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(&text),
                _ => normalized.push(Node::Text(text)),
            },
            Node::LineBreak => normalized.push(Node::LineBreak),
        }
    }
    normalized
}

impl RichSurface {
    /// Create an empty surface with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface from existing nodes, normalized, with no selection.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: normalize(nodes),
            selection: None,
        }
    }

    /// The surface content in canonical node form.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The active selection range, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set or clear the active selection range.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Content length in characters (a line break counts as one).
    pub fn len_chars(&self) -> usize {
        self.nodes.iter().map(Node::len_chars).sum()
    }

    /// Flattened snapshot with line breaks rendered as `\n`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(segment) => text.push_str(segment),
                Node::LineBreak => text.push('\n'),
            }
        }
        text
    }

    /// Nodes covering the character range `[from, to)`.
    fn slice(&self, from: usize, to: usize) -> Vec<Node> {
        let mut sliced = Vec::new();
        let mut position = 0;
        for node in &self.nodes {
            let len = node.len_chars();
            let node_start = position;
            let node_end = position + len;
            position = node_end;

            let start = from.max(node_start);
            let end = to.min(node_end);
            if start >= end {
                continue;
            }
            match node {
                Node::Text(text) => {
                    let taken: String = text
                        .chars()
                        .skip(start - node_start)
                        .take(end - start)
                        .collect();
                    sliced.push(Node::Text(taken));
                }
                Node::LineBreak => sliced.push(Node::LineBreak),
            }
        }
        sliced
    }

    /// Insert `text` over the active selection range.
    ///
    /// Deletes the selection contents, splices in the fragment built from
    /// `text`, and collapses the selection immediately after the last
    /// inserted character. Without an active selection there is no caret to
    /// anchor to and the surface is left untouched.
    ///
    /// # Returns
    /// `true` when the surface was mutated.
    pub fn insert_at_selection(&mut self, text: &str) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let len = self.len_chars();
        let (start, end) = selection.ordered();
        let start = start.min(len);
        let end = end.min(len);

        let mut nodes = self.slice(0, start);
        nodes.extend(fragment_from_text(text));
        nodes.extend(self.slice(end, len));

        self.nodes = normalize(nodes);
        self.selection = Some(Selection::caret(start + text.chars().count()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Node {
        Node::Text(value.to_string())
    }

    #[test]
    fn newline_payload_becomes_segments_joined_by_one_break() {
        let mut surface = RichSurface::new();
        surface.set_selection(Some(Selection::caret(0)));

        assert!(surface.insert_at_selection("line1\nline2"));
        assert_eq!(
            surface.nodes(),
            &[text("line1"), Node::LineBreak, text("line2")]
        );
        // Caret lands after the last inserted character, not selecting it.
        assert_eq!(surface.selection(), Some(Selection::caret(11)));
    }

    #[test]
    fn no_selection_is_a_noop() {
        let mut surface = RichSurface::from_nodes(vec![text("existing")]);

        assert!(!surface.insert_at_selection("ignored"));
        assert_eq!(surface.nodes(), &[text("existing")]);
        assert!(surface.selection().is_none());
    }

    #[test]
    fn selection_contents_are_replaced_across_breaks() {
        let mut surface =
            RichSurface::from_nodes(vec![text("ab"), Node::LineBreak, text("cd")]);
        surface.set_selection(Some(Selection { start: 1, end: 4 }));

        assert!(surface.insert_at_selection("X"));
        assert_eq!(surface.nodes(), &[text("aXd")]);
        assert_eq!(surface.selection(), Some(Selection::caret(2)));
    }

    #[test]
    fn reversed_selection_is_normalized() {
        let mut surface =
            RichSurface::from_nodes(vec![text("ab"), Node::LineBreak, text("cd")]);
        surface.set_selection(Some(Selection { start: 4, end: 1 }));

        assert!(surface.insert_at_selection("X"));
        assert_eq!(surface.nodes(), &[text("aXd")]);
        assert_eq!(surface.selection(), Some(Selection::caret(2)));
    }

    #[test]
    fn consecutive_newlines_keep_every_break() {
        let mut surface = RichSurface::new();
        surface.set_selection(Some(Selection::caret(0)));

        assert!(surface.insert_at_selection("a\n\nb"));
        assert_eq!(
            surface.nodes(),
            &[text("a"), Node::LineBreak, Node::LineBreak, text("b")]
        );
        assert_eq!(surface.text(), "a\n\nb");
        assert_eq!(surface.selection(), Some(Selection::caret(4)));
    }

    #[test]
    fn empty_payload_still_deletes_the_selection() {
        let mut surface = RichSurface::from_nodes(vec![text("abcd")]);
        surface.set_selection(Some(Selection { start: 1, end: 3 }));

        assert!(surface.insert_at_selection(""));
        assert_eq!(surface.nodes(), &[text("ad")]);
        assert_eq!(surface.selection(), Some(Selection::caret(1)));
    }

    #[test]
    fn selection_beyond_content_is_clamped() {
        let mut surface = RichSurface::from_nodes(vec![text("ab")]);
        surface.set_selection(Some(Selection { start: 1, end: 99 }));

        assert!(surface.insert_at_selection("Z"));
        assert_eq!(surface.nodes(), &[text("aZ")]);
        assert_eq!(surface.selection(), Some(Selection::caret(2)));
    }
}
