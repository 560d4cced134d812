//! Editor session state.
//!
//! `EditorSession` is the explicit "buffer + cursor + selection" value that
//! every engine operation takes and mutates. Keeping it a plain value (no
//! ambient state) makes every operation `(content, cursor) -> (content',
//! cursor')` and deterministic under test.

use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;
use crate::types::Selection;

/// Buffer, cursor and optional selection for one editing surface.
///
/// Cursor and selection are char offsets, clamped into `0..=len_chars`.
/// All mutation goes through replace-range operations that also reposition
/// the cursor.
#[derive(Clone)]
pub struct EditorSession<T: TextBuffer> {
    buffer: T,
    cursor: usize,
    selection: Option<Selection>,
}

impl<T: TextBuffer + Default> Default for EditorSession<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl EditorSession<crate::EditorRope> {
    /// Create a ropey-backed session from initial content.
    pub fn from_str(content: &str) -> Self {
        Self::new(crate::EditorRope::from_str(content))
    }
}

impl<T: TextBuffer> EditorSession<T> {
    /// Create a session over the given buffer, cursor at 0.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            cursor: 0,
            selection: None,
        }
    }

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn content_string(&self) -> String {
        self.buffer.to_string()
    }

    pub fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer.slice(range)
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the buffer length.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set the selection, clamped to the buffer length.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        let len = self.buffer.len_chars();
        self.selection =
            selection.map(|s| Selection::new(s.anchor.min(len), s.head.min(len)));
    }

    pub fn selected_text(&self) -> Option<SmolStr> {
        self.selection
            .filter(|s| !s.is_collapsed())
            .and_then(|s| self.buffer.slice(s.to_range()))
    }

    // === Mutation: every operation repositions the cursor ===

    /// Insert text at char offset; cursor lands past the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.buffer.insert(offset, text);
        self.cursor = offset + text.chars().count();
    }

    /// Insert at the current cursor.
    pub fn insert_at_cursor(&mut self, text: &str) {
        self.insert(self.cursor, text);
    }

    /// Delete char range; cursor lands at the range start.
    pub fn delete(&mut self, range: Range<usize>) {
        self.buffer.delete(range.clone());
        self.cursor = range.start;
    }

    /// Replace char range with text; cursor lands past the replacement.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        self.buffer.replace(range.clone(), text);
        self.cursor = range.start + text.chars().count();
    }

    // === Line geometry ===

    /// Start of the line containing offset (position after the preceding
    /// line break, or 0).
    pub fn line_start(&self, offset: usize) -> usize {
        let mut pos = offset.min(self.buffer.len_chars());
        while pos > 0 {
            if let Some('\n') = self.buffer.char_at(pos - 1) {
                return pos;
            }
            pos -= 1;
        }
        0
    }

    /// End of the line containing offset (position of the line break, or
    /// end of buffer).
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.buffer.len_chars();
        let mut pos = offset.min(len);
        while pos < len {
            if let Some('\n') = self.buffer.char_at(pos) {
                return pos;
            }
            pos += 1;
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(content: &str) -> EditorSession<crate::EditorRope> {
        EditorSession::from_str(content)
    }

    #[test]
    fn test_insert_moves_cursor() {
        let mut session = make_session("hello");
        session.insert(5, " world");
        assert_eq!(session.content_string(), "hello world");
        assert_eq!(session.cursor(), 11);
    }

    #[test]
    fn test_delete_moves_cursor() {
        let mut session = make_session("hello world");
        session.delete(5..11);
        assert_eq!(session.content_string(), "hello");
        assert_eq!(session.cursor(), 5);
    }

    #[test]
    fn test_replace_moves_cursor() {
        let mut session = make_session("hello world");
        session.replace(6..11, "rust");
        assert_eq!(session.content_string(), "hello rust");
        assert_eq!(session.cursor(), 10);
    }

    #[test]
    fn test_cursor_clamped() {
        let mut session = make_session("abc");
        session.set_cursor(99);
        assert_eq!(session.cursor(), 3);
    }

    #[test]
    fn test_selected_text() {
        let mut session = make_session("hello world");
        session.set_selection(Some(Selection::new(0, 5)));
        assert_eq!(session.selected_text().as_deref(), Some("hello"));

        session.set_selection(Some(Selection::new(3, 3)));
        assert_eq!(session.selected_text(), None);
    }

    #[test]
    fn test_line_boundaries() {
        let session = make_session("hello\nworld\ntest");
        assert_eq!(session.line_start(0), 0);
        assert_eq!(session.line_start(3), 0);
        assert_eq!(session.line_start(6), 6);
        assert_eq!(session.line_start(8), 6);
        assert_eq!(session.line_end(0), 5);
        assert_eq!(session.line_end(6), 11);
        assert_eq!(session.line_end(12), 16);
    }
}
