/// Editable notes buffer. Cursor is a char index into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotesEditor {
    text: String,
    cursor: usize,
    focused: bool,
    /// Last text known to be persisted.
    saved: String,
}

impl NotesEditor {
    pub fn new(notes: &str) -> Self {
        Self {
            text: notes.to_string(),
            cursor: notes.chars().count(),
            focused: false,
            saved: notes.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.saved
    }

    pub fn mark_saved(&mut self, text: &str) {
        self.saved = text.to_string();
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Zero-based (line, column) of the cursor, for rendering.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count());
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor_with_multibyte_text() {
        let mut editor = NotesEditor::new("héllo");
        assert_eq!(editor.cursor(), 5);
        editor.move_left();
        editor.move_left();
        editor.insert('X');
        assert_eq!(editor.text(), "hélXlo");
        editor.move_home();
        editor.move_right();
        editor.move_right();
        editor.backspace();
        assert_eq!(editor.text(), "hlXlo");
        editor.delete();
        assert_eq!(editor.text(), "hXlo");
        assert!(editor.is_dirty());
        editor.mark_saved("hXlo");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn cursor_position_tracks_lines() {
        let mut editor = NotesEditor::new("ab\ncd");
        assert_eq!(editor.cursor_position(), (1, 2));
        editor.move_home();
        assert_eq!(editor.cursor_position(), (0, 0));
        editor.backspace();
        assert_eq!(editor.text(), "ab\ncd");
    }
}
