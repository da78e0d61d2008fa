//! Minimal line editor for the content pane.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug)]
pub struct EditorPane {
    lines: Vec<String>,
    cursor_row: usize,
    /// Grapheme index within the current line.
    cursor_col: usize,
    pub scroll: usize,
}

fn grapheme_count(line: &str) -> usize {
    line.graphemes(true).count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.grapheme_indices(true)
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl EditorPane {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
        }
    }

    pub fn set_content(&mut self, content: &str) {
        self.lines = content.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        self.cursor_col = self
            .cursor_col
            .min(grapheme_count(&self.lines[self.cursor_row]));
        self.scroll = self.scroll.min(self.lines.len().saturating_sub(1));
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Display column of the cursor, in terminal cells.
    pub fn cursor_display_col(&self) -> usize {
        let line = &self.lines[self.cursor_row];
        let idx = byte_index(line, self.cursor_col);
        UnicodeWidthStr::width(&line[..idx])
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(idx, ch);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        let idx = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(idx);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let start = byte_index(line, self.cursor_col - 1);
            let end = byte_index(line, self.cursor_col);
            line.replace_range(start..end, "");
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = grapheme_count(&self.lines[self.cursor_row]);
            self.lines[self.cursor_row].push_str(&line);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = grapheme_count(&self.lines[self.cursor_row]);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < grapheme_count(&self.lines[self.cursor_row]) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(grapheme_count(&self.lines[self.cursor_row]));
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(grapheme_count(&self.lines[self.cursor_row]));
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = grapheme_count(&self.lines[self.cursor_row]);
    }

    /// Keeps the cursor row inside a viewport of `height` rows.
    pub fn follow_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + height {
            self.scroll = self.cursor_row + 1 - height;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tui/editor.rs"]
mod tests;
