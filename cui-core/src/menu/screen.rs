//! Menu view buffers
//!
//! The menu always occupies the top three terminal rows. Intercepting items
//! get these buffers to draw into, plus an optional cursor request.

use heapless::String;

use crate::config::MAX_MENU_LINE_LEN;

/// Number of menu rows on the terminal
pub const MENU_ROWS: usize = 3;

/// One menu row
pub type MenuLine = String<MAX_MENU_LINE_LEN>;

/// Cursor position requested by an intercepting item
///
/// Rows are terminal rows (1-3 for the menu), columns are terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CursorPos {
    pub row: u16,
    pub col: u16,
}

impl CursorPos {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// The three menu lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLines {
    lines: [MenuLine; MENU_ROWS],
}

impl Default for MenuLines {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuLines {
    /// Create three empty lines
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new(), String::new()],
        }
    }

    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Set the content of a row, truncating to the line width
    pub fn set(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            let _ = line.push_str(truncate(text, MAX_MENU_LINE_LEN));
        }
    }

    /// Content of a row; empty for rows past the menu
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Direct access for `core::fmt::Write` formatting
    pub fn line_mut(&mut self, row: usize) -> Option<&mut MenuLine> {
        self.lines.get_mut(row)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }
}

/// Longest prefix of `text` that fits `max` bytes on a char boundary
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
