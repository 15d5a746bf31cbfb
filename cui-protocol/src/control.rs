//! Control bytes and ANSI escape sequences

use core::fmt;

/// Opens a three-line menu frame
pub const MENU_START: u8 = 0x01;
/// Opens a single status-line frame
pub const STATUS_START: u8 = 0x02;
/// Closes either frame
pub const FRAME_END: u8 = 0x03;

/// Escape byte that introduces every control sequence
pub const ESC: u8 = 0x1B;

/// Line separator inside a menu frame
pub const LINE_BREAK: &str = "\n\r";

pub const CLEAR_SCREEN: &str = "\x1b[2J";
/// Erase from the start of the screen up to the cursor
pub const CLEAR_ABOVE: &str = "\x1b[1J";
pub const CLEAR_LINE: &str = "\x1b[2K";
pub const CURSOR_HIDE: &str = "\x1b[?25l";
pub const CURSOR_SHOW: &str = "\x1b[?25h";
pub const CURSOR_HOME: &str = "\x1b[H";
/// Automatic newline mode (LNM): LF also returns the carriage
pub const LINE_FEED_MODE: &str = "\x1b[20h";

pub const COLOR_RED: &str = "\x1b[31m";
pub const COLOR_RESET: &str = "\x1b[0m";

/// Absolute cursor placement, `ESC[row;colH`
///
/// Rows are 1-based. Column 0 is accepted by every terminal we drive and
/// lands in the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CursorTo {
    pub row: u16,
    pub col: u16,
}

impl CursorTo {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Start of the given row
    pub const fn line(row: u16) -> Self {
        Self { row, col: 0 }
    }
}

impl fmt::Display for CursorTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[{};{}H", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    #[test]
    fn test_cursor_to_format() {
        assert_eq!(format!("{}", CursorTo::new(3, 128)), "\x1b[3;128H");
        assert_eq!(format!("{}", CursorTo::line(7)), "\x1b[7;0H");
    }
}
