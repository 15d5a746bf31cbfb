//! Frame rendering into fixed buffers
//!
//! Every frame is formatted into one half of a ping-pong pair and the other
//! half is left alone, so the bytes handed to the transport for the previous
//! frame are not overwritten by the next one.

use core::fmt::Write;

use heapless::String;

use cui_protocol::frame;

use crate::config::{
    INITIAL_STATUS_OFFSET, MAX_MENU_LINE_LEN, MAX_STATUS_LINE_LABEL_LEN,
    MAX_STATUS_LINE_VALUE_LEN, STATUS_LABEL_SEPARATOR,
};
use crate::error::{CuiError, Result};
use crate::menu::MenuLines;

/// Escape sequences and control bytes around the text of any frame
const FRAME_OVERHEAD: usize = 48;

pub const MENU_FRAME_LEN: usize = 3 * MAX_MENU_LINE_LEN + FRAME_OVERHEAD;

pub const STATUS_FRAME_LEN: usize = MAX_STATUS_LINE_LABEL_LEN
    + STATUS_LABEL_SEPARATOR.len()
    + MAX_STATUS_LINE_VALUE_LEN
    + FRAME_OVERHEAD;

/// Cursor placement, terminal init and menu clear
pub const CONTROL_FRAME_LEN: usize = FRAME_OVERHEAD;

/// Row of the assert line, just above the status area
pub const ALERT_ROW: u16 = INITIAL_STATUS_OFFSET - 1;

/// Two alternating frame buffers
#[derive(Debug)]
pub struct PingPong<const N: usize> {
    buffers: [String<N>; 2],
    active: usize,
}

impl<const N: usize> Default for PingPong<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PingPong<N> {
    pub const fn new() -> Self {
        Self {
            buffers: [String::new(), String::new()],
            active: 0,
        }
    }

    /// Switch halves and return the new, empty, active buffer
    pub fn next(&mut self) -> &mut String<N> {
        self.active ^= 1;
        let buffer = &mut self.buffers[self.active];
        buffer.clear();
        buffer
    }

    /// Last frame formatted
    pub fn current(&self) -> &str {
        &self.buffers[self.active]
    }
}

/// Format the three menu lines
pub fn menu<'a, const N: usize>(frames: &'a mut PingPong<N>, lines: &MenuLines) -> Result<&'a str> {
    let out = frames.next();
    frame::write_menu_frame(
        out,
        [lines.line(0), lines.line(1), lines.line(2)],
        MAX_MENU_LINE_LEN,
    )
    .map_err(|_| CuiError::BufferOverflow)?;
    Ok(out.as_str())
}

/// Blank the menu area after the last menu is gone
pub fn menu_clear() -> Result<String<CONTROL_FRAME_LEN>> {
    let mut out = String::new();
    frame::write_menu_clear(&mut out, MAX_MENU_LINE_LEN).map_err(|_| CuiError::BufferOverflow)?;
    Ok(out)
}

/// Format a status line at its absolute row
///
/// The value is limited to [`MAX_STATUS_LINE_VALUE_LEN`]; a longer value
/// fails without touching either frame buffer.
pub fn status<'a, const N: usize>(
    frames: &'a mut PingPong<N>,
    row: u16,
    label: &str,
    value: core::fmt::Arguments<'_>,
) -> Result<&'a str> {
    let mut text: String<MAX_STATUS_LINE_VALUE_LEN> = String::new();
    text.write_fmt(value).map_err(|_| CuiError::BufferOverflow)?;

    let out = frames.next();
    frame::write_status_frame(out, row, label, format_args!("{}", text))
        .map_err(|_| CuiError::BufferOverflow)?;
    Ok(out.as_str())
}

/// Cursor placement for an intercepting item, in menu coordinates
pub fn cursor(row: u16, col: u16) -> Result<String<CONTROL_FRAME_LEN>> {
    let mut out = String::new();
    frame::write_cursor(&mut out, row, col).map_err(|_| CuiError::BufferOverflow)?;
    Ok(out)
}

pub fn terminal_init() -> Result<String<CONTROL_FRAME_LEN>> {
    let mut out = String::new();
    frame::write_terminal_init(&mut out).map_err(|_| CuiError::BufferOverflow)?;
    Ok(out)
}

pub fn terminal_reset() -> Result<String<CONTROL_FRAME_LEN>> {
    let mut out = String::new();
    frame::write_terminal_reset(&mut out).map_err(|_| CuiError::BufferOverflow)?;
    Ok(out)
}

/// Red assert message on [`ALERT_ROW`]
pub fn alert<'a, const N: usize>(frames: &'a mut PingPong<N>, message: &str) -> Result<&'a str> {
    let out = frames.next();
    frame::write_alert_frame(out, ALERT_ROW, message).map_err(|_| CuiError::BufferOverflow)?;
    Ok(out.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_pong_alternates() {
        let mut frames: PingPong<16> = PingPong::new();
        frames.next().push_str("one").unwrap();
        let first = frames.active;
        frames.next().push_str("two").unwrap();

        assert_ne!(first, frames.active);
        assert_eq!(frames.current(), "two");
        assert_eq!(frames.buffers[first].as_str(), "one");
    }

    #[test]
    fn test_status_overflow_leaves_buffers() {
        let mut frames: PingPong<STATUS_FRAME_LEN> = PingPong::new();
        status(&mut frames, 5, "A: ", format_args!("ok")).unwrap();

        let long = [b'x'; MAX_STATUS_LINE_VALUE_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(
            status(&mut frames, 5, "A: ", format_args!("{}", long)),
            Err(CuiError::BufferOverflow)
        );
        assert!(frames.current().contains("A: ok"));
    }

    #[test]
    fn test_menu_frame_contains_lines() {
        let mut frames: PingPong<MENU_FRAME_LEN> = PingPong::new();
        let mut lines = MenuLines::new();
        lines.set(0, "Title");
        lines.set(2, "< Item >");

        let out = menu(&mut frames, &lines).unwrap();
        assert!(out.ends_with("\x01Title\n\r\n\r< Item >\x03"));
    }
}
