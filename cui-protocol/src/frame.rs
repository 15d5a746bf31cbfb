//! Frame encoding and scanning for the serial console.
//!
//! Encoders write into any [`core::fmt::Write`] sink, so the engine can
//! format straight into its fixed-size buffers. The [`FrameScanner`] goes
//! the other way: it strips escape sequences out of a captured byte stream
//! and returns the text of each bracketed frame.

use core::fmt::{self, Write};

use heapless::String;

use crate::control::{
    CursorTo, CLEAR_ABOVE, CLEAR_LINE, CLEAR_SCREEN, COLOR_RED, COLOR_RESET, CURSOR_HIDE,
    CURSOR_HOME, CURSOR_SHOW, ESC, FRAME_END, LINE_BREAK, LINE_FEED_MODE, MENU_START,
    STATUS_START,
};

/// Maximum text kept for a single scanned frame
pub const MAX_FRAME_TEXT: usize = 512;

/// Row holding the last menu line; the menu area is cleared up to it
const MENU_LAST_ROW: u16 = 3;

/// Errors that can occur while scanning frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame text exceeded [`MAX_FRAME_TEXT`]
    Overflow,
    /// A new frame started before the previous one ended
    Unterminated,
}

/// Which kind of frame was bracketed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    Menu,
    Status,
}

impl FrameKind {
    /// Opening control byte for this kind
    pub fn start_byte(self) -> u8 {
        match self {
            FrameKind::Menu => MENU_START,
            FrameKind::Status => STATUS_START,
        }
    }

    pub fn from_start_byte(byte: u8) -> Option<Self> {
        match byte {
            MENU_START => Some(FrameKind::Menu),
            STATUS_START => Some(FrameKind::Status),
            _ => None,
        }
    }
}

fn write_control<W: Write>(out: &mut W, byte: u8) -> fmt::Result {
    out.write_char(char::from(byte))
}

/// Terminal setup sent once at init: clear, line-feed mode, hidden cursor
pub fn write_terminal_init<W: Write>(out: &mut W) -> fmt::Result {
    out.write_str(CLEAR_SCREEN)?;
    out.write_str(LINE_FEED_MODE)?;
    out.write_str(CURSOR_HIDE)
}

/// Terminal teardown sent at close: clear, cursor home, shown
pub fn write_terminal_reset<W: Write>(out: &mut W) -> fmt::Result {
    out.write_str(CLEAR_SCREEN)?;
    out.write_str(CURSOR_HOME)?;
    out.write_str(CURSOR_SHOW)
}

/// Blank the menu area (rows 1-3) and park the cursor at home
pub fn write_menu_clear<W: Write>(out: &mut W, width: usize) -> fmt::Result {
    out.write_str(CURSOR_HIDE)?;
    write!(out, "{}", CursorTo::new(MENU_LAST_ROW, clamp_col(width)))?;
    out.write_str(CLEAR_ABOVE)?;
    out.write_str(CURSOR_HOME)
}

/// Three-line menu frame
///
/// `width` is the widest menu line; everything above and left of
/// `(3, width)` is erased before the new lines are drawn.
pub fn write_menu_frame<W: Write>(out: &mut W, lines: [&str; 3], width: usize) -> fmt::Result {
    write_menu_clear(out, width)?;
    write_control(out, MENU_START)?;
    out.write_str(lines[0])?;
    out.write_str(LINE_BREAK)?;
    out.write_str(lines[1])?;
    out.write_str(LINE_BREAK)?;
    out.write_str(lines[2])?;
    write_control(out, FRAME_END)
}

/// Single status-line frame at an absolute row
///
/// `label` already carries its separator.
pub fn write_status_frame<W: Write>(
    out: &mut W,
    row: u16,
    label: &str,
    value: fmt::Arguments<'_>,
) -> fmt::Result {
    out.write_str(CURSOR_HIDE)?;
    out.write_str(CURSOR_HOME)?;
    write!(out, "{}", CursorTo::line(row))?;
    out.write_str(CLEAR_LINE)?;
    write_control(out, STATUS_START)?;
    out.write_str(label)?;
    out.write_fmt(value)?;
    write_control(out, FRAME_END)
}

/// Red alert line, used by the assert path
pub fn write_alert_frame<W: Write>(out: &mut W, row: u16, message: &str) -> fmt::Result {
    out.write_str(CURSOR_HIDE)?;
    out.write_str(CURSOR_HOME)?;
    write!(out, "{}", CursorTo::line(row))?;
    out.write_str(CLEAR_LINE)?;
    write_control(out, STATUS_START)?;
    out.write_str(COLOR_RED)?;
    out.write_str(message)?;
    write_control(out, FRAME_END)?;
    out.write_str(COLOR_RESET)
}

/// Place and show the editing cursor
pub fn write_cursor<W: Write>(out: &mut W, row: u16, col: u16) -> fmt::Result {
    out.write_str(CURSOR_HOME)?;
    write!(out, "{}", CursorTo::new(row, col))?;
    out.write_str(CURSOR_SHOW)
}

fn clamp_col(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// A frame recovered from the output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFrame {
    pub kind: FrameKind,
    /// Frame text with escape sequences removed
    pub text: String<MAX_FRAME_TEXT>,
}

impl ScannedFrame {
    /// Iterate over the lines of a menu frame
    pub fn lines(&self) -> core::str::Split<'_, &'static str> {
        self.text.split(LINE_BREAK)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any frame
    Idle,
    /// Collecting frame text
    Text,
    /// Got ESC, waiting for the introducer
    Escape,
    /// Inside `ESC [`, waiting for the final byte
    Csi,
}

/// Scanner that pulls frames out of a console byte stream
#[derive(Debug, Clone)]
pub struct FrameScanner {
    state: ScanState,
    /// State to resume after an escape sequence ends
    resume: ScanState,
    kind: FrameKind,
    text: String<MAX_FRAME_TEXT>,
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScanner {
    /// Create a new frame scanner
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            resume: ScanState::Idle,
            kind: FrameKind::Menu,
            text: String::new(),
        }
    }

    /// Reset the scanner state
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
        self.resume = ScanState::Idle;
        self.text.clear();
    }

    /// Feed a single byte to the scanner
    ///
    /// Returns `Ok(Some(frame))` when a frame closes, `Ok(None)` when more
    /// bytes are needed. A start byte inside an open frame reports
    /// [`FrameError::Unterminated`] and opens the new frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<ScannedFrame>, FrameError> {
        match self.state {
            ScanState::Escape => {
                self.state = if byte == b'[' { ScanState::Csi } else { self.resume };
                Ok(None)
            }
            ScanState::Csi => {
                // Parameters and intermediates run until a final byte in 0x40..=0x7E
                if (0x40..=0x7E).contains(&byte) {
                    self.state = self.resume;
                }
                Ok(None)
            }
            ScanState::Idle | ScanState::Text if byte == ESC => {
                self.resume = self.state;
                self.state = ScanState::Escape;
                Ok(None)
            }
            ScanState::Idle => {
                if let Some(kind) = FrameKind::from_start_byte(byte) {
                    self.open(kind);
                }
                // Text between frames is not ours to report
                Ok(None)
            }
            ScanState::Text => {
                if let Some(kind) = FrameKind::from_start_byte(byte) {
                    self.open(kind);
                    return Err(FrameError::Unterminated);
                }

                if byte == FRAME_END {
                    let frame = ScannedFrame {
                        kind: self.kind,
                        text: self.text.clone(),
                    };
                    self.reset();
                    return Ok(Some(frame));
                }

                if self.text.push(char::from(byte)).is_err() {
                    self.reset();
                    return Err(FrameError::Overflow);
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the scanner
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<ScannedFrame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn open(&mut self, kind: FrameKind) {
        self.kind = kind;
        self.text.clear();
        self.state = ScanState::Text;
    }
}
