//! Keyboard input decoding
//!
//! The receive path hands over one short chunk per read. A chunk is either a
//! single keystroke or an escape sequence; only the first key is consumed.

use crate::control::ESC;

/// Enter (carriage return), or a bare line feed from terminals configured for it
const KEY_ENTER: u8 = b'\r';
const KEY_LINE_FEED: u8 = b'\n';
/// Backspace as sent by most serial terminals
const KEY_BACKSPACE: u8 = 0x08;
/// DEL, sent for backspace by xterm-like terminals
const KEY_DELETE: u8 = 0x7F;

/// Arrow sequences after the `ESC [` introducer
const ARROW_UP: u8 = b'A';
const ARROW_DOWN: u8 = b'B';
const ARROW_RIGHT: u8 = b'C';
const ARROW_LEFT: u8 = b'D';

/// A decoded keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Enter: perform the selected action or descend
    Execute,
    /// Backspace: return to the parent menu
    Back,
    /// Bare escape: return to the main menu
    Escape,
    /// Any other byte, folded to lower case
    Char(u8),
}

impl Key {
    /// Decode a received input chunk
    ///
    /// Returns `None` for an empty chunk and for escape sequences other than
    /// the four arrows; those are dropped as line noise.
    pub fn decode(chunk: &[u8]) -> Option<Self> {
        let (&first, rest) = chunk.split_first()?;

        if first != ESC {
            return Some(Self::from_byte(first));
        }

        match rest {
            [b'[', ARROW_UP, ..] => Some(Key::Up),
            [b'[', ARROW_DOWN, ..] => Some(Key::Down),
            [b'[', ARROW_RIGHT, ..] => Some(Key::Right),
            [b'[', ARROW_LEFT, ..] => Some(Key::Left),
            // Short reads arrive zero padded
            _ if rest.iter().all(|&b| b == 0) => Some(Key::Escape),
            _ => None,
        }
    }

    /// Classify a single byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            KEY_ENTER | KEY_LINE_FEED => Key::Execute,
            KEY_BACKSPACE | KEY_DELETE => Key::Back,
            ESC => Key::Escape,
            other => Key::Char(other.to_ascii_lowercase()),
        }
    }

    /// Returns the character for printable keys
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(byte) if byte.is_ascii_graphic() || *byte == b' ' => Some(*byte as char),
            _ => None,
        }
    }

    /// Returns the horizontal direction as a signed delta (-1, 0, or +1)
    pub fn horizontal_delta(&self) -> i8 {
        match self {
            Key::Right => 1,
            Key::Left => -1,
            _ => 0,
        }
    }
}
