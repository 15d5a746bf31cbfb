//! Built-in Help item

use super::item::InterceptInput;
use super::screen::{CursorPos, MenuLines};

pub const HELP_PREVIEW: &str = "Press Enter for Help";

pub const HELP_LINES: [&str; 3] = [
    "[Arrow Keys] Navigate Menus | [Enter] Perform Action, Enter Submenu",
    "----------------------------|--------------------------------------",
    "[Esc] Return to Main Menu   | [Backspace] Return to Parent Menu",
];

pub(crate) fn help_handler(
    input: InterceptInput,
    lines: &mut MenuLines,
    _cursor: &mut Option<CursorPos>,
) {
    match input {
        InterceptInput::Preview => lines.set(1, HELP_PREVIEW),
        _ => {
            for (row, text) in HELP_LINES.iter().enumerate() {
                lines.set(row, text);
            }
        }
    }
}
