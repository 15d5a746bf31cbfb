//! Keystroke interception
//!
//! An interceptable item is idle until Enter opens a session. While the
//! session is open every key goes to the item's handler, which redraws the
//! menu lines itself; Enter closes the session and Escape abandons it.

use cui_protocol::Key;

use super::item::{InterceptInput, MenuItem};
use super::screen::{CursorPos, MenuLines};

/// What interception did with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercepted {
    /// Not consumed; normal navigation applies
    Ignored,
    /// Consumed by an open session; `lines` hold the handler's view
    Active,
    /// Session closed; the menu must be redrawn normally
    Ended,
}

/// Offer a key to the selected item
pub fn offer(
    item: &mut MenuItem,
    key: Key,
    lines: &mut MenuLines,
    cursor: &mut Option<CursorPos>,
) -> Intercepted {
    let Some(handler) = item.interceptor() else {
        return Intercepted::Ignored;
    };

    let input = match (item.intercepting, key) {
        (true, Key::Execute) => InterceptInput::Stop,
        (true, Key::Escape) => InterceptInput::Cancel,
        (true, other) => InterceptInput::Key(other),
        (false, Key::Execute) => InterceptInput::Start,
        (false, _) => return Intercepted::Ignored,
    };

    lines.clear();
    *cursor = None;
    handler(input, lines, cursor);

    match input {
        InterceptInput::Stop | InterceptInput::Cancel => {
            item.intercepting = false;
            *cursor = None;
            debug!("Intercept session closed: {:?}", input);
            Intercepted::Ended
        }
        InterceptInput::Start => {
            item.intercepting = true;
            debug!("Intercept session opened");
            Intercepted::Active
        }
        _ => Intercepted::Active,
    }
}

/// Close an open session without a key, e.g. when the item goes off screen
pub fn abandon(item: &mut MenuItem, lines: &mut MenuLines) {
    if !item.intercepting {
        return;
    }
    if let Some(handler) = item.interceptor() {
        let mut cursor = None;
        lines.clear();
        handler(InterceptInput::Cancel, lines, &mut cursor);
    }
    item.intercepting = false;
}

/// Let an idle interceptable item decorate its normal view
pub fn preview(item: &MenuItem, lines: &mut MenuLines) {
    if let Some(handler) = item.interceptor() {
        let mut cursor = None;
        handler(InterceptInput::Preview, lines, &mut cursor);
    }
}
