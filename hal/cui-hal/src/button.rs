//! Push-button abstractions
//!
//! Edge detection, debouncing and press-duration classification live in the
//! board's button driver. The arbiter only reads the current level and
//! forwards the classified events to whichever client owns the button.

/// Push-button driver
pub trait Button {
    /// Check if the button is currently held down
    fn is_pressed(&self) -> bool;

    /// Check if the button is currently released
    fn is_released(&self) -> bool {
        !self.is_pressed()
    }
}

/// Single classified button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Button went down
    Pressed,
    /// Button went up
    Released,
    /// Press shorter than the long-press threshold
    Clicked,
    /// Held past the long-press threshold (fires while still held)
    LongPressed,
    /// Released after a long press
    LongClicked,
    /// Two clicks in quick succession
    DoubleClicked,
}

impl ButtonEvent {
    const fn bit(self) -> u8 {
        match self {
            ButtonEvent::Pressed => 1 << 0,
            ButtonEvent::Released => 1 << 1,
            ButtonEvent::Clicked => 1 << 2,
            ButtonEvent::LongPressed => 1 << 3,
            ButtonEvent::LongClicked => 1 << 4,
            ButtonEvent::DoubleClicked => 1 << 5,
        }
    }
}

/// Set of button events delivered together
///
/// A single release edge can complete several events at once
/// (`Released | Clicked`), so drivers report them as a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvents(u8);

impl ButtonEvents {
    /// No events
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set holding a single event
    pub const fn only(event: ButtonEvent) -> Self {
        Self(event.bit())
    }

    /// Add an event to the set
    pub const fn with(self, event: ButtonEvent) -> Self {
        Self(self.0 | event.bit())
    }

    /// Check whether the set contains `event`
    pub const fn contains(self, event: ButtonEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit mask
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<ButtonEvent> for ButtonEvents {
    fn from(event: ButtonEvent) -> Self {
        Self::only(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_set() {
        let events = ButtonEvents::only(ButtonEvent::Released).with(ButtonEvent::Clicked);
        assert!(events.contains(ButtonEvent::Released));
        assert!(events.contains(ButtonEvent::Clicked));
        assert!(!events.contains(ButtonEvent::LongPressed));
        assert!(!events.is_empty());
        assert!(ButtonEvents::empty().is_empty());
    }
}
