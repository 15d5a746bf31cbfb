//! LED abstractions
//!
//! Blinking is owned by the driver (usually a timer task on the board side);
//! the arbiter only starts and stops it.

/// Number of blinks for [`Led::start_blinking`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkCount {
    /// Blink this many times, then switch off
    Times(u16),
    /// Blink until stopped
    Continuous,
}

/// Current driver-side LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Off,
    On,
    Blinking,
}

/// LED driver
pub trait Led {
    /// Switch the LED on at the given brightness (0-255)
    ///
    /// Drivers without dimming treat any non-zero brightness as full on.
    fn on(&mut self, brightness: u8);

    /// Switch the LED off
    fn off(&mut self);

    /// Toggle between on and off
    fn toggle(&mut self);

    /// Start blinking with the given full period
    fn start_blinking(&mut self, period_ms: u32, count: BlinkCount);

    /// Stop blinking, leaving the LED off
    fn stop_blinking(&mut self);

    fn state(&self) -> LedState;

    /// Check if the LED is currently blinking
    fn is_blinking(&self) -> bool {
        self.state() == LedState::Blinking
    }
}
