//! LEDs driven by a per-LED task

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU8, Ordering};

use cui_hal::{BlinkCount, Led, LedState};

/// Command for an LED task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCommand {
    On,
    Off,
    Blink { period_ms: u32, count: BlinkCount },
}

/// Shared between a [`BoardLed`] and its task
pub struct LedLink {
    command: Signal<CriticalSectionRawMutex, LedCommand>,
    state: AtomicU8,
}

impl LedLink {
    pub const fn new() -> Self {
        Self {
            command: Signal::new(),
            state: AtomicU8::new(0),
        }
    }

    pub async fn next_command(&self) -> LedCommand {
        self.command.wait().await
    }

    pub fn state(&self) -> LedState {
        match self.state.load(Ordering::Relaxed) {
            1 => LedState::On,
            2 => LedState::Blinking,
            _ => LedState::Off,
        }
    }

    /// Record what the pin is doing
    pub fn set_state(&self, state: LedState) {
        let raw = match state {
            LedState::Off => 0,
            LedState::On => 1,
            LedState::Blinking => 2,
        };
        self.state.store(raw, Ordering::Relaxed);
    }

    fn send(&self, command: LedCommand, state: LedState) {
        self.set_state(state);
        self.command.signal(command);
    }
}

impl Default for LedLink {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Led`] handle given to the arbiter
///
/// The board has no PWM on these pins, so any non-zero brightness is full on.
pub struct BoardLed {
    link: &'static LedLink,
}

impl BoardLed {
    pub fn new(link: &'static LedLink) -> Self {
        Self { link }
    }
}

impl Led for BoardLed {
    fn on(&mut self, brightness: u8) {
        if brightness == 0 {
            self.off();
        } else {
            self.link.send(LedCommand::On, LedState::On);
        }
    }

    fn off(&mut self) {
        self.link.send(LedCommand::Off, LedState::Off);
    }

    fn toggle(&mut self) {
        match self.link.state() {
            LedState::On => self.off(),
            _ => self.on(u8::MAX),
        }
    }

    fn start_blinking(&mut self, period_ms: u32, count: BlinkCount) {
        self.link
            .send(LedCommand::Blink { period_ms, count }, LedState::Blinking);
    }

    fn stop_blinking(&mut self) {
        self.off();
    }

    fn state(&self) -> LedState {
        self.link.state()
    }
}
