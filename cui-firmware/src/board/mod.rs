//! RP2040 implementations of the CUI hardware traits
//!
//! The arbiter owns the trait objects; the pins themselves live in tasks.
//! Each trait object is a thin handle onto a static link shared with the
//! task that drives the pin, so the arbiter never blocks on hardware.

pub mod button;
pub mod led;
pub mod serial;

use embassy_time::{Duration, Timer};
use embedded_hal_async::delay::DelayNs;

pub use button::{BoardButton, ButtonLink};
pub use led::{BoardLed, LedCommand, LedLink};
pub use serial::{PipeTx, TX_PIPE};

/// Async delay on the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerDelay;

impl DelayNs for TimerDelay {
    async fn delay_ns(&mut self, ns: u32) {
        Timer::after(Duration::from_nanos(u64::from(ns))).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}
