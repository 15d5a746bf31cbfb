//! Button and LED operations
//!
//! Every call validates in the same order: domain managed, module
//! initialized, handle live, then ownership where the operation needs it.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use cui_hal::{BlinkCount, Button, ButtonEvents, Led, LedState, SerialTx};

use super::Arbiter;
use crate::client::ClientHandle;
use crate::error::{Domain, Result};
use crate::resource::ButtonCallback;

impl<M, T, D, B, L> Arbiter<M, T, D, B, L>
where
    M: RawMutex,
    T: SerialTx,
    D: DelayNs + Clone,
    B: Button,
    L: Led,
{
    /// Claim a button, optionally with its event callback
    pub fn button_request(
        &self,
        client: ClientHandle,
        index: usize,
        callback: Option<ButtonCallback>,
    ) -> Result<()> {
        self.check(Domain::Buttons, client)?;
        self.buttons
            .lock(|buttons| buttons.borrow_mut().request(client, index, callback))
            .inspect_err(|e| debug!("Button {} request refused: {:?}", index, e))
    }

    pub fn button_release(&self, client: ClientHandle, index: usize) -> Result<()> {
        self.check(Domain::Buttons, client)?;
        self.buttons
            .lock(|buttons| buttons.borrow_mut().release(client, index))
            .inspect_err(|e| debug!("Button {} release refused: {:?}", index, e))
    }

    /// Replace (or clear) the callback of an owned button
    pub fn button_set_callback(
        &self,
        client: ClientHandle,
        index: usize,
        callback: Option<ButtonCallback>,
    ) -> Result<()> {
        self.check(Domain::Buttons, client)?;
        self.buttons
            .lock(|buttons| buttons.borrow_mut().set_callback(client, index, callback))
    }

    /// Read a button's level; ownership is not required
    pub fn button_state(&self, client: ClientHandle, index: usize) -> Result<bool> {
        self.check(Domain::Buttons, client)?;
        self.buttons.lock(|buttons| buttons.borrow().is_pressed(index))
    }

    /// Deliver driver events for a physical button to its owner's callback
    ///
    /// Events for buttons without a callback, or arriving while the module
    /// is down, are discarded.
    pub fn button_event(&self, index: usize, events: ButtonEvents) {
        if self.check_domain(Domain::Buttons).is_err() || events.is_empty() {
            return;
        }
        // Looked up under the lock, called outside it
        let callback = self.buttons.lock(|buttons| buttons.borrow().callback(index));
        match callback {
            Some(callback) => callback(index, events),
            None => trace!("Button {} event without callback", index),
        }
    }

    pub fn led_request(&self, client: ClientHandle, index: usize) -> Result<()> {
        self.check(Domain::Leds, client)?;
        self.leds
            .lock(|leds| leds.borrow_mut().request(client, index))
            .inspect_err(|e| debug!("LED {} request refused: {:?}", index, e))
    }

    /// Hand an LED back; it is switched off
    pub fn led_release(&self, client: ClientHandle, index: usize) -> Result<()> {
        self.check(Domain::Leds, client)?;
        self.leds
            .lock(|leds| leds.borrow_mut().release(client, index))
            .inspect_err(|e| debug!("LED {} release refused: {:?}", index, e))
    }

    pub fn led_on(&self, client: ClientHandle, index: usize, brightness: u8) -> Result<()> {
        self.check(Domain::Leds, client)?;
        self.leds
            .lock(|leds| leds.borrow_mut().on(client, index, brightness))
    }

    pub fn led_off(&self, client: ClientHandle, index: usize) -> Result<()> {
        self.check(Domain::Leds, client)?;
        self.leds.lock(|leds| leds.borrow_mut().off(client, index))
    }

    pub fn led_toggle(&self, client: ClientHandle, index: usize) -> Result<()> {
        self.check(Domain::Leds, client)?;
        self.leds.lock(|leds| leds.borrow_mut().toggle(client, index))
    }

    /// Blink at the configured period
    pub fn led_blink(&self, client: ClientHandle, index: usize, count: BlinkCount) -> Result<()> {
        self.check(Domain::Leds, client)?;
        let period_ms = self.with_config(|config| config.led_blink_period_ms);
        self.leds
            .lock(|leds| leds.borrow_mut().blink(client, index, period_ms, count))
    }

    /// Driver state of an LED; ownership is not required
    pub fn led_state(&self, client: ClientHandle, index: usize) -> Result<LedState> {
        self.check(Domain::Leds, client)?;
        self.leds.lock(|leds| leds.borrow().state(index))
    }

    /// Toggle every LED at the assert period, forever
    pub async fn flash_leds_forever(&self) -> ! {
        let period_ms = self.with_config(|config| config.assert_flash_period_ms);
        let mut delay = self.delay.clone();
        warn!("Flashing LEDs forever");
        loop {
            self.leds.lock(|leds| leds.borrow_mut().toggle_all());
            delay.delay_ms(period_ms).await;
        }
    }
}
