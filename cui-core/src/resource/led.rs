//! LED ownership table

use cui_hal::{BlinkCount, Led, LedState};
use heapless::Vec;

use super::Owned;
use crate::client::ClientHandle;
use crate::config::MAX_LEDS;
use crate::error::{CuiError, Result};

/// LEDs and their owners
pub struct LedTable<L> {
    slots: Vec<Owned<L>, MAX_LEDS>,
}

impl<L: Led> LedTable<L> {
    /// Wrap the board's LED drivers; index `i` is `drivers[i]`
    pub fn new(drivers: Vec<L, MAX_LEDS>) -> Self {
        let mut slots = Vec::new();
        for driver in drivers {
            let _ = slots.push(Owned::new(driver));
        }
        Self { slots }
    }

    fn owned_mut(&mut self, client: ClientHandle, index: usize) -> Result<&mut L> {
        let slot = self.slots.get_mut(index).ok_or(CuiError::InvalidParam)?;
        slot.check_owner(client)?;
        Ok(&mut slot.driver)
    }

    pub fn request(&mut self, client: ClientHandle, index: usize) -> Result<()> {
        self.slots
            .get_mut(index)
            .ok_or(CuiError::InvalidParam)?
            .claim(client)
    }

    /// Hand an LED back, switching it off
    pub fn release(&mut self, client: ClientHandle, index: usize) -> Result<()> {
        let led = self.owned_mut(client, index)?;
        stop_if_blinking(led);
        led.off();
        if let Some(slot) = self.slots.get_mut(index) {
            slot.free();
        }
        Ok(())
    }

    pub fn on(&mut self, client: ClientHandle, index: usize, brightness: u8) -> Result<()> {
        let led = self.owned_mut(client, index)?;
        stop_if_blinking(led);
        led.on(brightness);
        Ok(())
    }

    pub fn off(&mut self, client: ClientHandle, index: usize) -> Result<()> {
        let led = self.owned_mut(client, index)?;
        stop_if_blinking(led);
        led.off();
        Ok(())
    }

    pub fn toggle(&mut self, client: ClientHandle, index: usize) -> Result<()> {
        let led = self.owned_mut(client, index)?;
        stop_if_blinking(led);
        led.toggle();
        Ok(())
    }

    pub fn blink(
        &mut self,
        client: ClientHandle,
        index: usize,
        period_ms: u32,
        count: BlinkCount,
    ) -> Result<()> {
        self.owned_mut(client, index)?
            .start_blinking(period_ms, count);
        Ok(())
    }

    /// Driver state of an LED; any client may read it
    pub fn state(&self, index: usize) -> Result<LedState> {
        self.slots
            .get(index)
            .map(|slot| slot.driver.state())
            .ok_or(CuiError::InvalidParam)
    }

    pub fn owner(&self, index: usize) -> Option<ClientHandle> {
        self.slots.get(index).and_then(|slot| slot.owner())
    }

    /// Switch every LED off and release it regardless of owner
    pub fn release_all(&mut self) {
        for slot in self.slots.iter_mut() {
            stop_if_blinking(&mut slot.driver);
            slot.driver.off();
            slot.free();
        }
    }

    /// Toggle every LED, owned or not; used by the assert flash
    pub fn toggle_all(&mut self) {
        for slot in self.slots.iter_mut() {
            stop_if_blinking(&mut slot.driver);
            slot.driver.toggle();
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn stop_if_blinking<L: Led>(led: &mut L) {
    if led.is_blinking() {
        led.stop_blinking();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeLed {
        state: Option<LedState>,
        brightness: u8,
        stops: u8,
    }

    impl Led for FakeLed {
        fn on(&mut self, brightness: u8) {
            self.brightness = brightness;
            self.state = Some(LedState::On);
        }
        fn off(&mut self) {
            self.state = Some(LedState::Off);
        }
        fn toggle(&mut self) {
            if self.state() == LedState::On {
                self.off();
            } else {
                self.on(255);
            }
        }
        fn start_blinking(&mut self, _period_ms: u32, _count: BlinkCount) {
            self.state = Some(LedState::Blinking);
        }
        fn stop_blinking(&mut self) {
            self.stops += 1;
            self.state = Some(LedState::Off);
        }
        fn state(&self) -> LedState {
            self.state.unwrap_or(LedState::Off)
        }
    }

    fn table() -> LedTable<FakeLed> {
        let mut drivers = Vec::new();
        drivers.push(FakeLed::default()).ok();
        drivers.push(FakeLed::default()).ok();
        LedTable::new(drivers)
    }

    #[test]
    fn test_actions_require_ownership() {
        let a = ClientHandle::from_name("A");
        let b = ClientHandle::from_name("B");
        let mut leds = table();

        assert_eq!(leds.on(a, 0, 255), Err(CuiError::NotOwner));
        leds.request(a, 0).unwrap();
        assert!(leds.on(a, 0, 128).is_ok());
        assert_eq!(leds.off(b, 0), Err(CuiError::NotOwner));
        assert_eq!(leds.state(0), Ok(LedState::On));
    }

    #[test]
    fn test_steady_state_cancels_blink() {
        let a = ClientHandle::from_name("A");
        let mut leds = table();
        leds.request(a, 1).unwrap();

        leds.blink(a, 1, 500, BlinkCount::Continuous).unwrap();
        assert_eq!(leds.state(1), Ok(LedState::Blinking));

        leds.on(a, 1, 255).unwrap();
        assert_eq!(leds.state(1), Ok(LedState::On));
        assert_eq!(leds.slots[1].driver.stops, 1);

        // Not blinking any more: no second stop
        leds.toggle(a, 1).unwrap();
        assert_eq!(leds.slots[1].driver.stops, 1);
        assert_eq!(leds.state(1), Ok(LedState::Off));
    }

    #[test]
    fn test_release_switches_off() {
        let a = ClientHandle::from_name("A");
        let mut leds = table();
        leds.request(a, 0).unwrap();
        leds.on(a, 0, 255).unwrap();

        leds.release(a, 0).unwrap();
        assert_eq!(leds.state(0), Ok(LedState::Off));
        assert_eq!(leds.owner(0), None);
    }

    #[test]
    fn test_release_by_non_owner() {
        let a = ClientHandle::from_name("A");
        let b = ClientHandle::from_name("B");
        let mut leds = table();
        leds.request(a, 0).unwrap();
        leds.on(a, 0, 255).unwrap();

        assert_eq!(leds.release(b, 0), Err(CuiError::NotOwner));
        assert_eq!(leds.owner(0), Some(a));
        assert_eq!(leds.state(0), Ok(LedState::On));
    }

    #[test]
    fn test_release_all() {
        let a = ClientHandle::from_name("A");
        let mut leds = table();
        leds.request(a, 0).unwrap();
        leds.request(a, 1).unwrap();
        leds.blink(a, 1, 100, BlinkCount::Times(3)).unwrap();

        leds.release_all();
        assert_eq!(leds.owner(0), None);
        assert_eq!(leds.owner(1), None);
        assert_eq!(leds.state(1), Ok(LedState::Off));
    }
}
