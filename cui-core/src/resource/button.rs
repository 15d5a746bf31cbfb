//! Button ownership table

use cui_hal::{Button, ButtonEvents};
use heapless::Vec;

use super::Owned;
use crate::client::ClientHandle;
use crate::config::MAX_BUTTONS;
use crate::error::{CuiError, Result};

/// Called with the physical button index and the events that fired
pub type ButtonCallback = fn(usize, ButtonEvents);

#[derive(Debug)]
struct ButtonSlot<B> {
    resource: Owned<B>,
    callback: Option<ButtonCallback>,
}

/// Buttons and their owners
pub struct ButtonTable<B> {
    slots: Vec<ButtonSlot<B>, MAX_BUTTONS>,
}

impl<B: Button> ButtonTable<B> {
    /// Wrap the board's button drivers; index `i` is `drivers[i]`
    pub fn new(drivers: Vec<B, MAX_BUTTONS>) -> Self {
        let mut slots = Vec::new();
        for driver in drivers {
            // Same capacity as `drivers`
            let _ = slots.push(ButtonSlot {
                resource: Owned::new(driver),
                callback: None,
            });
        }
        Self { slots }
    }

    fn slot(&self, index: usize) -> Result<&ButtonSlot<B>> {
        self.slots.get(index).ok_or(CuiError::InvalidParam)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ButtonSlot<B>> {
        self.slots.get_mut(index).ok_or(CuiError::InvalidParam)
    }

    /// Claim a button, optionally registering its callback at the same time
    pub fn request(
        &mut self,
        client: ClientHandle,
        index: usize,
        callback: Option<ButtonCallback>,
    ) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.resource.claim(client)?;
        slot.callback = callback;
        Ok(())
    }

    /// Hand a button back; the callback is dropped with it
    pub fn release(&mut self, client: ClientHandle, index: usize) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.resource.check_owner(client)?;
        slot.resource.free();
        slot.callback = None;
        Ok(())
    }

    pub fn set_callback(
        &mut self,
        client: ClientHandle,
        index: usize,
        callback: Option<ButtonCallback>,
    ) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.resource.check_owner(client)?;
        slot.callback = callback;
        Ok(())
    }

    /// Current level of a button; any client may read it
    pub fn is_pressed(&self, index: usize) -> Result<bool> {
        Ok(self.slot(index)?.resource.driver.is_pressed())
    }

    /// Callback registered for a physical index
    pub fn callback(&self, index: usize) -> Option<ButtonCallback> {
        self.slots.get(index).and_then(|slot| slot.callback)
    }

    pub fn owner(&self, index: usize) -> Option<ClientHandle> {
        self.slots.get(index).and_then(|slot| slot.resource.owner())
    }

    /// Release every button regardless of owner
    pub fn release_all(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.resource.free();
            slot.callback = None;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
