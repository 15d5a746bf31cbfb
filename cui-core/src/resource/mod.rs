//! Ownership tables for the physical resources
//!
//! Each table holds one slot per hardware resource for the life of the
//! arbiter. Slots are never created or destroyed, only claimed by a client
//! and handed back.

pub mod button;
pub mod led;

pub use button::{ButtonCallback, ButtonTable};
pub use led::LedTable;

use crate::client::ClientHandle;
use crate::error::{CuiError, Result};

/// A driver plus the client currently holding it
#[derive(Debug)]
pub(crate) struct Owned<D> {
    pub driver: D,
    owner: Option<ClientHandle>,
}

impl<D> Owned<D> {
    pub fn new(driver: D) -> Self {
        Self { driver, owner: None }
    }

    pub fn owner(&self) -> Option<ClientHandle> {
        self.owner
    }

    /// Claim a free slot
    pub fn claim(&mut self, client: ClientHandle) -> Result<()> {
        match self.owner {
            Some(_) => Err(CuiError::AlreadyOwned),
            None => {
                self.owner = Some(client);
                Ok(())
            }
        }
    }

    /// Succeeds only for the current owner
    pub fn check_owner(&self, client: ClientHandle) -> Result<()> {
        if self.owner == Some(client) {
            Ok(())
        } else {
            Err(CuiError::NotOwner)
        }
    }

    pub fn free(&mut self) {
        self.owner = None;
    }
}
