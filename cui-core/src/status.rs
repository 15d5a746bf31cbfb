//! Status-line broker
//!
//! Each client reserves a private pool of lines when it opens. Pools are
//! stacked below the menu in registration order with one blank row between
//! clients, so a line's screen row never changes once assigned.

use heapless::{String, Vec};

use crate::client::ClientHandle;
use crate::config::{
    INITIAL_STATUS_OFFSET, MAX_CLIENTS, MAX_STATUS_LINES, MAX_STATUS_LINE_LABEL_LEN,
    STATUS_LABEL_SEPARATOR,
};
use crate::error::{CuiError, Result};
use crate::render::{self, PingPong, STATUS_FRAME_LEN};

/// Stored label length including the separator
const LABEL_CAPACITY: usize = MAX_STATUS_LINE_LABEL_LEN + STATUS_LABEL_SEPARATOR.len();

/// Line id within the owning client's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLineId(pub u8);

#[derive(Debug, Clone, Default)]
struct StatusLine {
    /// Rows below [`INITIAL_STATUS_OFFSET`]
    offset: u16,
    label: String<LABEL_CAPACITY>,
    acquired: bool,
}

#[derive(Debug)]
struct StatusPool {
    client: ClientHandle,
    lines: Vec<StatusLine, MAX_STATUS_LINES>,
}

/// All clients' status lines plus the output buffers
#[derive(Debug)]
pub struct StatusBroker {
    pools: Vec<StatusPool, MAX_CLIENTS>,
    frames: PingPong<STATUS_FRAME_LEN>,
}

impl Default for StatusBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBroker {
    pub const fn new() -> Self {
        Self {
            pools: Vec::new(),
            frames: PingPong::new(),
        }
    }

    /// Create the pool for a newly opened client
    pub fn add_pool(&mut self, client: ClientHandle, size: usize) -> Result<()> {
        let mut lines = Vec::new();
        for _ in 0..size {
            lines
                .push(StatusLine::default())
                .map_err(|_| CuiError::InvalidParam)?;
        }
        self.pools
            .push(StatusPool { client, lines })
            .map_err(|_| CuiError::MaxRegistrationsReached)
    }

    fn pool_mut(&mut self, client: ClientHandle) -> Result<&mut StatusPool> {
        self.pools
            .iter_mut()
            .find(|p| p.client == client)
            .ok_or(CuiError::InvalidClientHandle)
    }

    fn pool(&self, client: ClientHandle) -> Result<&StatusPool> {
        self.pools
            .iter()
            .find(|p| p.client == client)
            .ok_or(CuiError::InvalidClientHandle)
    }

    /// Reserve the first free line of a client's pool
    ///
    /// `base_offset` is the client's first row below the menu, see
    /// [`ClientRegistry::status_base_offset`](crate::client::ClientRegistry::status_base_offset).
    pub fn request(
        &mut self,
        client: ClientHandle,
        base_offset: u16,
        label: &str,
    ) -> Result<StatusLineId> {
        if label.len() > MAX_STATUS_LINE_LABEL_LEN {
            return Err(CuiError::InvalidParam);
        }

        let pool = self.pool_mut(client)?;
        let (slot, line) = pool
            .lines
            .iter_mut()
            .enumerate()
            .find(|(_, line)| !line.acquired)
            .ok_or(CuiError::NoAvailableSlots)?;

        line.label.clear();
        line.label
            .push_str(label)
            .and_then(|_| line.label.push_str(STATUS_LABEL_SEPARATOR))
            .map_err(|_| CuiError::InvalidParam)?;
        line.offset = base_offset + slot as u16;
        line.acquired = true;

        Ok(StatusLineId(slot as u8))
    }

    /// Return a line to its pool
    pub fn release(&mut self, client: ClientHandle, id: StatusLineId) -> Result<()> {
        let line = self
            .pool_mut(client)?
            .lines
            .get_mut(id.0 as usize)
            .ok_or(CuiError::InvalidParam)?;
        if !line.acquired {
            return Err(CuiError::NotAcquired);
        }
        line.acquired = false;
        Ok(())
    }

    fn acquired_line(&self, client: ClientHandle, id: StatusLineId) -> Result<&StatusLine> {
        let line = self
            .pool(client)?
            .lines
            .get(id.0 as usize)
            .ok_or(CuiError::InvalidParam)?;
        if line.acquired {
            Ok(line)
        } else {
            Err(CuiError::NotAcquired)
        }
    }

    /// Absolute terminal row of an acquired line
    pub fn row(&self, client: ClientHandle, id: StatusLineId) -> Result<u16> {
        let line = self.acquired_line(client, id)?;
        Ok(INITIAL_STATUS_OFFSET + line.offset)
    }

    /// Format a line update into the next frame buffer
    pub fn format(
        &mut self,
        client: ClientHandle,
        id: StatusLineId,
        value: core::fmt::Arguments<'_>,
    ) -> Result<&str> {
        let line = self.acquired_line(client, id)?;
        let row = INITIAL_STATUS_OFFSET + line.offset;
        let label = line.label.clone();
        render::status(&mut self.frames, row, &label, value)
    }

    /// Format an assert message into the next frame buffer
    pub fn alert(&mut self, message: &str) -> Result<&str> {
        render::alert(&mut self.frames, message)
    }

    /// Drop every pool
    pub fn clear(&mut self) {
        self.pools.clear();
    }
}
