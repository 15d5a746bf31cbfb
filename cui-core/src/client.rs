//! Client registry
//!
//! Clients identify themselves once by name and get back a [`ClientHandle`]
//! that every later call presents. The registry only grows; [`close`] on the
//! arbiter is the single full reset.
//!
//! [`close`]: crate::Arbiter::close

use core::hash::Hasher as _;
use core::num::NonZeroU32;

use hash32::{FnvHasher, Hasher as _};
use heapless::{String, Vec};

use crate::config::{MAX_CLIENTS, MAX_CLIENT_NAME_LEN, MAX_STATUS_LINES};
use crate::error::{CuiError, Result};

/// Opaque client identity
///
/// Derived from the FNV-1a hash of the client's name, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClientHandle(NonZeroU32);

impl ClientHandle {
    /// Hash a client name into a handle
    pub fn from_name(name: &str) -> Self {
        let mut hasher = FnvHasher::default();
        hasher.write(name.as_bytes());
        let hash = hasher.finish32();
        // Zero is reserved for "no client"
        Self(NonZeroU32::new(hash).unwrap_or(NonZeroU32::MIN))
    }

    /// Raw handle value
    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

#[derive(Debug, Clone)]
struct ClientEntry {
    handle: ClientHandle,
    name: String<MAX_CLIENT_NAME_LEN>,
    max_status_lines: u8,
}

/// Fixed-capacity table of open clients, in registration order
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Vec<ClientEntry, MAX_CLIENTS>,
}

impl ClientRegistry {
    pub const fn new() -> Self {
        Self { clients: Vec::new() }
    }

    /// Register a client
    ///
    /// Fails with `InvalidParam` for an empty or over-long name, a pool
    /// larger than [`MAX_STATUS_LINES`], or a name that is already open, and
    /// with `HandleCollision` when a different name hashes to a live handle.
    pub fn open(&mut self, name: &str, max_status_lines: usize) -> Result<ClientHandle> {
        if name.is_empty() || max_status_lines > MAX_STATUS_LINES {
            return Err(CuiError::InvalidParam);
        }
        let stored = String::try_from(name).map_err(|_| CuiError::InvalidParam)?;

        if self.clients.is_full() {
            return Err(CuiError::MaxRegistrationsReached);
        }

        let handle = ClientHandle::from_name(name);
        if let Some(existing) = self.clients.iter().find(|c| c.handle == handle) {
            return Err(if existing.name == stored {
                CuiError::InvalidParam
            } else {
                CuiError::HandleCollision
            });
        }

        let entry = ClientEntry {
            handle,
            name: stored,
            max_status_lines: max_status_lines as u8,
        };
        self.clients
            .push(entry)
            .map_err(|_| CuiError::MaxRegistrationsReached)?;

        Ok(handle)
    }

    /// Check that `handle` belongs to an open client
    pub fn validate(&self, handle: ClientHandle) -> Result<()> {
        if self.contains(handle) {
            Ok(())
        } else {
            Err(CuiError::InvalidClientHandle)
        }
    }

    pub fn contains(&self, handle: ClientHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Registration order of a client
    pub fn position(&self, handle: ClientHandle) -> Option<usize> {
        self.clients.iter().position(|c| c.handle == handle)
    }

    pub fn name(&self, handle: ClientHandle) -> Option<&str> {
        self.clients
            .iter()
            .find(|c| c.handle == handle)
            .map(|c| c.name.as_str())
    }

    /// Status-line pool size reserved by a client
    pub fn max_status_lines(&self, handle: ClientHandle) -> Option<usize> {
        self.clients
            .iter()
            .find(|c| c.handle == handle)
            .map(|c| c.max_status_lines as usize)
    }

    /// First status row offset of a client's pool
    ///
    /// Pools are stacked in registration order with one blank separator
    /// row after each: the sum of `(pool size + 1)` over every earlier client.
    pub fn status_base_offset(&self, handle: ClientHandle) -> Option<u16> {
        let position = self.position(handle)?;
        Some(
            self.clients[..position]
                .iter()
                .map(|c| c.max_status_lines as u16 + 1)
                .sum(),
        )
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Drop every client
    pub fn clear(&mut self) {
        self.clients.clear();
    }
}
