//! Error taxonomy shared by every arbiter operation

use core::fmt;

/// Resource domain an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Domain {
    Buttons,
    Leds,
    /// Serial console: menus and status lines
    Uart,
}

/// Errors returned by the arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CuiError {
    /// Index, name or other argument out of range
    InvalidParam,
    /// Handle is not a live client
    InvalidClientHandle,
    /// `init` has not been called (or `close` has)
    ModuleUninitialized,
    /// The arbiter was configured not to manage this domain
    DomainNotManaged(Domain),
    /// Another client holds the resource
    AlreadyOwned,
    /// Caller does not hold the resource it is acting on
    NotOwner,
    /// Status line was never acquired or has been released
    NotAcquired,
    /// Client or menu registry is full
    MaxRegistrationsReached,
    /// Client's status-line pool (or the menu arena) is exhausted
    NoAvailableSlots,
    /// Top-level menu registered without an update function
    MissingUpdateFn,
    /// Different client name hashes to a live handle
    HandleCollision,
    /// Formatted output did not fit its buffer; nothing was written
    BufferOverflow,
    /// Serial driver rejected the write
    Transport,
    /// Previous write still in flight after the retry window; frame dropped
    PrevWriteUnfinished,
    /// Operation cannot be carried out in the current state
    Failure,
}

impl fmt::Display for CuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CuiError::InvalidParam => f.write_str("invalid parameter"),
            CuiError::InvalidClientHandle => f.write_str("invalid client handle"),
            CuiError::ModuleUninitialized => f.write_str("module uninitialized"),
            CuiError::DomainNotManaged(domain) => write!(f, "{:?} not managed", domain),
            CuiError::AlreadyOwned => f.write_str("resource already owned"),
            CuiError::NotOwner => f.write_str("resource not owned by caller"),
            CuiError::NotAcquired => f.write_str("resource not acquired"),
            CuiError::MaxRegistrationsReached => f.write_str("max registrations reached"),
            CuiError::NoAvailableSlots => f.write_str("no available slots"),
            CuiError::MissingUpdateFn => f.write_str("menu has no update function"),
            CuiError::HandleCollision => f.write_str("client handle collision"),
            CuiError::BufferOverflow => f.write_str("buffer overflow"),
            CuiError::Transport => f.write_str("transport failure"),
            CuiError::PrevWriteUnfinished => f.write_str("previous write unfinished"),
            CuiError::Failure => f.write_str("failure"),
        }
    }
}

pub type Result<T> = core::result::Result<T, CuiError>;
