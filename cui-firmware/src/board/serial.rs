//! Console transmit path
//!
//! `start_write` drops the whole frame into a pipe or refuses it; the
//! serial tx task drains the pipe into the UART and reports completion.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;

use cui_hal::SerialTx;

/// Large enough for one menu frame
pub const TX_PIPE_SIZE: usize = 1024;

/// Bytes waiting for the UART
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// The frame does not fit in the pipe
    Busy,
}

/// [`SerialTx`] that queues into [`TX_PIPE`]
pub struct PipeTx;

impl SerialTx for PipeTx {
    type Error = TxError;

    fn start_write(&mut self, data: &[u8]) -> Result<(), TxError> {
        if TX_PIPE.capacity() - TX_PIPE.len() < data.len() {
            return Err(TxError::Busy);
        }
        match TX_PIPE.try_write(data) {
            Ok(n) if n == data.len() => Ok(()),
            _ => Err(TxError::Busy),
        }
    }
}
