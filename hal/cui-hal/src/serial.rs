//! Serial transmit abstraction
//!
//! The console transport accepts one write at a time. `start_write` hands
//! the bytes to the driver and returns immediately; the driver later reports
//! completion out of band (from its interrupt handler or tx task), which the
//! arbiter tracks with its own completion flag.

/// Serial transmitter with a single outstanding write
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission
    ///
    /// Returns once the driver has taken the bytes, or an error if the
    /// driver is busy or failed. The caller must not reuse the driver until
    /// completion has been reported.
    fn start_write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}
