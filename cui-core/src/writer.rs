//! Serial transport writer
//!
//! One write may be outstanding at a time. A new write waits for the
//! previous one to complete, bounded by the configured timeout; when the
//! bound expires the new frame is dropped and `PrevWriteUnfinished` is
//! returned, so a stalled transport can never block a caller forever.
//!
//! Completion is reported by the driver through [`SerialWriter::write_complete`],
//! which only touches a critical-section flag and a signal and is therefore
//! safe to call from an interrupt handler.

use core::cell::Cell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::CriticalSectionMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

use cui_hal::SerialTx;

use crate::error::{CuiError, Result};

struct Port<T, D> {
    tx: T,
    delay: D,
}

/// Bounded-retry writer over a [`SerialTx`]
pub struct SerialWriter<M: RawMutex, T: SerialTx, D: DelayNs> {
    port: Mutex<M, Port<T, D>>,
    idle: CriticalSectionMutex<Cell<bool>>,
    done: Signal<CriticalSectionRawMutex, ()>,
    timeout_ms: CriticalSectionMutex<Cell<u32>>,
}

impl<M: RawMutex, T: SerialTx, D: DelayNs> SerialWriter<M, T, D> {
    pub fn new(tx: T, delay: D, timeout_ms: u32) -> Self {
        Self {
            port: Mutex::new(Port { tx, delay }),
            idle: CriticalSectionMutex::new(Cell::new(true)),
            done: Signal::new(),
            timeout_ms: CriticalSectionMutex::new(Cell::new(timeout_ms)),
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms.lock(|timeout| timeout.get())
    }

    /// Applies from the next write that has to wait
    pub fn set_timeout_ms(&self, timeout_ms: u32) {
        self.timeout_ms.lock(|timeout| timeout.set(timeout_ms));
    }

    /// No write is outstanding
    pub fn is_idle(&self) -> bool {
        self.idle.lock(|idle| idle.get())
    }

    /// Transmit one frame
    pub async fn write(&self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        let mut port = self.port.lock().await;

        if !self.is_idle() {
            let timeout_ms = self.timeout_ms();
            let Port { delay, .. } = &mut *port;
            if let Either::Second(()) = select(self.wait_idle(), delay.delay_ms(timeout_ms)).await {
                warn!("Previous write unfinished, dropping {} bytes", bytes.len());
                return Err(CuiError::PrevWriteUnfinished);
            }
        }

        self.done.reset();
        self.idle.lock(|idle| idle.set(false));

        if port.tx.start_write(bytes).is_err() {
            self.idle.lock(|idle| idle.set(true));
            error!("Serial driver rejected write");
            return Err(CuiError::Transport);
        }

        trace!("Write started, {} bytes", bytes.len());
        Ok(())
    }

    /// Report that the outstanding write has completed
    pub fn write_complete(&self) {
        self.idle.lock(|idle| idle.set(true));
        self.done.signal(());
    }

    async fn wait_idle(&self) {
        while !self.is_idle() {
            self.done.wait().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use heapless::Vec;

    struct RecordingTx<'a> {
        written: &'a RefCell<Vec<u8, 64>>,
        fail: bool,
    }

    impl SerialTx for RecordingTx<'_> {
        type Error = ();

        fn start_write(&mut self, data: &[u8]) -> core::result::Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.borrow_mut().extend_from_slice(data).map_err(|_| ())
        }
    }

    /// Every delay elapses immediately
    struct InstantDelay;

    impl DelayNs for InstantDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    fn writer(written: &RefCell<Vec<u8, 64>>, fail: bool) -> SerialWriter<NoopRawMutex, RecordingTx<'_>, InstantDelay> {
        SerialWriter::new(RecordingTx { written, fail }, InstantDelay, 100)
    }

    #[test]
    fn test_write_marks_busy() {
        let written = RefCell::new(Vec::new());
        let writer = writer(&written, false);

        block_on(writer.write(b"abc")).unwrap();
        assert!(!writer.is_idle());
        assert_eq!(written.borrow().as_slice(), b"abc");

        writer.write_complete();
        assert!(writer.is_idle());
    }

    #[test]
    fn test_unfinished_write_drops_frame() {
        let written = RefCell::new(Vec::new());
        let writer = writer(&written, false);

        block_on(writer.write(b"one")).unwrap();
        assert_eq!(
            block_on(writer.write(b"two")),
            Err(CuiError::PrevWriteUnfinished)
        );
        assert_eq!(written.borrow().as_slice(), b"one");

        writer.write_complete();
        block_on(writer.write(b"two")).unwrap();
        assert_eq!(written.borrow().as_slice(), b"onetwo");
    }

    #[test]
    fn test_driver_error_leaves_writer_idle() {
        let written = RefCell::new(Vec::new());
        let writer = writer(&written, true);

        assert_eq!(block_on(writer.write(b"x")), Err(CuiError::Transport));
        assert!(writer.is_idle());
    }

    #[test]
    fn test_empty_write_is_noop() {
        let written = RefCell::new(Vec::new());
        let writer = writer(&written, true);

        block_on(writer.write(b"")).unwrap();
        assert!(writer.is_idle());
    }

    #[test]
    fn test_timeout_can_be_changed() {
        let written = RefCell::new(Vec::new());
        let writer = writer(&written, false);
        assert_eq!(writer.timeout_ms(), 100);

        writer.set_timeout_ms(250);
        assert_eq!(writer.timeout_ms(), 250);
    }
}
