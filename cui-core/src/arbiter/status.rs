//! Status-line operations

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use cui_hal::{Button, Led, SerialTx};

use super::Arbiter;
use crate::client::ClientHandle;
use crate::error::{CuiError, Domain, Result};
use crate::render;
use crate::status::StatusLineId;

/// Value shown on a freshly acquired line
const PLACEHOLDER: &str = "--";

impl<M, T, D, B, L> Arbiter<M, T, D, B, L>
where
    M: RawMutex,
    T: SerialTx,
    D: DelayNs + Clone,
    B: Button,
    L: Led,
{
    /// Reserve a line from the caller's pool and print its placeholder
    pub async fn status_line_request(&self, client: ClientHandle, label: &str) -> Result<StatusLineId> {
        self.check(Domain::Uart, client)?;
        let base_offset = self
            .clients
            .lock(|clients| clients.borrow().status_base_offset(client))
            .ok_or(CuiError::InvalidClientHandle)?;

        let mut status = self.status.lock().await;
        let id = status
            .request(client, base_offset, label)
            .inspect_err(|e| debug!("Status line refused: {:?}", e))?;

        let frame = status.format(client, id, format_args!("{}", PLACEHOLDER))?;
        if let Err(e) = self.writer.write(frame.as_bytes()).await {
            warn!("Placeholder for status line {} dropped: {:?}", id.0, e);
        }
        Ok(id)
    }

    /// Return a line to the caller's pool
    pub async fn status_line_release(&self, client: ClientHandle, id: StatusLineId) -> Result<()> {
        self.check(Domain::Uart, client)?;
        self.status.lock().await.release(client, id)
    }

    /// Print a new value on an acquired line
    ///
    /// Nothing is sent when the value does not fit. Use the
    /// [`status_line!`](crate::status_line) macro for format strings.
    pub async fn status_printf(
        &self,
        client: ClientHandle,
        id: StatusLineId,
        value: fmt::Arguments<'_>,
    ) -> Result<()> {
        self.check(Domain::Uart, client)?;
        let cursor = self.cursor.lock(|cell| cell.get());

        let mut status = self.status.lock().await;
        let frame = status.format(client, id, value)?;
        self.writer.write(frame.as_bytes()).await?;

        if let Some(cursor) = cursor {
            let frame = render::cursor(cursor.row, cursor.col)?;
            self.writer.write(frame.as_bytes()).await?;
        }
        Ok(())
    }
}

/// Print a formatted value on a status line
///
/// ```ignore
/// status_line!(arbiter, client, line, "{}C", temperature).await?;
/// ```
#[macro_export]
macro_rules! status_line {
    ($arbiter:expr, $client:expr, $id:expr, $($arg:tt)*) => {
        $arbiter.status_printf($client, $id, ::core::format_args!($($arg)*))
    };
}
