//! Console UART tasks

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use cui_core::config::INPUT_CHUNK_LEN;

use crate::board::TX_PIPE;
use crate::CUI;

/// Bytes moved from the pipe to the UART per write
const TX_CHUNK: usize = 64;

/// Drain queued frames into the UART and report completion
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    let cui = CUI.get().await;
    info!("Serial TX task started");

    let mut buf = [0u8; TX_CHUNK];
    loop {
        let n = TX_PIPE.read(&mut buf).await;
        if let Err(e) = tx.write_all(&buf[..n]).await {
            warn!("UART write error: {:?}", e);
        }
        // One frame is one outstanding write
        if TX_PIPE.is_empty() {
            cui.write_complete();
        }
    }
}

/// Feed received chunks to the menu engine
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    let cui = CUI.get().await;
    info!("Serial RX task started");

    let mut buf = [0u8; INPUT_CHUNK_LEN];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                cui.receive_input(&buf[..n]);
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                cui.receive_input(&[]);
            }
        }
    }
}
