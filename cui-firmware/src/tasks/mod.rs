//! Embassy async tasks
//!
//! Hardware tasks own the pins and the UART; client tasks talk to the
//! arbiter only through its public calls.

pub mod buttons;
pub mod demo;
pub mod leds;
pub mod monitor;
pub mod serial;

pub use buttons::button_task;
pub use demo::demo_task;
pub use leds::led_task;
pub use monitor::monitor_task;
pub use serial::{serial_rx_task, serial_tx_task};
