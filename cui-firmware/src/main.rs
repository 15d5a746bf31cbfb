//! CUI demo firmware
//!
//! Runs the combined user interface on an RP2040 board: the serial console
//! on UART0, two buttons and two LEDs, shared by a demo client and a button
//! monitor client.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cui_core::{Arbiter, CuiConfig, Parts};

use crate::board::{BoardButton, BoardLed, ButtonLink, LedLink, PipeTx, TimerDelay};
use crate::config::parse_config;

mod board;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit cui.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../cui.toml");

/// The arbiter as wired on this board
pub type Cui = Arbiter<CriticalSectionRawMutex, PipeTx, TimerDelay, BoardButton, BoardLed>;

/// Set once in `main`; tasks and menu callbacks reach the arbiter here
pub static CUI: OnceLock<Cui> = OnceLock::new();

static BUTTON_LINKS: [ButtonLink; 2] = [ButtonLink::new(), ButtonLink::new()];
static LED_LINKS: [LedLink; 2] = [LedLink::new(), LedLink::new()];

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("CUI firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let long_press_ms = config.button_long_press_ms;

    // Console UART
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    // Buttons are active low
    let button_pins = [Input::new(p.PIN_14, Pull::Up), Input::new(p.PIN_13, Pull::Up)];
    // PIN_25 is the on-board LED
    let led_pins = [
        Output::new(p.PIN_25, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    ];

    let buttons: Vec<BoardButton, { cui_core::config::MAX_BUTTONS }> =
        BUTTON_LINKS.iter().map(BoardButton::new).collect();
    let leds: Vec<BoardLed, { cui_core::config::MAX_LEDS }> =
        LED_LINKS.iter().map(BoardLed::new).collect();

    let parts = Parts {
        tx: PipeTx,
        delay: TimerDelay,
        buttons,
        leds,
    };
    if CUI.init(Arbiter::new(config, parts)).is_err() {
        error!("CUI already set");
    }
    let cui = CUI.get().await;

    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    for (index, (pin, link)) in button_pins.into_iter().zip(&BUTTON_LINKS).enumerate() {
        spawner
            .spawn(tasks::button_task(index, pin, link, long_press_ms))
            .unwrap();
    }
    for (pin, link) in led_pins.into_iter().zip(&LED_LINKS) {
        spawner.spawn(tasks::led_task(pin, link)).unwrap();
    }

    if let Err(e) = cui.init().await {
        error!("CUI init failed: {:?}", e);
        cui.assert("CUI init failed", true).await;
    }
    info!("CUI initialized");

    spawner.spawn(tasks::demo_task()).unwrap();
    spawner.spawn(tasks::monitor_task()).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the cui.toml embedded at compile time
///
/// build.rs has validated the file, so the fallback only covers parser
/// disagreements during development.
fn load_config() -> CuiConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            CuiConfig::default()
        }
    }
}
