//! Button monitor client
//!
//! Owns the first button and the second LED, counts button events and
//! mirrors presses on the LED.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, AtomicU8, Ordering};

use cui_core::{status_line, ClientHandle, ItemSpec, MenuSpec};
use cui_hal::{ButtonEvent, ButtonEvents};

use crate::CUI;

const NAME: &str = "Monitor";
const BUTTON: usize = 0;
const LED: usize = 1;

static CLICKS: AtomicU32 = AtomicU32::new(0);
static LONG_CLICKS: AtomicU32 = AtomicU32::new(0);
static LAST_EVENTS: AtomicU8 = AtomicU8::new(0);

static UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
static REDRAW: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static MENU: MenuSpec = MenuSpec::new(
    " Buttons ",
    Some(request_update),
    &[
        ItemSpec::action("< RESET COUNT >", reset_count),
        ItemSpec::action("< LED >", toggle_led),
    ],
);

fn request_update() {
    UPDATE.signal(());
}

/// Runs in the button task's context
fn on_button(_index: usize, events: ButtonEvents) {
    LAST_EVENTS.store(events.bits(), Ordering::Relaxed);
    if events.contains(ButtonEvent::Clicked) {
        CLICKS.fetch_add(1, Ordering::Relaxed);
    }
    if events.contains(ButtonEvent::LongClicked) {
        LONG_CLICKS.fetch_add(1, Ordering::Relaxed);
    }

    if let Some(cui) = CUI.try_get() {
        let client = ClientHandle::from_name(NAME);
        let result = if events.contains(ButtonEvent::Pressed) {
            cui.led_on(client, LED, u8::MAX)
        } else if events.contains(ButtonEvent::Released) {
            cui.led_off(client, LED)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            debug!("Monitor LED: {:?}", e);
        }
    }
    REDRAW.signal(());
}

fn reset_count(_index: usize) {
    CLICKS.store(0, Ordering::Relaxed);
    LONG_CLICKS.store(0, Ordering::Relaxed);
    REDRAW.signal(());
}

fn toggle_led(_index: usize) {
    if let Some(cui) = CUI.try_get() {
        if let Err(e) = cui.led_toggle(ClientHandle::from_name(NAME), LED) {
            warn!("Monitor LED toggle failed: {:?}", e);
        }
    }
}

#[embassy_executor::task]
pub async fn monitor_task() {
    let cui = CUI.get().await;

    let client = match cui.open_client(NAME, 1).await {
        Ok(client) => client,
        Err(e) => {
            error!("Monitor client refused: {:?}", e);
            return;
        }
    };

    if let Err(e) = cui.button_request(client, BUTTON, Some(on_button)) {
        warn!("Monitor button unavailable: {:?}", e);
    }
    if let Err(e) = cui.led_request(client, LED) {
        warn!("Monitor LED unavailable: {:?}", e);
    }
    if let Err(e) = cui.register_menu(client, &MENU).await {
        warn!("Monitor menu refused: {:?}", e);
    }
    let line = match cui.status_line_request(client, "Button").await {
        Ok(id) => id,
        Err(e) => {
            warn!("Button line refused: {:?}", e);
            return;
        }
    };

    info!("Monitor client running");
    loop {
        match select(UPDATE.wait(), REDRAW.wait()).await {
            Either::First(()) => {
                if let Err(e) = cui.process_menu_update().await {
                    warn!("Menu update failed: {:?}", e);
                }
            }
            Either::Second(()) => {
                let held = cui.button_state(client, BUTTON).unwrap_or(false);
                let result = status_line!(
                    cui,
                    client,
                    line,
                    "{} clicks, {} long, {} (last {:#04x})",
                    CLICKS.load(Ordering::Relaxed),
                    LONG_CLICKS.load(Ordering::Relaxed),
                    if held { "held" } else { "up" },
                    LAST_EVENTS.load(Ordering::Relaxed)
                )
                .await;
                if let Err(e) = result {
                    debug!("Button print dropped: {:?}", e);
                }
            }
        }
    }
}
