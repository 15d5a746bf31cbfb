//! Button sampling task
//!
//! Samples the pin every few milliseconds (which also debounces it),
//! classifies presses and hands the events to the arbiter.

use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};

use cui_hal::{ButtonEvent, ButtonEvents};

use crate::board::ButtonLink;
use crate::CUI;

const SAMPLE_INTERVAL_MS: u64 = 10;

/// Second click within this window counts as a double click
const DOUBLE_CLICK_MS: u64 = 300;

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(
    index: usize,
    pin: Input<'static>,
    link: &'static ButtonLink,
    long_press_ms: u32,
) {
    let cui = CUI.get().await;
    let long_press = Duration::from_millis(u64::from(long_press_ms));
    let double_click = Duration::from_millis(DOUBLE_CLICK_MS);

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let mut pressed_at: Option<Instant> = None;
    let mut long_sent = false;
    let mut last_click: Option<Instant> = None;

    loop {
        ticker.next().await;
        // Active low with pull-up
        let pressed = pin.is_low();
        let now = Instant::now();

        let events = match (pressed, pressed_at) {
            (true, None) => {
                pressed_at = Some(now);
                long_sent = false;
                link.set_pressed(true);
                ButtonEvents::only(ButtonEvent::Pressed)
            }
            (true, Some(start)) if !long_sent && now - start >= long_press => {
                long_sent = true;
                ButtonEvents::only(ButtonEvent::LongPressed)
            }
            (false, Some(_)) => {
                pressed_at = None;
                link.set_pressed(false);
                let released = ButtonEvents::only(ButtonEvent::Released);
                if long_sent {
                    released.with(ButtonEvent::LongClicked)
                } else if last_click.is_some_and(|at| now - at <= double_click) {
                    last_click = None;
                    released
                        .with(ButtonEvent::Clicked)
                        .with(ButtonEvent::DoubleClicked)
                } else {
                    last_click = Some(now);
                    released.with(ButtonEvent::Clicked)
                }
            }
            _ => continue,
        };

        cui.button_event(index, events);
    }
}
