//! LED pin task
//!
//! Executes the commands the arbiter's LED handles send, including timed
//! blinking. A new command interrupts a blink immediately.

use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Timer};

use cui_hal::{BlinkCount, LedState};

use crate::board::{LedCommand, LedLink};

#[embassy_executor::task(pool_size = 2)]
pub async fn led_task(mut pin: Output<'static>, link: &'static LedLink) {
    let mut command = link.next_command().await;
    loop {
        command = match command {
            LedCommand::On => {
                pin.set_high();
                link.next_command().await
            }
            LedCommand::Off => {
                pin.set_low();
                link.next_command().await
            }
            LedCommand::Blink { period_ms, count } => {
                match blink(&mut pin, link, period_ms, count).await {
                    Some(next) => next,
                    None => {
                        link.set_state(LedState::Off);
                        link.next_command().await
                    }
                }
            }
        };
    }
}

/// Blink until done (`None`) or interrupted by a new command
async fn blink(
    pin: &mut Output<'static>,
    link: &LedLink,
    period_ms: u32,
    count: BlinkCount,
) -> Option<LedCommand> {
    let half = Duration::from_millis(u64::from(period_ms / 2).max(1));
    let mut remaining = match count {
        BlinkCount::Times(n) => Some(n),
        BlinkCount::Continuous => None,
    };

    loop {
        if remaining == Some(0) {
            pin.set_low();
            return None;
        }

        pin.set_high();
        if let Either::First(next) = select(link.next_command(), Timer::after(half)).await {
            return Some(next);
        }
        pin.set_low();
        if let Either::First(next) = select(link.next_command(), Timer::after(half)).await {
            return Some(next);
        }

        if let Some(n) = remaining.as_mut() {
            *n -= 1;
        }
    }
}
