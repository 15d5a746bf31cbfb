//! Button and LED arbitration through the arbiter

mod common;

use std::cell::RefCell;

use common::{arbiter, running};
use cui_core::{ClientHandle, CuiConfig, CuiError, Domain};
use cui_hal::{BlinkCount, ButtonEvent, ButtonEvents, LedState};
use embassy_futures::block_on;

thread_local! {
    static EVENTS: RefCell<Vec<(usize, ButtonEvents)>> = const { RefCell::new(Vec::new()) };
}

fn record(index: usize, events: ButtonEvents) {
    EVENTS.with(|e| e.borrow_mut().push((index, events)));
}

fn recorded() -> Vec<(usize, ButtonEvents)> {
    EVENTS.with(|e| e.borrow().clone())
}

#[test]
fn test_validation_order() {
    let config = CuiConfig {
        manage_leds: false,
        ..Default::default()
    };
    let (cui, _board) = arbiter(config);
    let ghost = ClientHandle::from_name("ghost");

    // Unmanaged wins over uninitialized
    assert_eq!(
        cui.led_request(ghost, 0),
        Err(CuiError::DomainNotManaged(Domain::Leds))
    );
    // Uninitialized wins over a bad handle
    assert_eq!(cui.button_request(ghost, 0, None), Err(CuiError::ModuleUninitialized));

    block_on(cui.init()).unwrap();
    assert_eq!(
        cui.button_request(ghost, 0, None),
        Err(CuiError::InvalidClientHandle)
    );
    assert_eq!(
        cui.led_request(ghost, 0),
        Err(CuiError::DomainNotManaged(Domain::Leds))
    );
}

#[test]
fn test_double_init_and_open_before_init() {
    let (cui, _board) = arbiter(CuiConfig::default());
    assert_eq!(
        block_on(cui.open_client("early", 0)),
        Err(CuiError::ModuleUninitialized)
    );
    block_on(cui.init()).unwrap();
    assert_eq!(block_on(cui.init()), Err(CuiError::Failure));
}

#[test]
fn test_led_ownership() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();

    cui.led_request(a, 0).unwrap();
    assert_eq!(cui.led_request(b, 0), Err(CuiError::AlreadyOwned));
    assert_eq!(cui.led_on(b, 0, 255), Err(CuiError::NotOwner));
    assert_eq!(cui.led_release(b, 0), Err(CuiError::NotOwner));
    assert_eq!(cui.led_request(a, 7), Err(CuiError::InvalidParam));

    cui.led_on(a, 0, 128).unwrap();
    assert_eq!(board.led(0).state, LedState::On);
    assert_eq!(board.led(0).brightness, 128);

    // Release switches the LED off and frees it for anyone
    cui.led_release(a, 0).unwrap();
    assert_eq!(board.led(0).state, LedState::Off);
    cui.led_request(b, 0).unwrap();
}

#[test]
fn test_blink_uses_configured_period_and_on_cancels_it() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    cui.led_request(a, 1).unwrap();

    cui.led_blink(a, 1, BlinkCount::Continuous).unwrap();
    assert_eq!(board.led(1).state, LedState::Blinking);
    assert_eq!(board.led(1).period_ms, 500);
    assert_eq!(cui.led_state(a, 1), Ok(LedState::Blinking));

    cui.led_on(a, 1, 255).unwrap();
    assert_eq!(board.led(1).state, LedState::On);

    cui.led_toggle(a, 1).unwrap();
    assert_eq!(board.led(1).state, LedState::Off);
}

#[test]
fn test_led_state_needs_no_ownership() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();
    cui.led_request(a, 0).unwrap();
    cui.led_on(a, 0, 1).unwrap();

    assert_eq!(cui.led_state(b, 0), Ok(LedState::On));
}

#[test]
fn test_button_callback_dispatch() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();

    cui.button_request(a, 1, Some(record)).unwrap();
    assert_eq!(
        cui.button_set_callback(b, 1, None),
        Err(CuiError::NotOwner)
    );

    let click = ButtonEvents::only(ButtonEvent::Released).with(ButtonEvent::Clicked);
    cui.button_event(1, click);
    // No callback on button 0
    cui.button_event(0, click);
    assert_eq!(recorded(), vec![(1, click)]);

    cui.button_release(a, 1).unwrap();
    cui.button_event(1, click);
    assert_eq!(recorded().len(), 1);
}

#[test]
fn test_button_state_reads_hardware() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();

    assert_eq!(cui.button_state(a, 0), Ok(false));
    board.buttons[0].set(true);
    assert_eq!(cui.button_state(a, 0), Ok(true));
    assert_eq!(cui.button_state(a, 5), Err(CuiError::InvalidParam));
}

#[test]
fn test_close_releases_everything() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 1)).unwrap();
    cui.led_request(a, 0).unwrap();
    cui.led_on(a, 0, 255).unwrap();
    cui.button_request(a, 0, Some(record)).unwrap();

    block_on(cui.close()).unwrap();
    assert_eq!(board.led(0).state, LedState::Off);
    assert!(!cui.is_initialized());
    assert_eq!(cui.led_request(a, 0), Err(CuiError::ModuleUninitialized));
    assert_eq!(block_on(cui.close()), Err(CuiError::ModuleUninitialized));

    // Fresh start: old handle is gone, resources are free
    block_on(cui.init()).unwrap();
    assert_eq!(cui.led_request(a, 0), Err(CuiError::InvalidClientHandle));
    let b = block_on(cui.open_client("B", 0)).unwrap();
    cui.led_request(b, 0).unwrap();
    cui.button_request(b, 0, None).unwrap();
}

#[test]
fn test_client_registry_limits() {
    let (cui, _board) = running();
    for name in ["one", "two", "three", "four"] {
        block_on(cui.open_client(name, 1)).unwrap();
    }
    assert_eq!(
        block_on(cui.open_client("five", 1)),
        Err(CuiError::MaxRegistrationsReached)
    );
}

#[test]
fn test_duplicate_client_name() {
    let (cui, _board) = running();
    block_on(cui.open_client("A", 1)).unwrap();
    assert_eq!(block_on(cui.open_client("A", 1)), Err(CuiError::InvalidParam));
}
