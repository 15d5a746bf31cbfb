//! Mock board for arbiter scenario tests

#![allow(dead_code)]

use std::boxed::Box;
use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use cui_core::{Arbiter, CuiConfig, Parts};
use cui_hal::{BlinkCount, Button, Led, LedState, SerialTx};
use cui_protocol::{FrameScanner, ScannedFrame};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_async::delay::DelayNs;

pub type TestArbiter = Arbiter<NoopRawMutex, MockTx, InstantDelay, MockButton, MockLed>;

/// Everything written to the console
#[derive(Clone, Default)]
pub struct Wire(Rc<RefCell<Vec<u8>>>);

impl Wire {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Frames found in the output so far
    pub fn frames(&self) -> Vec<ScannedFrame> {
        let mut scanner = FrameScanner::new();
        self.0
            .borrow()
            .iter()
            .filter_map(|&b| scanner.feed(b).ok().flatten())
            .collect()
    }

    /// Lines of the most recent menu frame
    pub fn last_menu(&self) -> Vec<String> {
        self.frames()
            .iter()
            .rev()
            .find(|f| f.kind == cui_protocol::FrameKind::Menu)
            .map(|f| f.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

/// Transmitter that records bytes and, once linked, completes every write
/// immediately like a fast driver would
pub struct MockTx {
    wire: Wire,
    fail: Rc<Cell<bool>>,
    link: Rc<OnceCell<&'static TestArbiter>>,
}

impl SerialTx for MockTx {
    type Error = ();

    fn start_write(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail.get() {
            return Err(());
        }
        self.wire.0.borrow_mut().extend_from_slice(data);
        if let Some(arbiter) = self.link.get() {
            arbiter.write_complete();
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct InstantDelay;

impl DelayNs for InstantDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

pub struct MockButton {
    pressed: Rc<Cell<bool>>,
}

impl Button for MockButton {
    fn is_pressed(&self) -> bool {
        self.pressed.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedModel {
    pub state: LedState,
    pub brightness: u8,
    pub period_ms: u32,
    pub toggles: u32,
}

pub struct MockLed {
    model: Rc<Cell<LedModel>>,
}

impl MockLed {
    fn update(&self, f: impl FnOnce(&mut LedModel)) {
        let mut model = self.model.get();
        f(&mut model);
        self.model.set(model);
    }
}

impl Led for MockLed {
    fn on(&mut self, brightness: u8) {
        self.update(|m| {
            m.state = LedState::On;
            m.brightness = brightness;
        });
    }

    fn off(&mut self) {
        self.update(|m| m.state = LedState::Off);
    }

    fn toggle(&mut self) {
        self.update(|m| {
            m.state = match m.state {
                LedState::On => LedState::Off,
                _ => LedState::On,
            };
            m.toggles += 1;
        });
    }

    fn start_blinking(&mut self, period_ms: u32, _count: BlinkCount) {
        self.update(|m| {
            m.state = LedState::Blinking;
            m.period_ms = period_ms;
        });
    }

    fn stop_blinking(&mut self) {
        self.update(|m| m.state = LedState::Off);
    }

    fn state(&self) -> LedState {
        self.model.get().state
    }
}

/// Handles on the mock hardware behind an arbiter
pub struct Board {
    pub wire: Wire,
    pub tx_fails: Rc<Cell<bool>>,
    pub buttons: Vec<Rc<Cell<bool>>>,
    pub leds: Vec<Rc<Cell<LedModel>>>,
}

impl Board {
    pub fn led(&self, index: usize) -> LedModel {
        self.leds[index].get()
    }
}

/// Arbiter whose writes complete as soon as they start
pub fn arbiter(config: CuiConfig) -> (&'static TestArbiter, Board) {
    build(config, true)
}

/// Arbiter whose writes stay outstanding until `write_complete` is called
pub fn manual_arbiter(config: CuiConfig) -> (&'static TestArbiter, Board) {
    build(config, false)
}

fn build(config: CuiConfig, auto_complete: bool) -> (&'static TestArbiter, Board) {
    let wire = Wire::default();
    let tx_fails = Rc::new(Cell::new(false));
    let link = Rc::new(OnceCell::new());

    let mut board = Board {
        wire: wire.clone(),
        tx_fails: tx_fails.clone(),
        buttons: Vec::new(),
        leds: Vec::new(),
    };

    let mut buttons = heapless::Vec::new();
    let mut leds = heapless::Vec::new();
    for _ in 0..2 {
        let pressed = Rc::new(Cell::new(false));
        board.buttons.push(pressed.clone());
        let _ = buttons.push(MockButton { pressed });

        let model = Rc::new(Cell::new(LedModel {
            state: LedState::Off,
            brightness: 0,
            period_ms: 0,
            toggles: 0,
        }));
        board.leds.push(model.clone());
        let _ = leds.push(MockLed { model });
    }

    let tx = MockTx {
        wire,
        fail: tx_fails,
        link: link.clone(),
    };
    let arbiter: &'static TestArbiter = Box::leak(Box::new(Arbiter::new(
        config,
        Parts {
            tx,
            delay: InstantDelay,
            buttons,
            leds,
        },
    )));
    if auto_complete {
        let _ = link.set(arbiter);
    }
    (arbiter, board)
}

/// Initialized arbiter managing everything
pub fn running() -> (&'static TestArbiter, Board) {
    let (arbiter, board) = arbiter(CuiConfig::default());
    embassy_futures::block_on(arbiter.init()).unwrap();
    board.wire.clear();
    (arbiter, board)
}
