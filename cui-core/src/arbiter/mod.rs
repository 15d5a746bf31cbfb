//! The arbiter: one instance owns every shared resource
//!
//! Each domain sits behind its own lock and no operation holds two domain
//! locks at once. Button, LED, client and input state use blocking
//! (critical-section style) mutexes and never wait. The menu and status
//! domains use async mutexes because they hold their frame buffer across
//! the transport write.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!  clients ──────►│ ClientRegistry   ButtonTable   LedTable      │
//!                 │ (blocking)       (blocking)    (blocking)    │
//!  rx context ───►│ pending input ──► update fn of current menu  │
//!                 │                                              │
//!  client task ──►│ MenuState (async) ──┐                        │
//!  clients ──────►│ StatusBroker (async)├──► SerialWriter ──► tx │
//!                 └─────────────────────┘──────────────▲─────────┘
//!                                          write_complete (irq)
//! ```

mod menus;
mod resources;
mod status;

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use cui_hal::{Button, Led, SerialTx};

use crate::client::{ClientHandle, ClientRegistry};
use crate::config::{CuiConfig, INPUT_CHUNK_LEN, MAX_BUTTONS, MAX_LEDS};
use crate::error::{CuiError, Domain, Result};
use crate::menu::{CursorPos, UpdateFn};
use crate::render;
use crate::resource::{ButtonTable, LedTable};
use crate::status::StatusBroker;
use crate::writer::SerialWriter;

pub use menus::MenuState;

/// Hardware handed to the arbiter at construction
pub struct Parts<T, D, B, L> {
    pub tx: T,
    pub delay: D,
    pub buttons: Vec<B, MAX_BUTTONS>,
    pub leds: Vec<L, MAX_LEDS>,
}

/// Shared-resource arbiter and menu engine
pub struct Arbiter<M, T, D, B, L>
where
    M: RawMutex,
    T: SerialTx,
    D: DelayNs + Clone,
    B: Button,
    L: Led,
{
    config: BlockingMutex<M, RefCell<CuiConfig>>,
    initialized: BlockingMutex<M, Cell<bool>>,
    clients: BlockingMutex<M, RefCell<ClientRegistry>>,
    buttons: BlockingMutex<M, RefCell<ButtonTable<B>>>,
    leds: BlockingMutex<M, RefCell<LedTable<L>>>,
    /// Last received chunk, waiting for `process_menu_update`
    input: BlockingMutex<M, RefCell<Vec<u8, INPUT_CHUNK_LEN>>>,
    /// Update function of the menu on screen, readable from the rx context
    update_fn: BlockingMutex<M, Cell<Option<UpdateFn>>>,
    /// Cursor of an open intercept session, re-placed after status prints
    cursor: BlockingMutex<M, Cell<Option<CursorPos>>>,
    menu: Mutex<M, MenuState>,
    status: Mutex<M, StatusBroker>,
    writer: SerialWriter<M, T, D>,
    delay: D,
}

impl<M, T, D, B, L> Arbiter<M, T, D, B, L>
where
    M: RawMutex,
    T: SerialTx,
    D: DelayNs + Clone,
    B: Button,
    L: Led,
{
    pub fn new(config: CuiConfig, parts: Parts<T, D, B, L>) -> Self {
        let Parts {
            tx,
            delay,
            buttons,
            leds,
        } = parts;

        Self {
            menu: Mutex::new(MenuState::new(&config.multi_menu_title)),
            writer: SerialWriter::new(tx, delay.clone(), config.write_timeout_ms),
            config: BlockingMutex::new(RefCell::new(config)),
            initialized: BlockingMutex::new(Cell::new(false)),
            clients: BlockingMutex::new(RefCell::new(ClientRegistry::new())),
            buttons: BlockingMutex::new(RefCell::new(ButtonTable::new(buttons))),
            leds: BlockingMutex::new(RefCell::new(LedTable::new(leds))),
            input: BlockingMutex::new(RefCell::new(Vec::new())),
            update_fn: BlockingMutex::new(Cell::new(None)),
            cursor: BlockingMutex::new(Cell::new(None)),
            status: Mutex::new(StatusBroker::new()),
            delay,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.lock(|flag| flag.get())
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> CuiConfig {
        self.with_config(CuiConfig::clone)
    }

    /// How long a write currently waits for the previous one
    pub fn write_timeout_ms(&self) -> u32 {
        self.writer.timeout_ms()
    }

    fn with_config<R>(&self, f: impl FnOnce(&CuiConfig) -> R) -> R {
        self.config.lock(|config| f(&config.borrow()))
    }

    fn manages(&self, domain: Domain) -> bool {
        self.with_config(|config| match domain {
            Domain::Buttons => config.manage_buttons,
            Domain::Leds => config.manage_leds,
            Domain::Uart => config.manage_uart,
        })
    }

    /// Domain managed, then module initialized
    fn check_domain(&self, domain: Domain) -> Result<()> {
        if !self.manages(domain) {
            return Err(CuiError::DomainNotManaged(domain));
        }
        if !self.is_initialized() {
            return Err(CuiError::ModuleUninitialized);
        }
        Ok(())
    }

    /// Domain managed, module initialized, then handle live
    fn check(&self, domain: Domain, client: ClientHandle) -> Result<()> {
        self.check_domain(domain)?;
        self.clients.lock(|clients| clients.borrow().validate(client))
    }

    /// Bring the module up and prepare the terminal
    ///
    /// Fails with `Failure` when already initialized. The module counts as
    /// initialized even if the terminal setup frame could not be sent.
    pub async fn init(&self) -> Result<()> {
        let already = self.initialized.lock(|flag| flag.replace(true));
        if already {
            return Err(CuiError::Failure);
        }
        info!("CUI initialized");

        if self.manages(Domain::Uart) {
            let frame = render::terminal_init()?;
            self.writer.write(frame.as_bytes()).await?;
        }
        Ok(())
    }

    /// Release everything and return to the uninitialized state
    pub async fn close(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(CuiError::ModuleUninitialized);
        }

        self.leds.lock(|leds| leds.borrow_mut().release_all());
        self.buttons.lock(|buttons| buttons.borrow_mut().release_all());
        self.menu.lock().await.clear();
        self.status.lock().await.clear();
        self.clients.lock(|clients| clients.borrow_mut().clear());
        self.input.lock(|input| input.borrow_mut().clear());
        self.update_fn.lock(|cell| cell.set(None));
        self.cursor.lock(|cell| cell.set(None));
        self.initialized.lock(|flag| flag.set(false));
        info!("CUI closed");

        if self.manages(Domain::Uart) {
            let frame = render::terminal_reset()?;
            self.writer.write(frame.as_bytes()).await?;
        }
        Ok(())
    }

    /// Register a client and reserve its status-line pool
    pub async fn open_client(&self, name: &str, max_status_lines: usize) -> Result<ClientHandle> {
        if !self.is_initialized() {
            return Err(CuiError::ModuleUninitialized);
        }

        let handle = self
            .clients
            .lock(|clients| clients.borrow_mut().open(name, max_status_lines))?;
        self.status
            .lock()
            .await
            .add_pool(handle, max_status_lines)?;

        info!("Client opened: {:#x}", handle.raw());
        Ok(handle)
    }

    /// Transport completion notification; callable from interrupt context
    pub fn write_complete(&self) {
        self.writer.write_complete();
    }

    /// Report a fatal condition on the console
    ///
    /// Initializes the module with [`CuiConfig::default`] first when it is
    /// not running. With `spin` set this never returns and flashes every LED.
    pub async fn assert(&self, message: &str, spin: bool) {
        if !self.is_initialized() {
            self.config.lock(|config| {
                let defaults = CuiConfig::default();
                self.writer.set_timeout_ms(defaults.write_timeout_ms);
                *config.borrow_mut() = defaults;
            });
            if let Err(e) = self.init().await {
                error!("Assert could not initialize: {:?}", e);
            }
        }
        error!("Assert: {}", message);

        if self.manages(Domain::Uart) {
            let mut status = self.status.lock().await;
            match status.alert(message) {
                Ok(frame) => {
                    if let Err(e) = self.writer.write(frame.as_bytes()).await {
                        warn!("Assert frame dropped: {:?}", e);
                    }
                }
                Err(e) => warn!("Assert frame too long: {:?}", e),
            }
        }

        if spin {
            self.flash_leds_forever().await;
        }
    }
}
