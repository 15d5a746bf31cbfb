//! Menu registration, navigation and the input pipeline

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use cui_hal::{Button, Led, SerialTx};
use cui_protocol::Key;

use super::Arbiter;
use crate::client::ClientHandle;
use crate::config::INPUT_CHUNK_LEN;
use crate::error::{Domain, Result};
use crate::menu::{Forest, MenuLines, MenuSpec, Navigator, Refresh};
use crate::render::{self, PingPong, MENU_FRAME_LEN};

/// Everything guarded by the menu lock
///
/// Outside the crate it is only reachable read-only through
/// [`Arbiter::with_menu`].
pub struct MenuState {
    forest: Forest,
    nav: Navigator,
    lines: MenuLines,
    frames: PingPong<MENU_FRAME_LEN>,
}

impl MenuState {
    pub(crate) fn new(multi_title: &str) -> Self {
        Self {
            forest: Forest::new(multi_title),
            nav: Navigator::new(),
            lines: MenuLines::new(),
            frames: PingPong::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.forest.clear();
        self.nav.reset();
        self.lines.clear();
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// Lines of the last composed view
    pub fn lines(&self) -> &MenuLines {
        &self.lines
    }
}

impl<M, T, D, B, L> Arbiter<M, T, D, B, L>
where
    M: RawMutex,
    T: SerialTx,
    D: DelayNs + Clone,
    B: Button,
    L: Led,
{
    /// Add a client's top-level menu and show the root
    pub async fn register_menu(&self, client: ClientHandle, spec: &'static MenuSpec) -> Result<()> {
        self.check(Domain::Uart, client)?;

        let mut state = self.menu.lock().await;
        let MenuState {
            forest, nav, lines, ..
        } = &mut *state;

        nav.abandon(forest, lines);
        forest
            .attach(client, spec)
            .inspect_err(|e| warn!("Menu registration refused: {:?}", e))?;
        nav.home(forest);
        info!("Menu registered: {}", spec.title);

        self.show_menu(&mut state).await
    }

    /// Remove a client's top-level menu
    ///
    /// The menu area is cleared when no menu is left.
    pub async fn deregister_menu(&self, client: ClientHandle, spec: &'static MenuSpec) -> Result<()> {
        self.check(Domain::Uart, client)?;

        let mut state = self.menu.lock().await;
        let MenuState {
            forest, nav, lines, ..
        } = &mut *state;

        forest.find(client, spec)?;
        nav.abandon(forest, lines);
        let detached = forest.detach(client, spec)?;
        info!("Menu deregistered: {}", spec.title);

        if forest.registered() == 0 {
            nav.reset();
            lines.clear();
            self.sync_menu_cache(&state);
            let frame = render::menu_clear()?;
            return self.writer.write(frame.as_bytes()).await;
        }

        nav.after_detach(forest, detached);
        self.show_menu(&mut state).await
    }

    /// Rename the synthetic root; redrawn if it is on screen
    pub async fn update_multi_menu_title(&self, title: &str) -> Result<()> {
        self.check_domain(Domain::Uart)?;

        let mut state = self.menu.lock().await;
        state.forest.set_multi_title(title);
        let on_screen = state.forest.multi().is_some()
            && state.nav.current() == state.forest.multi()
            && !state.nav.is_intercepting(&state.forest);
        if on_screen {
            self.show_menu(&mut state).await?;
        }
        Ok(())
    }

    /// Show item `index` of one of the caller's registered menus
    pub async fn menu_nav(&self, client: ClientHandle, spec: &'static MenuSpec, index: usize) -> Result<()> {
        self.check(Domain::Uart, client)?;

        let mut state = self.menu.lock().await;
        let MenuState {
            forest, nav, lines, ..
        } = &mut *state;
        nav.navigate_to(forest, client, spec, index, lines)?;

        self.show_menu(&mut state).await
    }

    /// Hand one received chunk to the menu engine (rx context)
    ///
    /// The chunk is kept until [`process_menu_update`](Self::process_menu_update)
    /// consumes it; further chunks are dropped meanwhile. An empty chunk is a
    /// failed read and is discarded. The update function of the menu on
    /// screen (or its nearest ancestor that has one) is then called so the
    /// owning client can schedule processing.
    pub fn receive_input(&self, bytes: &[u8]) {
        if self.check_domain(Domain::Uart).is_err() {
            return;
        }
        if bytes.is_empty() {
            warn!("Serial read failed, chunk discarded");
            return;
        }

        let stored = self.input.lock(|input| {
            let mut input = input.borrow_mut();
            if !input.is_empty() {
                return false;
            }
            let len = bytes.len().min(INPUT_CHUNK_LEN);
            input.extend_from_slice(&bytes[..len]).is_ok()
        });
        if !stored {
            trace!("Input dropped, previous chunk pending");
            return;
        }

        if let Some(update) = self.update_fn.lock(|cell| cell.get()) {
            update();
        }
    }

    /// Consume the pending chunk: navigate or intercept, then redraw
    pub async fn process_menu_update(&self) -> Result<()> {
        self.check_domain(Domain::Uart)?;

        let chunk = self
            .input
            .lock(|input| core::mem::take(&mut *input.borrow_mut()));
        let Some(key) = Key::decode(&chunk) else {
            return Ok(());
        };

        let mut state = self.menu.lock().await;
        let MenuState {
            forest, nav, lines, ..
        } = &mut *state;

        match nav.handle_key(forest, key, lines) {
            Refresh::Unchanged => Ok(()),
            Refresh::Menu => self.show_menu(&mut state).await,
            Refresh::Intercept => self.send_menu(&mut state).await,
        }
    }

    /// Compose the normal view and send it
    async fn show_menu(&self, state: &mut MenuState) -> Result<()> {
        state.nav.compose(&state.forest, &mut state.lines);
        self.send_menu(state).await
    }

    /// Send `state.lines` as they are, then the intercept cursor if any
    async fn send_menu(&self, state: &mut MenuState) -> Result<()> {
        self.sync_menu_cache(state);

        let frame = render::menu(&mut state.frames, &state.lines)?;
        self.writer.write(frame.as_bytes()).await?;

        if let Some(cursor) = state.nav.cursor() {
            let frame = render::cursor(cursor.row, cursor.col)?;
            self.writer.write(frame.as_bytes()).await?;
        }
        Ok(())
    }

    /// Publish what the rx context and status prints need to know
    fn sync_menu_cache(&self, state: &MenuState) {
        let update = state
            .nav
            .current()
            .and_then(|current| state.forest.update_fn_for(current));
        self.update_fn.lock(|cell| cell.set(update));
        self.cursor.lock(|cell| cell.set(state.nav.cursor()));
    }

    /// Read-only view of the menu engine with the menu lock held
    ///
    /// For diagnostics and host tests; nothing here can change the menus.
    pub async fn with_menu<R>(&self, f: impl FnOnce(&MenuState) -> R) -> R {
        f(&*self.menu.lock().await)
    }
}
