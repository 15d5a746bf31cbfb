//! Menu navigation state machine
//!
//! Tracks which menu is on screen and which of its items is selected, and
//! turns decoded keys into moves through the [`Forest`].

use cui_protocol::Key;

use super::forest::{Detached, Forest};
use super::intercept::{self, Intercepted};
use super::item::{ItemKind, MenuId, MenuSpec};
use super::screen::{CursorPos, MenuLines};
use crate::client::ClientHandle;
use crate::config::MAX_MENU_NODES;
use crate::error::{CuiError, Result};

/// How the menu has to be redrawn after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Nothing changed on screen
    Unchanged,
    /// Compose the normal view with [`Navigator::compose`]
    Menu,
    /// Draw the lines an intercepting item filled in
    Intercept,
}

/// Current menu and selection
#[derive(Debug, Default)]
pub struct Navigator {
    current: Option<MenuId>,
    selected: usize,
    /// Cursor requested by the intercepting item
    cursor: Option<CursorPos>,
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            current: None,
            selected: 0,
            cursor: None,
        }
    }

    pub fn current(&self) -> Option<MenuId> {
        self.current
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Cursor to show while an intercept session is open
    pub fn cursor(&self) -> Option<CursorPos> {
        self.cursor
    }

    /// Check whether the selected item has an open intercept session
    pub fn is_intercepting(&self, forest: &Forest) -> bool {
        self.current
            .and_then(|current| forest.item(current, self.selected))
            .is_some_and(|item| item.is_intercepting())
    }

    /// Apply one key
    ///
    /// `lines` is only meaningful when [`Refresh::Intercept`] is returned.
    pub fn handle_key(&mut self, forest: &mut Forest, key: Key, lines: &mut MenuLines) -> Refresh {
        let Some(current) = self.current else {
            return Refresh::Unchanged;
        };

        if let Some(item) = forest.item_mut(current, self.selected) {
            match intercept::offer(item, key, lines, &mut self.cursor) {
                Intercepted::Active => return Refresh::Intercept,
                // Escape or Enter closed the session: redraw in place
                Intercepted::Ended => return Refresh::Menu,
                Intercepted::Ignored => {}
            }
        }

        match key {
            Key::Left | Key::Right => self.step(forest, key.horizontal_delta()),
            Key::Execute => self.execute(forest),
            Key::Back => self.back(forest),
            Key::Escape => self.home(forest),
            _ => return Refresh::Unchanged,
        }
        Refresh::Menu
    }

    /// Fill `lines` with the normal view of the selected item
    ///
    /// Row 0 carries the root title at the root, otherwise the owning
    /// top-level menu's title (blank on a submenu's trailing Back item).
    /// Row 2 carries the item description, or the submenu title for
    /// submenu items. An idle interceptable item may decorate the view.
    pub fn compose(&self, forest: &Forest, lines: &mut MenuLines) {
        lines.clear();
        let Some(current) = self.current else { return };
        let items = forest.items(current);
        let Some(item) = items.get(self.selected) else { return };

        if forest.root() == Some(current) {
            lines.set(0, forest.title(current));
        } else if self.selected + 1 != items.len() {
            lines.set(0, forest.title(forest.top_level_of(current)));
        }

        intercept::preview(item, lines);

        let description = match item.kind() {
            ItemKind::SubMenu(child) => forest.title(child),
            _ => item.description().unwrap_or(""),
        };
        lines.set(2, description);
    }

    /// Jump to the root menu's trailing Help item
    pub fn home(&mut self, forest: &Forest) {
        self.current = forest.root();
        self.selected = self
            .current
            .map(|root| forest.items(root).len().saturating_sub(1))
            .unwrap_or(0);
    }

    /// Show a registered menu directly
    pub fn navigate_to(
        &mut self,
        forest: &mut Forest,
        owner: ClientHandle,
        spec: &'static MenuSpec,
        index: usize,
        lines: &mut MenuLines,
    ) -> Result<()> {
        let target = forest.find(owner, spec)?;
        if index >= forest.items(target).len() {
            return Err(CuiError::InvalidParam);
        }

        self.abandon(forest, lines);

        // Back from the target retraces the path down to it
        let mut node = target;
        for _ in 0..MAX_MENU_NODES {
            let Some(position) = forest.index_in_parent(node) else {
                break;
            };
            forest.set_return_index(node, position);
            match forest.parent(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }

        self.current = Some(target);
        self.selected = index;
        Ok(())
    }

    /// Close any open intercept session on the selected item
    pub fn abandon(&mut self, forest: &mut Forest, lines: &mut MenuLines) {
        if let Some(item) = self
            .current
            .and_then(|current| forest.item_mut(current, self.selected))
        {
            intercept::abandon(item, lines);
        }
        self.cursor = None;
    }

    /// Re-anchor after a tree was detached
    pub fn after_detach(&mut self, forest: &Forest, detached: Detached) {
        match self.current {
            Some(current) if forest.contains(current) && !detached.collapsed => {
                if Some(current) == forest.multi() && self.selected > detached.slot {
                    self.selected -= 1;
                }
                let count = forest.items(current).len();
                if self.selected >= count {
                    self.selected = count.saturating_sub(1);
                }
            }
            _ => self.home(forest),
        }
    }

    /// Forget the position entirely
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn step(&mut self, forest: &Forest, delta: i8) {
        let Some(current) = self.current else { return };
        let count = forest.items(current).len();
        if count <= 1 {
            return;
        }
        self.selected = if delta > 0 {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    fn execute(&mut self, forest: &mut Forest) {
        let Some(current) = self.current else { return };
        let Some(item) = forest.item(current, self.selected).copied() else {
            return;
        };

        match item.kind() {
            ItemKind::SubMenu(child) => {
                forest.set_return_index(child, self.selected);
                self.current = Some(child);
                self.selected = 0;
            }
            ItemKind::Action(action) => action(self.selected),
            ItemKind::Back => self.back(forest),
            // Handled by interception
            ItemKind::Intercept(_) | ItemKind::Help => {}
        }
    }

    fn back(&mut self, forest: &Forest) {
        let Some(current) = self.current else { return };
        match forest.parent(current) {
            Some(parent) => {
                self.selected = forest.return_index(current);
                self.current = Some(parent);
            }
            None => self.selected = forest.items(current).len().saturating_sub(1),
        }
    }
}
