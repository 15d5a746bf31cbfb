//! Menu definitions and runtime items
//!
//! Clients describe their menus as `static` [`MenuSpec`] trees. Registering
//! one copies it into the forest's arena as runtime [`MenuItem`]s, where the
//! trailing Help/Back item can be rewritten without touching the client's
//! definition.

use cui_protocol::Key;

use super::help;
use super::screen::{CursorPos, MenuLines};

/// Called with the index of the selected item
pub type ActionFn = fn(usize);

/// Called from the receive path when input is waiting; the client should
/// schedule `process_menu_update` on its own task
pub type UpdateFn = fn();

/// Keystroke interception handler
///
/// Gets the three menu lines to draw into (cleared before every call) and
/// may request an editing cursor by setting the last argument.
pub type InterceptFn = fn(InterceptInput, &mut MenuLines, &mut Option<CursorPos>);

/// Label of the Back item that ends every submenu
pub const BACK_DESCRIPTION: &str = "<      BACK      >";

/// Label of the Help item that ends every top-level menu
pub const HELP_DESCRIPTION: &str = "<      HELP      >";

/// What an intercepting item is being told
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterceptInput {
    /// Session opened by Enter
    Start,
    /// Session closed by Enter
    Stop,
    /// Session abandoned by Escape
    Cancel,
    /// Item is on screen but not executing
    Preview,
    /// Keystroke during an open session
    Key(Key),
}

/// One item of a client menu definition
#[derive(Clone, Copy)]
pub enum ItemSpec {
    Action {
        description: &'static str,
        action: ActionFn,
    },
    Intercept {
        description: &'static str,
        handler: InterceptFn,
    },
    /// Rendered with the submenu's title
    SubMenu(&'static MenuSpec),
}

impl ItemSpec {
    pub const fn action(description: &'static str, action: ActionFn) -> Self {
        ItemSpec::Action {
            description,
            action,
        }
    }

    pub const fn intercept(description: &'static str, handler: InterceptFn) -> Self {
        ItemSpec::Intercept {
            description,
            handler,
        }
    }

    pub const fn submenu(menu: &'static MenuSpec) -> Self {
        ItemSpec::SubMenu(menu)
    }
}

/// A client menu definition
///
/// Top-level menus get a Help item appended and must carry an update
/// function; submenus get a Back item appended.
pub struct MenuSpec {
    pub title: &'static str,
    pub update: Option<UpdateFn>,
    pub items: &'static [ItemSpec],
}

impl MenuSpec {
    pub const fn new(
        title: &'static str,
        update: Option<UpdateFn>,
        items: &'static [ItemSpec],
    ) -> Self {
        Self {
            title,
            update,
            items,
        }
    }
}

/// Arena index of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuId(pub(crate) u8);

impl MenuId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Runtime item behavior
#[derive(Clone, Copy)]
pub enum ItemKind {
    Action(ActionFn),
    Intercept(InterceptFn),
    SubMenu(MenuId),
    /// Return to the parent menu
    Back,
    /// Built-in key map, intercepting
    Help,
}

/// Runtime menu item
#[derive(Clone, Copy)]
pub struct MenuItem {
    pub(crate) kind: ItemKind,
    /// `None` renders the target submenu's title
    pub(crate) description: Option<&'static str>,
    /// Interception session open
    pub(crate) intercepting: bool,
}

impl MenuItem {
    pub(crate) const fn new(kind: ItemKind, description: Option<&'static str>) -> Self {
        Self {
            kind,
            description,
            intercepting: false,
        }
    }

    pub(crate) const fn back() -> Self {
        Self::new(ItemKind::Back, Some(BACK_DESCRIPTION))
    }

    pub(crate) const fn help() -> Self {
        Self::new(ItemKind::Help, Some(HELP_DESCRIPTION))
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn description(&self) -> Option<&'static str> {
        self.description
    }

    pub fn is_intercepting(&self) -> bool {
        self.intercepting
    }

    /// Interception handler, if the item has one
    pub fn interceptor(&self) -> Option<InterceptFn> {
        match self.kind {
            ItemKind::Intercept(handler) => Some(handler),
            ItemKind::Help => Some(help::help_handler),
            _ => None,
        }
    }
}
