//! Serial menu engine
//!
//! Clients describe their menus statically with [`MenuSpec`] and
//! [`ItemSpec`]. Registered definitions are instantiated into the
//! [`Forest`], the [`Navigator`] moves through it one key at a time and the
//! resulting three [`MenuLines`] are handed to the renderer.

mod forest;
mod help;
mod intercept;
mod item;
mod navigator;
mod screen;

pub use forest::{Detached, Forest};
pub use help::{HELP_LINES, HELP_PREVIEW};
pub use intercept::Intercepted;
pub use item::{
    ActionFn, InterceptFn, InterceptInput, ItemKind, ItemSpec, MenuId, MenuItem, MenuSpec,
    UpdateFn, BACK_DESCRIPTION, HELP_DESCRIPTION,
};
pub use navigator::{Navigator, Refresh};
pub use screen::{CursorPos, MenuLine, MenuLines, MENU_ROWS};
