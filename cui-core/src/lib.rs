//! Shared-resource arbiter and serial menu engine
//!
//! Several independent application clients share a handful of buttons,
//! LEDs and status lines on a serial console, and each can hang its own
//! menu tree into one hierarchical text menu. This crate holds all of that
//! logic with no dependency on concrete hardware:
//!
//! - Client registry with collision-checked handles
//! - Button and LED ownership tables
//! - Status-line pools below the menu area
//! - Menu forest with a synthetic root once two menus are registered
//! - Keystroke interception for inline editing
//! - Frame rendering and a bounded-wait transport writer
//!
//! Drivers plug in through the traits in `cui-hal`.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod arbiter;
pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod render;
pub mod resource;
pub mod status;
pub mod writer;

pub use arbiter::{Arbiter, MenuState, Parts};
pub use client::ClientHandle;
pub use config::CuiConfig;
pub use error::{CuiError, Domain, Result};
pub use menu::{CursorPos, InterceptInput, ItemSpec, MenuLines, MenuSpec};
pub use resource::ButtonCallback;
pub use status::StatusLineId;
