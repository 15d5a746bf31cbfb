//! CUI Hardware Abstraction Layer
//!
//! This crate defines the driver-facing traits the CUI arbiter consumes.
//! Board crates implement them on top of their chip HAL; the arbiter in
//! `cui-core` only ever talks to these traits, so the whole menu and
//! resource engine can be exercised on the host with mock drivers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application clients (cui-firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cui-core (arbiter, menus, status)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cui-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//! ┌───────────┐ ┌───────────┐ ┌───────────┐
//! │  Button   │ │    Led    │ │ SerialTx  │
//! └───────────┘ └───────────┘ └───────────┘
//! ```
//!
//! # Traits
//!
//! - [`button::Button`] - Push-button level reads
//! - [`led::Led`] - LED on/off/toggle/blink
//! - [`serial::SerialTx`] - Single-outstanding-write serial transmit

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod led;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use button::{Button, ButtonEvent, ButtonEvents};
pub use led::{BlinkCount, Led, LedState};
pub use serial::SerialTx;
