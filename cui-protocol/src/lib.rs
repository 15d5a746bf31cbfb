//! CUI serial console protocol
//!
//! The menu engine drives a plain ANSI terminal over a UART. Output is
//! ordinary text decorated with `ESC[...` control sequences, with every
//! menu refresh and status-line update bracketed by one-byte frame markers
//! so a host-side tool can pick individual updates out of the stream.
//!
//! # Frame Overview
//!
//! ```text
//! ┌──────────────────┬────────────┬────────────────────────────┬─────┐
//! │ cursor / clear   │ MENU_START │ line0 \n\r line1 \n\r line2│ END │
//! │ escape sequences │ 0x01       │                            │ 0x03│
//! └──────────────────┴────────────┴────────────────────────────┴─────┘
//! ┌──────────────────┬──────────────┬──────────────────────────┬─────┐
//! │ ESC[row;0H ESC[2K│ STATUS_START │ label ": " value         │ END │
//! │                  │ 0x02         │                          │ 0x03│
//! └──────────────────┴──────────────┴──────────────────────────┴─────┘
//! ```
//!
//! Input goes the other way: each received chunk decodes to one [`Key`].

#![no_std]
#![deny(unsafe_code)]

pub mod control;
pub mod frame;
pub mod input;

pub use control::{CursorTo, FRAME_END, MENU_START, STATUS_START};
pub use frame::{FrameError, FrameKind, FrameScanner, ScannedFrame, MAX_FRAME_TEXT};
pub use input::Key;
