//! Capacities and runtime configuration
//!
//! Table sizes are compile-time constants so every registry is a fixed-size
//! array. Behavior that a board may want to tune lives in [`CuiConfig`].

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum simultaneously open clients
pub const MAX_CLIENTS: usize = 4;

/// Maximum client name length
pub const MAX_CLIENT_NAME_LEN: usize = 24;

/// Maximum simultaneously registered top-level menus
pub const MAX_REGISTERED_MENUS: usize = 4;

/// Menu nodes across all registered trees, including the synthetic root
pub const MAX_MENU_NODES: usize = 16;

/// Items per menu, including the trailing Help/Back item
pub const MAX_MENU_ITEMS: usize = 12;

/// Width of one menu line in characters
pub const MAX_MENU_LINE_LEN: usize = 128;

/// Status lines a single client may reserve
pub const MAX_STATUS_LINES: usize = 8;

/// Status-line label length, excluding the ": " separator
pub const MAX_STATUS_LINE_LABEL_LEN: usize = 32;

/// Formatted status-line value length
pub const MAX_STATUS_LINE_VALUE_LEN: usize = 128;

/// Physical buttons the arbiter can manage
pub const MAX_BUTTONS: usize = 4;

/// Physical LEDs the arbiter can manage
pub const MAX_LEDS: usize = 4;

/// Rows reserved above the status area: three menu lines, a blank row
/// and the assert line
pub const INITIAL_STATUS_OFFSET: u16 = 5;

/// Bytes consumed per input read
pub const INPUT_CHUNK_LEN: usize = 5;

/// Maximum multi-menu title length
pub const MAX_TITLE_LEN: usize = 32;

/// Separator appended to every status-line label
pub const STATUS_LABEL_SEPARATOR: &str = ": ";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CuiConfig {
    /// Arbitrate the buttons
    pub manage_buttons: bool,
    /// Arbitrate the LEDs
    pub manage_leds: bool,
    /// Own the serial console (menus and status lines)
    pub manage_uart: bool,
    /// Full blink period used by `led_blink`
    pub led_blink_period_ms: u32,
    /// Hold time before a press counts as long
    pub button_long_press_ms: u32,
    /// How long a write waits for the previous one to finish
    pub write_timeout_ms: u32,
    /// Toggle period of the assert LED flash
    pub assert_flash_period_ms: u32,
    /// Title of the synthetic root menu
    pub multi_menu_title: String<MAX_TITLE_LEN>,
}

impl CuiConfig {
    /// Check that the numeric settings are usable
    pub fn is_valid(&self) -> bool {
        self.led_blink_period_ms > 0 && self.write_timeout_ms > 0 && self.assert_flash_period_ms > 0
    }
}

impl Default for CuiConfig {
    fn default() -> Self {
        let mut multi_menu_title = String::new();
        // Fits MAX_TITLE_LEN
        let _ = multi_menu_title.push_str(" Multi-Menu ");

        Self {
            manage_buttons: true,
            manage_leds: true,
            manage_uart: true,
            led_blink_period_ms: 500,
            button_long_press_ms: 1000,
            write_timeout_ms: 100,
            assert_flash_period_ms: 500,
            multi_menu_title,
        }
    }
}
