//! Buttons sampled by a per-button task

use portable_atomic::{AtomicBool, Ordering};

use cui_hal::Button;

/// Debounced level published by the button task
pub struct ButtonLink {
    pressed: AtomicBool,
}

impl ButtonLink {
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
        }
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Relaxed);
    }
}

impl Default for ButtonLink {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Button`] handle given to the arbiter
pub struct BoardButton {
    link: &'static ButtonLink,
}

impl BoardButton {
    pub fn new(link: &'static ButtonLink) -> Self {
        Self { link }
    }
}

impl Button for BoardButton {
    fn is_pressed(&self) -> bool {
        self.link.pressed.load(Ordering::Relaxed)
    }
}
