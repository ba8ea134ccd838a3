//! Pointer input as the core sees it

use std::time::Instant;

use glam::DVec2;

/// Which button produced a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    /// Middle, back, forward, ...
    Other,
}

/// A single click in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub position: DVec2,
    pub button: MouseButton,
    /// When the host observed the click
    pub at: Instant,
}

impl ClickEvent {
    pub fn new(x: f64, y: f64, button: MouseButton, at: Instant) -> Self {
        Self {
            position: DVec2::new(x, y),
            button,
            at,
        }
    }
}
