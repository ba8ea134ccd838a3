//! Bouncy Shapes - clickable 2D shapes bouncing around a bounded surface
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shapes, handlers, registry, settings edits)
//! - `surface`: Drawing-surface registration abstraction
//! - `platform`: Host-facing plumbing (input, tick timing, notices)
//! - `settings`: Persisted simulation configuration
//! - `error`: Error types shared across the crate

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod surface;

pub use error::{ConfigError, ShapeError, SurfaceError};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    use glam::DVec2;

    /// Size (width == height) of newly spawned shapes
    pub const DEFAULT_SIZE: f64 = 50.0;

    /// Velocity of random spawns, and the restart velocity of a stopped shape
    pub const DEFAULT_VELOCITY: DVec2 = DVec2::new(5.0, 5.0);

    /// Two clicks closer together than this are a double-click
    pub const DOUBLE_CLICK_MS: u64 = 300;

    /// Tick cadence (~60 Hz)
    pub const TICK_INTERVAL_MS: u64 = 16;
    /// Maximum ticks fired per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the tick driver will account for (ms)
    pub const MAX_FRAME_MS: u64 = 100;
}

/// Surface dimensions supplied fresh by the host on every call
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
