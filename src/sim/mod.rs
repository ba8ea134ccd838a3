//! Deterministic simulation module
//!
//! All shape logic lives here. This module must stay pure and deterministic:
//! - Surface dimensions passed in on every call, never cached
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering: shapes reach the screen only through the surface trait

pub mod factory;
pub mod handler;
pub mod negotiation;
pub mod registry;
pub mod shape;

pub use factory::ShapeFactory;
pub use handler::ShapeHandler;
pub use negotiation::{SettingsDraft, SettingsEditor, SettingsRequest};
pub use registry::{ClickOutcome, ClickState, ShapeRegistry, ShapeView};
pub use shape::{Color, HandlerId, Palette, Shape, ShapeId, ShapeKind};
