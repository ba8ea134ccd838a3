//! Shape construction
//!
//! The factory owns the palette cursor and hands out handler ids, so two
//! factories never influence each other's colours.

use glam::DVec2;

use super::handler::ShapeHandler;
use super::shape::{HandlerId, Palette, Shape, ShapeId, ShapeKind};
use crate::consts::DEFAULT_VELOCITY;
use crate::error::ShapeError;
use crate::settings::Settings;
use crate::surface::{self, SharedSurface};

/// Builds shapes, colours them round-robin and registers them with a surface
pub struct ShapeFactory {
    surface: SharedSurface,
    palette: Palette,
    /// Velocity a stopped handler restarts with
    default_velocity: DVec2,
    next_id: u32,
}

impl ShapeFactory {
    pub fn new(surface: SharedSurface) -> Self {
        Self {
            surface,
            palette: Palette::default(),
            default_velocity: DEFAULT_VELOCITY,
            next_id: 1,
        }
    }

    pub fn from_settings(surface: SharedSurface, settings: &Settings) -> Self {
        Self {
            surface,
            palette: Palette::new(settings.palette),
            default_velocity: settings.default_velocity,
            next_id: 1,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn next_handler_id(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a shape of `kind` at (`left`, `top`) and register it.
    ///
    /// Size and position are taken as given; callers clamp if they care.
    /// The palette cursor advances exactly once per call, even when
    /// registration fails, and a failed registration fails the call.
    pub fn create_shape(
        &mut self,
        kind: ShapeKind,
        size: f64,
        dx: f64,
        dy: f64,
        left: f64,
        top: f64,
    ) -> Result<ShapeHandler, ShapeError> {
        let id = ShapeId {
            handler: self.next_handler_id(),
            generation: 0,
        };
        let color = self.palette.next_color();
        let shape = Shape::new(id, kind, size, DVec2::new(left, top), color);

        surface::register(&self.surface, &shape)?;
        log::debug!(
            "Created {} {} (size {}, color {:?}) at ({}, {})",
            kind.as_str(),
            id,
            size,
            color,
            left,
            top
        );

        Ok(ShapeHandler::new(
            shape,
            DVec2::new(dx, dy),
            self.default_velocity,
            self.surface.clone(),
        ))
    }
}
