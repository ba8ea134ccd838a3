//! Per-shape behaviour: movement with edge reflection, kind/colour toggle,
//! motion toggle, hit-testing and size/speed edits.

use std::fmt;

use glam::DVec2;

use super::shape::{Color, HandlerId, Shape, ShapeKind};
use crate::Extent;
use crate::error::{ShapeError, SurfaceError};
use crate::surface::{self, SharedSurface};

/// Owns exactly one shape and the motion state that outlives shape swaps
pub struct ShapeHandler {
    shape: Shape,
    vel: DVec2,
    moving: bool,
    /// Velocity used when motion restarts from a standstill
    default_velocity: DVec2,
    surface: SharedSurface,
}

impl fmt::Debug for ShapeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeHandler")
            .field("shape", &self.shape)
            .field("vel", &self.vel)
            .field("moving", &self.moving)
            .finish_non_exhaustive()
    }
}

impl ShapeHandler {
    pub(crate) fn new(
        shape: Shape,
        vel: DVec2,
        default_velocity: DVec2,
        surface: SharedSurface,
    ) -> Self {
        Self {
            shape,
            vel,
            moving: false,
            default_velocity,
            surface,
        }
    }

    #[inline]
    pub fn id(&self) -> HandlerId {
        self.shape.id.handler
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind
    }

    pub fn color(&self) -> Color {
        self.shape.color
    }

    pub fn size(&self) -> f64 {
        self.shape.size
    }

    /// Horizontal velocity component, sign included
    pub fn speed(&self) -> f64 {
        self.vel.x
    }

    pub fn position(&self) -> DVec2 {
        self.shape.pos
    }

    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Advance one tick inside `bounds`.
    ///
    /// Each axis reflects independently when the pre-move box touches or
    /// crosses an edge; the position then moves by the (possibly flipped)
    /// velocity. A shape at least as large as the surface flips every tick.
    pub fn move_within(&mut self, bounds: Extent) {
        if !self.moving {
            return;
        }

        let pos = self.shape.pos;
        let size = self.shape.size;

        if pos.x + size >= bounds.width || pos.x <= 0.0 {
            self.vel.x = -self.vel.x;
        }
        if pos.y + size >= bounds.height || pos.y <= 0.0 {
            self.vel.y = -self.vel.y;
        }

        self.shape.pos = pos + self.vel;
    }

    /// Swap to a new shape of the other kind, same size and position, next colour.
    ///
    /// The old shape leaves the surface before the new one joins. If the new
    /// one cannot be registered the old shape is kept and put back. A shape
    /// already missing from the surface counts as removed.
    pub fn toggle_shape_and_color(&mut self) -> Result<(), ShapeError> {
        match surface::deregister(&self.surface, &self.shape) {
            Ok(()) | Err(SurfaceError::NotRegistered(_)) => {}
            Err(err) => return Err(err.into()),
        }

        let next = self.shape.swapped();
        if let Err(err) = surface::register(&self.surface, &next) {
            if let Err(restore) = surface::register(&self.surface, &self.shape) {
                log::warn!(
                    "Shape {} left off the surface after failed toggle: {}",
                    self.shape.id,
                    restore
                );
            }
            return Err(err.into());
        }

        log::debug!(
            "Handler {} toggled {} -> {} ({:?})",
            self.id(),
            self.shape.kind.as_str(),
            next.kind.as_str(),
            next.color
        );
        self.shape = next;
        Ok(())
    }

    /// Start or stop motion.
    ///
    /// Stopping zeroes the velocity. Starting from exactly zero velocity uses
    /// the default velocity; any other velocity is kept.
    pub fn toggle_movement(&mut self) {
        self.moving = !self.moving;

        if self.moving {
            if self.vel == DVec2::ZERO {
                self.vel = self.default_velocity;
            }
        } else {
            self.vel = DVec2::ZERO;
        }
        log::debug!("Handler {} moving: {}", self.id(), self.moving);
    }

    /// Inclusive point-in-box test against the current shape
    pub fn is_clicked(&self, point: DVec2) -> bool {
        self.shape.contains(point)
    }

    /// Take the current shape off the surface
    pub(crate) fn detach(&self) -> Result<(), ShapeError> {
        Ok(surface::deregister(&self.surface, &self.shape)?)
    }

    /// Set the size and make velocity isotropic: both components become `speed`.
    ///
    /// No validation here; `SettingsDraft` filters edits first.
    pub fn update(&mut self, size: f64, speed: f64) {
        self.shape.size = size;
        self.vel = DVec2::splat(speed);
    }
}
