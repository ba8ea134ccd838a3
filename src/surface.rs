//! Drawing-surface abstraction
//!
//! The core never renders. It only registers and deregisters shape objects
//! with whatever collection the host draws from.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SurfaceError;
use crate::sim::{Shape, ShapeId};

/// A collection of drawable shapes owned by the host
pub trait Surface {
    fn add(&mut self, shape: &Shape) -> Result<(), SurfaceError>;
    fn remove(&mut self, shape: &Shape) -> Result<(), SurfaceError>;
}

/// Surface shared between the factory and every handler it creates
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Register `shape`, treating a surface that is already borrowed as busy
pub(crate) fn register(surface: &SharedSurface, shape: &Shape) -> Result<(), SurfaceError> {
    surface
        .try_borrow_mut()
        .map_err(|_| SurfaceError::Busy)?
        .add(shape)
}

pub(crate) fn deregister(surface: &SharedSurface, shape: &Shape) -> Result<(), SurfaceError> {
    surface
        .try_borrow_mut()
        .map_err(|_| SurfaceError::Busy)?
        .remove(shape)
}

/// In-memory surface keeping registered shape ids in insertion order
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    children: Vec<ShapeId>,
    capacity: Option<usize>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas that refuses registrations beyond `capacity` shapes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Wrap into the shared handle the factory expects
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Surface for Canvas {
    fn add(&mut self, shape: &Shape) -> Result<(), SurfaceError> {
        if self.children.contains(&shape.id) {
            return Err(SurfaceError::AlreadyRegistered(shape.id));
        }
        if let Some(capacity) = self.capacity {
            if self.children.len() >= capacity {
                return Err(SurfaceError::Full { capacity });
            }
        }
        self.children.push(shape.id);
        Ok(())
    }

    fn remove(&mut self, shape: &Shape) -> Result<(), SurfaceError> {
        let index = self
            .children
            .iter()
            .position(|id| *id == shape.id)
            .ok_or(SurfaceError::NotRegistered(shape.id))?;
        self.children.remove(index);
        Ok(())
    }
}
