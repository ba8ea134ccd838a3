//! Settings negotiation: staged size/speed edits for one shape
//!
//! Invalid edits are dropped and the last accepted value stays staged.
//! Setters report acceptance so callers can tell, but nothing is raised.

use serde::{Deserialize, Serialize};

use super::shape::HandlerId;

/// Size and speed being edited, seeded from a handler's current values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsDraft {
    size: f64,
    speed: f64,
}

impl SettingsDraft {
    /// Seed values are taken as-is, even ones the setters would refuse
    pub fn new(size: f64, speed: f64) -> Self {
        Self { size, speed }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Stage a new size; accepted only if > 0
    pub fn set_size(&mut self, size: f64) -> bool {
        let accepted = size > 0.0;
        if accepted {
            self.size = size;
        }
        accepted
    }

    /// Stage a new speed; accepted only if >= 0
    pub fn set_speed(&mut self, speed: f64) -> bool {
        let accepted = speed >= 0.0;
        if accepted {
            self.speed = speed;
        }
        accepted
    }
}

/// A pending edit for the shape that was last clicked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub handler: HandlerId,
    pub draft: SettingsDraft,
}

/// Host-side editor for a settings round trip.
///
/// Returns the adjusted draft on confirm, `None` on cancel.
pub trait SettingsEditor {
    fn edit(&mut self, draft: SettingsDraft) -> Option<SettingsDraft>;
}

impl<F> SettingsEditor for F
where
    F: FnMut(SettingsDraft) -> Option<SettingsDraft>,
{
    fn edit(&mut self, draft: SettingsDraft) -> Option<SettingsDraft> {
        self(draft)
    }
}
