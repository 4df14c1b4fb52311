//! Per-axis constraint slots owned by each component

use super::animation::{ColorAnimation, ScalarAnimation};
use super::color::ColorConstraint;
use super::constraint::Constraint;
use super::types::Axis;

/// One scalar axis: the installed constraint plus an optional in-flight animation
#[derive(Debug, Clone, Default)]
pub struct ScalarSlot {
    pub(crate) constraint: Constraint,
    pub(crate) animation: Option<ScalarAnimation>,
}

impl ScalarSlot {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            animation: None,
        }
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn animation(&self) -> Option<&ScalarAnimation> {
        self.animation.as_ref()
    }

    pub fn invalidate(&self) {
        self.constraint.invalidate();
        if let Some(animation) = &self.animation {
            animation.invalidate();
        }
    }
}

/// The color axis: the installed constraint plus an optional in-flight animation
#[derive(Debug, Clone, Default)]
pub struct ColorSlot {
    pub(crate) constraint: ColorConstraint,
    pub(crate) animation: Option<ColorAnimation>,
}

impl ColorSlot {
    pub fn constraint(&self) -> &ColorConstraint {
        &self.constraint
    }

    pub fn animation(&self) -> Option<&ColorAnimation> {
        self.animation.as_ref()
    }

    pub fn invalidate(&self) {
        self.constraint.invalidate();
        if let Some(animation) = &self.animation {
            animation.invalidate();
        }
    }

    /// Advance rainbow state on the installed and the animating end constraint
    pub(crate) fn animation_frame(&mut self) {
        self.constraint.animation_frame();
        if let Some(animation) = &mut self.animation {
            animation.end.animation_frame();
        }
    }
}

/// Every constraint slot of one component
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub(crate) x: ScalarSlot,
    pub(crate) y: ScalarSlot,
    pub(crate) width: ScalarSlot,
    pub(crate) height: ScalarSlot,
    pub(crate) radius: ScalarSlot,
    pub(crate) text_scale: ScalarSlot,
    pub(crate) color: ColorSlot,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            x: ScalarSlot::default(),
            y: ScalarSlot::default(),
            width: ScalarSlot::default(),
            height: ScalarSlot::default(),
            radius: ScalarSlot::default(),
            text_scale: ScalarSlot::new(Constraint::pixels(1.0)),
            color: ColorSlot::default(),
        }
    }
}

impl ConstraintSet {
    /// The scalar slot for `axis`, or `None` for [`Axis::Color`]
    pub fn scalar(&self, axis: Axis) -> Option<&ScalarSlot> {
        match axis {
            Axis::X => Some(&self.x),
            Axis::Y => Some(&self.y),
            Axis::Width => Some(&self.width),
            Axis::Height => Some(&self.height),
            Axis::Radius => Some(&self.radius),
            Axis::TextScale => Some(&self.text_scale),
            Axis::Color => None,
        }
    }

    pub fn scalar_mut(&mut self, axis: Axis) -> Option<&mut ScalarSlot> {
        match axis {
            Axis::X => Some(&mut self.x),
            Axis::Y => Some(&mut self.y),
            Axis::Width => Some(&mut self.width),
            Axis::Height => Some(&mut self.height),
            Axis::Radius => Some(&mut self.radius),
            Axis::TextScale => Some(&mut self.text_scale),
            Axis::Color => None,
        }
    }

    pub fn color(&self) -> &ColorSlot {
        &self.color
    }

    pub fn color_mut(&mut self) -> &mut ColorSlot {
        &mut self.color
    }

    /// Flip every recalculation flag in this set
    pub fn invalidate(&self) {
        for axis in Axis::SCALAR {
            if let Some(slot) = self.scalar(axis) {
                slot.invalidate();
            }
        }
        self.color.invalidate();
    }
}
