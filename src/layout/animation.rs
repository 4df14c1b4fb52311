//! Animated transitions between constraint values
//!
//! An animation sits in a slot next to the installed constraint and takes over resolution of that
//! slot until it completes. It interpolates from a snapshot of the value the slot had when the
//! animation started towards its end constraint, which is re-resolved every frame and may itself
//! move. On completion the end constraint replaces the slot's constraint.

use std::f64::consts::PI;

use crate::tree::{ComponentId, UiTree};

use super::cache::ConstraintCache;
use super::color::ColorConstraint;
use super::constraint::Constraint;
use super::error::LayoutError;
use super::types::{Axis, Rgba};

/// Maps linear progress in `[0, 1]` to eased progress
///
/// Elastic and bounce curves overshoot the unit range on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSin,
    OutSin,
    InOutSin,
    InExp,
    OutExp,
    InOutExp,
    InCircular,
    OutCircular,
    InOutCircular,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    pub const ALL: [Easing; 28] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSin,
        Easing::OutSin,
        Easing::InOutSin,
        Easing::InExp,
        Easing::OutExp,
        Easing::InOutExp,
        Easing::InCircular,
        Easing::OutCircular,
        Easing::InOutCircular,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::InQuad => "in_quad",
            Easing::OutQuad => "out_quad",
            Easing::InOutQuad => "in_out_quad",
            Easing::InCubic => "in_cubic",
            Easing::OutCubic => "out_cubic",
            Easing::InOutCubic => "in_out_cubic",
            Easing::InQuart => "in_quart",
            Easing::OutQuart => "out_quart",
            Easing::InOutQuart => "in_out_quart",
            Easing::InQuint => "in_quint",
            Easing::OutQuint => "out_quint",
            Easing::InOutQuint => "in_out_quint",
            Easing::InSin => "in_sin",
            Easing::OutSin => "out_sin",
            Easing::InOutSin => "in_out_sin",
            Easing::InExp => "in_exp",
            Easing::OutExp => "out_exp",
            Easing::InOutExp => "in_out_exp",
            Easing::InCircular => "in_circular",
            Easing::OutCircular => "out_circular",
            Easing::InOutCircular => "in_out_circular",
            Easing::InElastic => "in_elastic",
            Easing::OutElastic => "out_elastic",
            Easing::InOutElastic => "in_out_elastic",
            Easing::InBounce => "in_bounce",
            Easing::OutBounce => "out_bounce",
            Easing::InOutBounce => "in_out_bounce",
        }
    }

    /// Look up a curve by its snake_case name
    pub fn from_name(name: &str) -> Option<Easing> {
        Easing::ALL.into_iter().find(|easing| easing.name() == name)
    }

    /// Eased progress, pinned to exactly 0 at the start and exactly 1 at the end
    ///
    /// Exponential and elastic curves only approach those values, and a takeover must start
    /// from the snapshot without a jump.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.curve(t)
    }

    fn curve(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::InQuad => t.powi(2),
            Easing::OutQuad => -t * (t - 2.0),
            Easing::InOutQuad => in_out(t, |t| 0.5 * t.powi(2), |t| -0.5 * ((t - 1.0) * (t - 3.0) - 1.0)),
            Easing::InCubic => t.powi(3),
            Easing::OutCubic => (t - 1.0).powi(3) + 1.0,
            Easing::InOutCubic => in_out(t, |t| 0.5 * t.powi(3), |t| 0.5 * ((t - 2.0).powi(3) + 2.0)),
            Easing::InQuart => t.powi(4),
            Easing::OutQuart => -((t - 1.0).powi(4) - 1.0),
            Easing::InOutQuart => in_out(t, |t| 0.5 * t.powi(4), |t| -0.5 * ((t - 2.0).powi(4) - 2.0)),
            Easing::InQuint => t.powi(5),
            Easing::OutQuint => (t - 1.0).powi(5) + 1.0,
            Easing::InOutQuint => in_out(t, |t| 0.5 * t.powi(5), |t| 0.5 * ((t - 2.0).powi(5) + 2.0)),
            Easing::InSin => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSin => (t * PI / 2.0).sin(),
            Easing::InOutSin => -0.5 * ((PI * t).cos() - 1.0),
            Easing::InExp => 2f64.powf(10.0 * (t - 1.0)),
            Easing::OutExp => 1.0 - 2f64.powf(-10.0 * t),
            Easing::InOutExp => in_out(
                t,
                |t| 0.5 * 2f64.powf(10.0 * (t - 1.0)),
                |t| 0.5 * (2.0 - 2f64.powf(-10.0 * (t - 1.0))),
            ),
            Easing::InCircular => 1.0 - (1.0 - t.powi(2)).max(0.0).sqrt(),
            Easing::OutCircular => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Easing::InOutCircular => in_out(
                t,
                |t| -0.5 * ((1.0 - t.powi(2)).max(0.0).sqrt() - 1.0),
                |t| 0.5 * ((1.0 - (t - 2.0).powi(2)).max(0.0).sqrt() + 1.0),
            ),
            Easing::InElastic => {
                let t = t - 1.0;
                -(2f64.powf(10.0 * t)) * ((t - 0.075) * (2.0 * PI) / 0.3).sin()
            }
            Easing::OutElastic => {
                2f64.powf(-10.0 * t) * ((t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
            }
            Easing::InOutElastic => {
                let t = t * 2.0 - 1.0;
                let wave = ((t - 0.1125) * (2.0 * PI) / 0.45).sin();
                if t < 0.0 {
                    -0.5 * 2f64.powf(10.0 * t) * wave
                } else {
                    0.5 * 2f64.powf(-10.0 * t) * wave + 1.0
                }
            }
            Easing::InBounce => 1.0 - bounce(1.0 - t),
            Easing::OutBounce => bounce(t),
            Easing::InOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }
}

/// Split a curve into halves; both halves see `t` scaled to `[0, 2]`
fn in_out(t: f64, first: impl Fn(f64) -> f64, second: impl Fn(f64) -> f64) -> f64 {
    let t = t * 2.0;
    if t < 1.0 {
        first(t)
    } else {
        second(t)
    }
}

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Curve, duration and delay of an animation, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub easing: Easing,
    pub duration: f64,
    pub delay: f64,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            easing: Easing::Linear,
            duration: 1.0,
            delay: 0.0,
        }
    }
}

impl AnimationSpec {
    pub fn new(easing: Easing, duration: f64) -> Self {
        Self {
            easing,
            duration,
            delay: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// Elapsed time and pause state of one animation
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    spec: AnimationSpec,
    elapsed: f64,
    paused: bool,
}

impl Timeline {
    pub fn new(spec: AnimationSpec) -> Self {
        Self {
            spec,
            elapsed: 0.0,
            paused: false,
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed - self.spec.delay >= self.spec.duration
    }

    /// Linear progress in `[0, 1]`, ignoring the easing curve
    pub fn progress(&self) -> f64 {
        if self.spec.duration <= 0.0 {
            return 1.0;
        }
        ((self.elapsed - self.spec.delay).max(0.0) / self.spec.duration).clamp(0.0, 1.0)
    }

    /// Eased progress
    pub fn eased(&self) -> f64 {
        self.spec.easing.apply(self.progress())
    }

    pub fn advance(&mut self, dt: f64) {
        if self.paused || self.is_complete() {
            return;
        }
        self.elapsed += dt;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Jump to the end; the slot swaps to the end constraint on the next advance
    pub fn stop(&mut self) {
        self.elapsed = self.spec.duration + self.spec.delay;
    }
}

/// An in-flight animation of a scalar slot
#[derive(Debug, Clone)]
pub struct ScalarAnimation {
    timeline: Timeline,
    start: f64,
    end: Constraint,
    cache: ConstraintCache<f64>,
}

impl ScalarAnimation {
    pub fn new(spec: AnimationSpec, start: f64, end: Constraint) -> Self {
        Self {
            timeline: Timeline::new(spec),
            start,
            end,
            cache: ConstraintCache::new(start),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> &Constraint {
        &self.end
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
        self.end.invalidate();
    }

    /// Interpolated value for this frame
    pub fn value(&self, tree: &UiTree, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
        self.cache.get_or_compute(|| {
            let end = tree.resolve_constraint(&self.end, id, axis)?;
            Ok(self.start + (end - self.start) * self.timeline.eased())
        })
    }
}

/// An in-flight animation of the color slot
#[derive(Debug, Clone)]
pub struct ColorAnimation {
    timeline: Timeline,
    start: Rgba,
    pub(crate) end: ColorConstraint,
    cache: ConstraintCache<Rgba>,
}

impl ColorAnimation {
    pub fn new(spec: AnimationSpec, start: Rgba, end: ColorConstraint) -> Self {
        Self {
            timeline: Timeline::new(spec),
            start,
            end,
            cache: ConstraintCache::new(start),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn start(&self) -> Rgba {
        self.start
    }

    pub fn end(&self) -> &ColorConstraint {
        &self.end
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
        self.end.invalidate();
    }

    pub fn value(&self, tree: &UiTree, id: ComponentId) -> Result<Rgba, LayoutError> {
        self.cache.get_or_compute(|| {
            let end = tree.resolve_color_constraint(&self.end, id)?;
            Ok(self.start.lerp(end, self.timeline.eased()))
        })
    }
}

impl UiTree {
    /// Animate a scalar slot from its current value towards `end`
    ///
    /// The start is the slot's value right now, so taking over a running animation continues
    /// from wherever it had got to.
    pub fn animate(
        &mut self,
        id: ComponentId,
        axis: Axis,
        spec: AnimationSpec,
        end: Constraint,
    ) -> Result<(), LayoutError> {
        end.validate_for(axis)?;
        for target in end.bound_targets() {
            self.node(target)?;
        }
        let start = self.resolve(id, axis)?;
        let slot = self
            .node_mut(id)?
            .constraints
            .scalar_mut(axis)
            .ok_or_else(|| LayoutError::unsupported_axis(end.name(), axis))?;
        slot.animation = Some(ScalarAnimation::new(spec, start, end));
        Ok(())
    }

    /// Animate the color slot from its current color towards `end`
    pub fn animate_color(
        &mut self,
        id: ComponentId,
        spec: AnimationSpec,
        end: ColorConstraint,
    ) -> Result<(), LayoutError> {
        if let Some(target) = end.target() {
            self.node(target)?;
        }
        let start = self.resolve_color(id)?;
        self.node_mut(id)?.constraints.color_mut().animation =
            Some(ColorAnimation::new(spec, start, end));
        Ok(())
    }

    fn timeline_mut(&mut self, id: ComponentId, axis: Axis) -> Result<Option<&mut Timeline>, LayoutError> {
        let constraints = &mut self.node_mut(id)?.constraints;
        if axis == Axis::Color {
            return Ok(constraints
                .color_mut()
                .animation
                .as_mut()
                .map(|a| &mut a.timeline));
        }
        Ok(constraints
            .scalar_mut(axis)
            .and_then(|slot| slot.animation.as_mut())
            .map(|a| &mut a.timeline))
    }

    /// Whether the slot has an animation that has not yet been swapped out
    pub fn is_animating(&self, id: ComponentId, axis: Axis) -> Result<bool, LayoutError> {
        let constraints = self.constraints(id)?;
        Ok(match constraints.scalar(axis) {
            Some(slot) => slot.animation().is_some(),
            None => constraints.color().animation().is_some(),
        })
    }

    /// Freeze an animation; returns whether there was one
    pub fn pause_animation(&mut self, id: ComponentId, axis: Axis) -> Result<bool, LayoutError> {
        Ok(self.timeline_mut(id, axis)?.map(Timeline::pause).is_some())
    }

    pub fn resume_animation(&mut self, id: ComponentId, axis: Axis) -> Result<bool, LayoutError> {
        Ok(self.timeline_mut(id, axis)?.map(Timeline::resume).is_some())
    }

    /// Jump an animation to its end value
    pub fn stop_animation(&mut self, id: ComponentId, axis: Axis) -> Result<bool, LayoutError> {
        let stopped = self.timeline_mut(id, axis)?.map(Timeline::stop).is_some();
        if stopped {
            self.invalidate(id)?;
        }
        Ok(stopped)
    }

    /// Advance every animation by `dt` seconds and swap in the end constraint of finished ones
    ///
    /// Returns the slots whose animation completed during this call.
    pub fn advance_animations(&mut self, dt: f64) -> Vec<(ComponentId, Axis)> {
        let mut completed = Vec::new();
        for id in self.ids() {
            let Ok(node) = self.node_mut(id) else {
                continue;
            };
            for axis in Axis::SCALAR {
                let Some(slot) = node.constraints.scalar_mut(axis) else {
                    continue;
                };
                let Some(animation) = slot.animation.as_mut() else {
                    continue;
                };
                animation.timeline.advance(dt);
                animation.invalidate();
                if animation.timeline.is_complete() {
                    if let Some(finished) = slot.animation.take() {
                        slot.constraint = finished.end;
                        slot.constraint.invalidate();
                    }
                    completed.push((id, axis));
                }
            }

            let slot = node.constraints.color_mut();
            if let Some(animation) = slot.animation.as_mut() {
                animation.timeline.advance(dt);
                animation.invalidate();
                if animation.timeline.is_complete() {
                    if let Some(finished) = slot.animation.take() {
                        slot.constraint = finished.end;
                        slot.constraint.invalidate();
                    }
                    completed.push((id, Axis::Color));
                }
            }
        }
        for (id, axis) in &completed {
            tracing::debug!(component = %self.display_name(*id), %axis, "animation completed");
        }
        completed
    }

    /// Advance per-frame color state such as rainbow phases
    pub fn step_colors(&mut self) {
        for id in self.ids() {
            if let Ok(node) = self.node_mut(id) {
                node.constraints.color_mut().animation_frame();
            }
        }
    }
}
