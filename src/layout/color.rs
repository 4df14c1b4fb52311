//! Color constraints
//!
//! Same cache contract as scalar constraints, but the value is an [`Rgba`].

use std::f64::consts::PI;

use crate::tree::{ComponentId, UiTree};

use super::cache::ConstraintCache;
use super::error::LayoutError;
use super::types::Rgba;

/// Phase state of a cycling rainbow color
#[derive(Debug, Clone, PartialEq)]
pub struct Rainbow {
    /// Steps per radian of hue rotation; larger is slower
    pub speed: f64,
    pub alpha: u8,
    step: u64,
    current: Rgba,
}

impl Rainbow {
    pub fn new(speed: f64, alpha: u8) -> Self {
        Self::starting_at(speed, alpha, 0)
    }

    /// Start the cycle at a given step
    pub fn starting_at(speed: f64, alpha: u8, step: u64) -> Self {
        let mut rainbow = Self {
            speed,
            alpha,
            step,
            current: Rgba::WHITE,
        };
        rainbow.current = rainbow.color_at(step);
        rainbow
    }

    fn color_at(&self, step: u64) -> Rgba {
        let speed = if self.speed == 0.0 { 1.0 } else { self.speed };
        let phase = step as f64 / speed;
        let channel = |offset: f64| (((phase + offset).sin() + 0.75) * 170.0).clamp(0.0, 255.0) as u8;
        Rgba::new(
            channel(0.0),
            channel(2.0 * PI / 3.0),
            channel(4.0 * PI / 3.0),
            self.alpha,
        )
    }

    /// Advance one step
    pub fn advance(&mut self) {
        self.step = self.step.wrapping_add(1);
        self.current = self.color_at(self.step);
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn current(&self) -> Rgba {
        self.current
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColorKind {
    Constant(Rgba),
    /// Own RGB with the reference frame's alpha scaled by `alpha`
    AlphaOfParent { color: Rgba, alpha: f64 },
    /// Identical to the reference frame's color
    Inherited,
    /// Continuously cycling hue, advanced once per tick
    Rainbow(Rainbow),
    /// Same color as the bound target
    Copy,
}

/// A color constraint installed in a component's color slot
#[derive(Debug, Clone)]
pub struct ColorConstraint {
    kind: ColorKind,
    target: Option<ComponentId>,
    cache: ConstraintCache<Rgba>,
}

impl Default for ColorConstraint {
    fn default() -> Self {
        Self::constant(Rgba::WHITE)
    }
}

impl ColorConstraint {
    pub fn new(kind: ColorKind) -> Self {
        Self {
            kind,
            target: None,
            cache: ConstraintCache::new(Rgba::WHITE),
        }
    }

    pub fn constant(color: Rgba) -> Self {
        Self::new(ColorKind::Constant(color))
    }

    pub fn alpha_of_parent(color: Rgba, alpha: f64) -> Self {
        Self::new(ColorKind::AlphaOfParent { color, alpha })
    }

    pub fn inherited() -> Self {
        Self::new(ColorKind::Inherited)
    }

    pub fn rainbow(speed: f64, alpha: u8) -> Self {
        Self::new(ColorKind::Rainbow(Rainbow::new(speed, alpha)))
    }

    pub fn copy_of(target: ComponentId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(ColorKind::Copy)
        }
    }

    /// Resolve against `target` instead of the parent
    pub fn to(mut self, target: ComponentId) -> Result<Self, LayoutError> {
        self.bind_target(target)?;
        Ok(self)
    }

    pub fn bind_target(&mut self, target: ComponentId) -> Result<(), LayoutError> {
        if matches!(self.kind, ColorKind::Constant(_) | ColorKind::Rainbow(_)) {
            return Err(LayoutError::target_not_supported(self.name()));
        }
        self.target = Some(target);
        self.cache.invalidate();
        Ok(())
    }

    pub fn kind(&self) -> &ColorKind {
        &self.kind
    }

    pub fn target(&self) -> Option<ComponentId> {
        self.target
    }

    pub fn cache(&self) -> &ConstraintCache<Rgba> {
        &self.cache
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            ColorKind::Constant(_) => "constant",
            ColorKind::AlphaOfParent { .. } => "parent_alpha",
            ColorKind::Inherited => "inherit",
            ColorKind::Rainbow(_) => "rainbow",
            ColorKind::Copy => "copy",
        }
    }

    /// Rainbow colors change every tick, so their cached value is never trusted
    pub fn always_recalculates(&self) -> bool {
        matches!(self.kind, ColorKind::Rainbow(_))
    }

    /// Per-tick state advance
    pub fn animation_frame(&mut self) {
        if let ColorKind::Rainbow(rainbow) = &mut self.kind {
            rainbow.advance();
        }
        self.cache.invalidate();
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn compute(&self, tree: &UiTree, id: ComponentId) -> Result<Rgba, LayoutError> {
        match &self.kind {
            ColorKind::Constant(color) => Ok(*color),
            ColorKind::AlphaOfParent { color, alpha } => {
                let reference = self.reference_color(tree, id)?;
                let a = (f64::from(reference.a) * alpha).clamp(0.0, 255.0) as u8;
                Ok(color.with_alpha(a))
            }
            ColorKind::Inherited => self.reference_color(tree, id),
            ColorKind::Rainbow(rainbow) => Ok(rainbow.current()),
            ColorKind::Copy => match self.target {
                Some(target) => tree.resolve_color(target),
                None => Err(LayoutError::unresolvable(
                    self.name(),
                    tree.name(id)?,
                    "copy must be bound to another component",
                )),
            },
        }
    }

    /// The target's color, else the parent's, else white for roots
    fn reference_color(&self, tree: &UiTree, id: ComponentId) -> Result<Rgba, LayoutError> {
        match self.target.or(tree.parent(id)?) {
            Some(reference) => tree.resolve_color(reference),
            None => Ok(Rgba::WHITE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_advances_deterministically() {
        let mut first = Rainbow::new(50.0, 255);
        let mut second = Rainbow::new(50.0, 255);
        first.advance();
        second.advance();
        assert_eq!(first.current(), second.current());
        assert_eq!(first.step(), 1);
    }

    #[test]
    fn test_rainbow_changes_color_over_time() {
        let mut rainbow = Rainbow::new(1.0, 200);
        let before = rainbow.current();
        rainbow.advance();
        assert_ne!(before, rainbow.current());
        assert_eq!(rainbow.current().a, 200);
    }

    #[test]
    fn test_only_rainbow_always_recalculates() {
        assert!(ColorConstraint::rainbow(10.0, 255).always_recalculates());
        assert!(!ColorConstraint::inherited().always_recalculates());
    }
}
