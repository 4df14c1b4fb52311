//! Resolution of constraint values through their caches
//!
//! Every read goes through [`UiTree::resolve_constraint`], which enforces the depth limit, lets
//! an installed [`ConstraintDebugger`] intercept the evaluation, and otherwise serves the cached
//! value or recomputes it.
//!
//! The depth limit is kept well inside what a thread stack can hold. When a top-level read runs
//! into it, the slots it depends on are resolved one at a time in dependency order, so a long
//! acyclic chain still resolves with shallow nesting. Only a real cycle reports the depth error.

use std::cell::Cell;
use std::rc::Rc;

use crate::tree::{ComponentId, UiTree};

use super::color::ColorConstraint;
use super::constraint::Constraint;
use super::debug::ConstraintDebugger;
use super::error::LayoutError;
use super::graph::DependencyGraph;
use super::types::{Axis, Rect, Rgba};

/// Counts nesting of resolutions and unwinds it on drop
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(tree: &'a UiTree, id: ComponentId, axis: Axis) -> Result<Self, LayoutError> {
        let limit = tree.config.max_resolution_depth;
        let depth = tree.depth.get() + 1;
        if depth > limit {
            return Err(LayoutError::ResolutionDepthExceeded {
                component: id,
                name: tree.display_name(id),
                axis,
                depth: limit,
            });
        }
        tree.depth.set(depth);
        Ok(Self { depth: &tree.depth })
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl UiTree {
    /// Resolved value of a scalar axis, honoring any in-flight animation
    pub fn resolve(&self, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
        match self.resolve_slot(id, axis) {
            Err(err) if err.is_depth_exceeded() && self.depth.get() == 0 => {
                self.warm_dependencies(id, axis, err)?;
                self.resolve_slot(id, axis)
            }
            result => result,
        }
    }

    fn resolve_slot(&self, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
        let slot = self
            .constraints(id)?
            .scalar(axis)
            .ok_or_else(|| LayoutError::unsupported_axis("scalar resolution", axis))?;
        match slot.animation() {
            Some(animation) => animation.value(self, id, axis),
            None => self.resolve_constraint(slot.constraint(), id, axis),
        }
    }

    /// Resolve a specific constraint on behalf of component `id`
    pub fn resolve_constraint(
        &self,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        let _guard = DepthGuard::enter(self, id, axis)?;
        if self.debugging.get() {
            let debugger = self.debugger.borrow().clone();
            if let Some(debugger) = debugger {
                return debugger.evaluate(self, constraint, id, axis);
            }
        }
        self.resolve_cached(constraint, id, axis)
    }

    /// The cache path: the stored value when valid, otherwise a fresh computation
    pub fn resolve_cached(
        &self,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        constraint
            .cache()
            .get_or_compute(|| self.compute_fresh(constraint, id, axis))
    }

    /// Compute without consulting the constraint's own cache, applying pixel rounding
    pub fn compute_fresh(
        &self,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        let value = constraint.compute(self, id, axis)?;
        if axis == Axis::TextScale {
            Ok(value)
        } else {
            Ok(self.config.round_to_real_pixels(value))
        }
    }

    /// Resolved color, honoring any in-flight animation
    pub fn resolve_color(&self, id: ComponentId) -> Result<Rgba, LayoutError> {
        match self.resolve_color_slot(id) {
            Err(err) if err.is_depth_exceeded() && self.depth.get() == 0 => {
                self.warm_dependencies(id, Axis::Color, err)?;
                self.resolve_color_slot(id)
            }
            result => result,
        }
    }

    fn resolve_color_slot(&self, id: ComponentId) -> Result<Rgba, LayoutError> {
        let slot = self.constraints(id)?.color();
        match slot.animation() {
            Some(animation) => animation.value(self, id),
            None => self.resolve_color_constraint(slot.constraint(), id),
        }
    }

    pub fn resolve_color_constraint(
        &self,
        constraint: &ColorConstraint,
        id: ComponentId,
    ) -> Result<Rgba, LayoutError> {
        let _guard = DepthGuard::enter(self, id, Axis::Color)?;
        if constraint.always_recalculates() {
            let color = constraint.compute(self, id)?;
            constraint.cache().store(color);
            return Ok(color);
        }
        constraint
            .cache()
            .get_or_compute(|| constraint.compute(self, id))
    }

    /// Fill the caches `id.axis` reads, dependencies first
    ///
    /// `exceeded` is handed back unchanged when the slots form a cycle.
    fn warm_dependencies(
        &self,
        id: ComponentId,
        axis: Axis,
        exceeded: LayoutError,
    ) -> Result<(), LayoutError> {
        let graph = DependencyGraph::from_root(self, id, axis)?;
        if graph.find_cycle().is_some() {
            return Err(exceeded);
        }
        let order = graph.topological_order(self)?;
        tracing::debug!(
            slots = order.len(),
            "resolving '{}'.{} in dependency order",
            self.display_name(id),
            axis
        );
        for node in order {
            if node.axis == Axis::Color {
                self.resolve_color_slot(node.component)?;
            } else {
                self.resolve_slot(node.component, node.axis)?;
            }
        }
        Ok(())
    }

    /// Run `f` with `debugger` intercepting every scalar resolution
    ///
    /// The previous debugger, if any, is restored afterwards.
    pub fn with_debugger<R>(
        &self,
        debugger: Rc<dyn ConstraintDebugger>,
        f: impl FnOnce(&UiTree) -> R,
    ) -> R {
        let previous = self.debugger.replace(Some(debugger));
        let was_debugging = self.debugging.replace(true);
        let result = f(self);
        self.debugger.replace(previous);
        self.debugging.set(was_debugging);
        result
    }

    pub fn get_left(&self, id: ComponentId) -> Result<f64, LayoutError> {
        let x = self.resolve(id, Axis::X)?;
        if self.kind(id)?.is_position_center() {
            Ok(x - self.get_radius(id)?)
        } else {
            Ok(x)
        }
    }

    pub fn get_top(&self, id: ComponentId) -> Result<f64, LayoutError> {
        let y = self.resolve(id, Axis::Y)?;
        if self.kind(id)?.is_position_center() {
            Ok(y - self.get_radius(id)?)
        } else {
            Ok(y)
        }
    }

    pub fn get_width(&self, id: ComponentId) -> Result<f64, LayoutError> {
        if self.kind(id)?.is_position_center() {
            Ok(self.get_radius(id)? * 2.0)
        } else {
            self.resolve(id, Axis::Width)
        }
    }

    pub fn get_height(&self, id: ComponentId) -> Result<f64, LayoutError> {
        if self.kind(id)?.is_position_center() {
            Ok(self.get_radius(id)? * 2.0)
        } else {
            self.resolve(id, Axis::Height)
        }
    }

    pub fn get_right(&self, id: ComponentId) -> Result<f64, LayoutError> {
        Ok(self.get_left(id)? + self.get_width(id)?)
    }

    pub fn get_bottom(&self, id: ComponentId) -> Result<f64, LayoutError> {
        Ok(self.get_top(id)? + self.get_height(id)?)
    }

    pub fn get_radius(&self, id: ComponentId) -> Result<f64, LayoutError> {
        self.resolve(id, Axis::Radius)
    }

    pub fn get_text_scale(&self, id: ComponentId) -> Result<f64, LayoutError> {
        self.resolve(id, Axis::TextScale)
    }

    pub fn get_color(&self, id: ComponentId) -> Result<Rgba, LayoutError> {
        self.resolve_color(id)
    }

    /// Bounding rectangle in window coordinates
    pub fn bounds(&self, id: ComponentId) -> Result<Rect, LayoutError> {
        Ok(Rect::new(
            self.get_left(id)?,
            self.get_top(id)?,
            self.get_width(id)?,
            self.get_height(id)?,
        ))
    }

    /// Mark every cached value in the tree as stale
    pub fn invalidate_all(&self) {
        for id in self.ids() {
            if let Ok(constraints) = self.constraints(id) {
                constraints.invalidate();
            }
        }
    }

    /// Mark every cached value of one component as stale
    pub fn invalidate(&self, id: ComponentId) -> Result<(), LayoutError> {
        self.constraints(id)?.invalidate();
        Ok(())
    }

    pub fn invalidate_subtree(&self, id: ComponentId) -> Result<(), LayoutError> {
        for member in self.descendants(id)? {
            self.invalidate(member)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use crate::tree::ComponentKind;

    #[test]
    fn test_cache_serves_until_invalidated() {
        let mut tree = UiTree::default();
        let id = tree.create("a", ComponentKind::Block);
        tree.set_width(id, Constraint::pixels(10.0)).unwrap();
        assert_eq!(tree.resolve(id, Axis::Width).unwrap(), 10.0);
        assert_eq!(tree.resolve(id, Axis::Width).unwrap(), 10.0);
        let slot = tree.constraints(id).unwrap().scalar(Axis::Width).unwrap();
        assert_eq!(slot.constraint().cache().computations(), 1);
        tree.invalidate_all();
        tree.resolve(id, Axis::Width).unwrap();
        let slot = tree.constraints(id).unwrap().scalar(Axis::Width).unwrap();
        assert_eq!(slot.constraint().cache().computations(), 2);
    }

    #[test]
    fn test_depth_limit_turns_cycle_into_error() {
        let mut tree = UiTree::new(LayoutConfig::default().with_max_resolution_depth(32));
        let id = tree.create("loop", ComponentKind::Block);
        tree.set_width(id, Constraint::aspect(1.0)).unwrap();
        tree.set_height(id, Constraint::aspect(1.0)).unwrap();
        let err = tree.get_width(id).unwrap_err();
        assert!(err.is_depth_exceeded(), "unexpected error: {}", err);
        assert_eq!(tree.depth.get(), 0);
    }

    #[test]
    fn test_deep_acyclic_chain_falls_back_to_dependency_order() {
        let mut tree = UiTree::new(LayoutConfig::default().with_max_resolution_depth(8));
        let first = tree.create("link-0", ComponentKind::Block);
        tree.set_width(first, Constraint::pixels(7.0)).unwrap();
        let mut last = first;
        for i in 1..100 {
            let link = tree.create(format!("link-{i}"), ComponentKind::Block);
            tree.set_width(link, Constraint::copy_of(last)).unwrap();
            last = link;
        }
        assert_eq!(tree.get_width(last).unwrap(), 7.0);
        assert_eq!(tree.depth.get(), 0);
    }

    #[test]
    fn test_circle_geometry_uses_center() {
        let mut tree = UiTree::default();
        let id = tree.create("dot", ComponentKind::Circle);
        tree.set_x(id, Constraint::pixels(50.0)).unwrap();
        tree.set_y(id, Constraint::pixels(40.0)).unwrap();
        tree.set_radius(id, Constraint::pixels(10.0)).unwrap();
        let bounds = tree.bounds(id).unwrap();
        assert_eq!(bounds, Rect::new(40.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn test_pixel_rounding_skips_text_scale() {
        let mut tree = UiTree::new(LayoutConfig::default().with_pixel_scale(1.0));
        let id = tree.create("a", ComponentKind::Block);
        tree.set_width(id, Constraint::pixels(10.4)).unwrap();
        tree.set_text_scale(id, Constraint::pixels(1.25)).unwrap();
        assert_eq!(tree.get_width(id).unwrap(), 10.0);
        assert_eq!(tree.get_text_scale(id).unwrap(), 1.25);
    }

    #[test]
    fn test_color_resolution_inherits() {
        let mut tree = UiTree::default();
        let parent = tree.create("p", ComponentKind::Block);
        let child = tree.create("c", ComponentKind::Block);
        tree.add_child(parent, child).unwrap();
        tree.set_color(parent, ColorConstraint::constant(Rgba::rgb(10, 20, 30)))
            .unwrap();
        tree.set_color(child, ColorConstraint::inherited()).unwrap();
        assert_eq!(tree.get_color(child).unwrap(), Rgba::rgb(10, 20, 30));
    }
}
