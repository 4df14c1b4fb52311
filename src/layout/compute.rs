//! Evaluation of scalar constraints
//!
//! "Reference frame" below means the bound target if there is one, otherwise the parent. A root
//! component with no target resolves against the viewport rectangle.

use crate::tree::{ComponentId, ComponentKind, UiTree};

use super::constraint::{Constraint, ConstraintKind};
use super::error::LayoutError;
use super::types::Axis;

/// The rectangle a constraint measures against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    Component(ComponentId),
    Viewport,
}

impl Frame {
    /// Explicit target, else parent, else the viewport
    pub(crate) fn of(
        tree: &UiTree,
        id: ComponentId,
        target: Option<ComponentId>,
    ) -> Result<Frame, LayoutError> {
        Ok(match target.or(tree.parent(id)?) {
            Some(reference) => Frame::Component(reference),
            None => Frame::Viewport,
        })
    }

    fn start(self, tree: &UiTree, axis: Axis) -> Result<f64, LayoutError> {
        match self {
            Frame::Component(id) => start(tree, id, axis),
            Frame::Viewport => Ok(0.0),
        }
    }

    fn extent(self, tree: &UiTree, axis: Axis) -> Result<f64, LayoutError> {
        match self {
            Frame::Component(id) => extent(tree, id, axis),
            Frame::Viewport => {
                let (width, height) = tree.config.viewport;
                Ok(if is_horizontal(axis) { width } else { height })
            }
        }
    }

    fn end(self, tree: &UiTree, axis: Axis) -> Result<f64, LayoutError> {
        Ok(self.start(tree, axis)? + self.extent(tree, axis)?)
    }

    fn radius(self, tree: &UiTree) -> Result<f64, LayoutError> {
        match self {
            Frame::Component(id) => tree.get_radius(id),
            Frame::Viewport => {
                let (width, height) = tree.config.viewport;
                Ok(width.min(height) / 2.0)
            }
        }
    }

    fn children(self, tree: &UiTree) -> Result<Vec<ComponentId>, LayoutError> {
        match self {
            Frame::Component(id) => Ok(tree.children(id)?.to_vec()),
            Frame::Viewport => Ok(Vec::new()),
        }
    }
}

fn is_horizontal(axis: Axis) -> bool {
    matches!(axis, Axis::X | Axis::Width)
}

/// Leading edge of a component along the direction of `axis`
fn start(tree: &UiTree, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
    if is_horizontal(axis) {
        tree.get_left(id)
    } else {
        tree.get_top(id)
    }
}

/// Size of a component along the direction of `axis`
fn extent(tree: &UiTree, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
    if is_horizontal(axis) {
        tree.get_width(id)
    } else {
        tree.get_height(id)
    }
}

fn end(tree: &UiTree, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
    Ok(start(tree, id, axis)? + extent(tree, id, axis)?)
}

/// Position of `id` among its siblings plus the sibling list; `None` when detached or a root
pub(crate) fn sibling_position(
    tree: &UiTree,
    id: ComponentId,
) -> Result<Option<(usize, Vec<ComponentId>)>, LayoutError> {
    match (tree.parent(id)?, tree.index_in_parent(id)?) {
        (Some(parent), Some(index)) => Ok(Some((index, tree.children(parent)?.to_vec()))),
        _ => Ok(None),
    }
}

/// Furthest trailing edge of the run of siblings sharing the last one's leading edge
fn trailing_point(tree: &UiTree, preceding: &[ComponentId], axis: Axis) -> Result<f64, LayoutError> {
    let Some(&sibling) = preceding.last() else {
        return Ok(0.0);
    };
    let sibling_start = start(tree, sibling, axis)?;
    let mut point = end(tree, sibling, axis)?;
    for &child in preceding.iter().rev() {
        if start(tree, child, axis)? != sibling_start {
            break;
        }
        point = point.max(end(tree, child, axis)?);
    }
    Ok(point)
}

/// Furthest leading edge of the run of siblings sharing the last one's trailing edge
fn leading_point(tree: &UiTree, preceding: &[ComponentId], axis: Axis) -> Result<f64, LayoutError> {
    let Some(&sibling) = preceding.last() else {
        return Ok(0.0);
    };
    let sibling_end = end(tree, sibling, axis)?;
    let mut point = start(tree, sibling, axis)?;
    for &child in preceding.iter().rev() {
        if end(tree, child, axis)? != sibling_end {
            break;
        }
        point = point.min(start(tree, child, axis)?);
    }
    Ok(point)
}

/// Whether `id` still fits on the line of the sibling before it
fn cram_fits(
    tree: &UiTree,
    id: ComponentId,
    sibling: ComponentId,
    padding: f64,
) -> Result<bool, LayoutError> {
    let frame = Frame::of(tree, id, None)?;
    let needed = end(tree, sibling, Axis::X)? + tree.get_width(id)? + padding;
    Ok(needed <= frame.end(tree, Axis::X)? + tree.config.cram_epsilon)
}

/// Padding a child's position constraint adds to its parent's child-based size
pub(crate) fn padding_contribution(
    tree: &UiTree,
    child: ComponentId,
    axis: Axis,
) -> Result<f64, LayoutError> {
    let position_axis = axis.position_axis();
    let Some(slot) = tree.constraints(child)?.scalar(position_axis) else {
        return Ok(0.0);
    };
    if slot.animation().is_some() {
        return Ok(0.0);
    }
    let constraint = slot.constraint();
    let siblings = sibling_position(tree, child)?;
    match *constraint.kind() {
        ConstraintKind::Sibling { padding, .. } => {
            let first = matches!(siblings, None | Some((0, _)));
            Ok(if first && constraint.target().is_none() {
                0.0
            } else {
                padding
            })
        }
        ConstraintKind::CramSibling { padding } => match siblings {
            Some((index, children)) if index > 0 => {
                let fits = cram_fits(tree, child, children[index - 1], padding)?;
                // Horizontal padding only separates crammed items; vertical only separates lines
                let counts = if position_axis == Axis::X { fits } else { !fits };
                Ok(if counts { padding } else { 0.0 })
            }
            _ => Ok(0.0),
        },
        _ => Ok(0.0),
    }
}

fn text_of<'a>(tree: &'a UiTree, id: ComponentId, constraint: &str) -> Result<&'a str, LayoutError> {
    match tree.kind(id)? {
        ComponentKind::Text { text } => Ok(text.as_str()),
        _ => Err(LayoutError::unresolvable(
            constraint,
            tree.name(id)?,
            "only text components can be measured",
        )),
    }
}

impl Constraint {
    /// Compute a fresh value for `axis` of component `id`, bypassing this constraint's cache
    ///
    /// Other components and operands are read through the tree, so their caches still apply.
    pub fn compute(&self, tree: &UiTree, id: ComponentId, axis: Axis) -> Result<f64, LayoutError> {
        if !self.supports(axis) {
            return Err(LayoutError::unsupported_axis(self.name(), axis));
        }
        // Size-style kinds read their text scale the way they read a height
        let slot_axis = axis;
        let axis = if axis == Axis::TextScale {
            Axis::Height
        } else {
            axis
        };
        let operand = |constraint: &Constraint| tree.resolve_constraint(constraint, id, slot_axis);

        match self.kind() {
            &ConstraintKind::Pixels {
                value,
                align_opposite,
                align_outside,
            } => {
                if !axis.is_position() {
                    return Ok(value);
                }
                let frame = Frame::of(tree, id, self.target())?;
                Ok(match (align_opposite, align_outside) {
                    (false, false) => frame.start(tree, axis)? + value,
                    (false, true) => frame.start(tree, axis)? - extent(tree, id, axis)? - value,
                    (true, false) => frame.end(tree, axis)? - value - extent(tree, id, axis)?,
                    (true, true) => frame.end(tree, axis)? + value,
                })
            }
            &ConstraintKind::Relative { fraction } => {
                let frame = Frame::of(tree, id, self.target())?;
                match axis {
                    Axis::X | Axis::Y => {
                        Ok(frame.start(tree, axis)? + frame.extent(tree, axis)? * fraction)
                    }
                    Axis::Radius => Ok(frame.extent(tree, Axis::Width)? * fraction / 2.0),
                    _ => Ok(frame.extent(tree, axis)? * fraction),
                }
            }
            ConstraintKind::Center => {
                let frame = Frame::of(tree, id, self.target())?;
                let half = frame.extent(tree, axis)? / 2.0;
                let offset = if tree.kind(id)?.is_position_center() {
                    half
                } else {
                    half - extent(tree, id, axis)? / 2.0
                };
                Ok(frame.start(tree, axis)? + tree.config.round_to_real_pixels(offset))
            }
            &ConstraintKind::Sibling {
                padding,
                align_opposite,
            } => self.compute_sibling(tree, id, axis, padding, align_opposite),
            &ConstraintKind::CramSibling { padding } => {
                let frame = Frame::of(tree, id, None)?;
                let Some((index, children)) = sibling_position(tree, id)?.filter(|(i, _)| *i > 0)
                else {
                    return frame.start(tree, axis);
                };
                let sibling = children[index - 1];
                let fits = cram_fits(tree, id, sibling, padding)?;
                match (axis, fits) {
                    (Axis::X, true) => Ok(end(tree, sibling, Axis::X)? + padding),
                    (Axis::X, false) => frame.start(tree, Axis::X),
                    (_, true) => start(tree, sibling, Axis::Y),
                    (_, false) => Ok(trailing_point(tree, &children[..index], Axis::Y)? + padding),
                }
            }
            &ConstraintKind::ChildSum { padding } => {
                let children = tree.children(self.target().unwrap_or(id))?.to_vec();
                if children.is_empty() {
                    return Ok(0.0);
                }
                if axis == Axis::Radius {
                    let mut total = 0.0;
                    for child in &children {
                        total += tree.get_height(*child)?;
                    }
                    return Ok(total * 2.0);
                }
                let mut total = (children.len() - 1) as f64 * padding;
                for child in &children {
                    total += extent(tree, *child, axis)? + padding_contribution(tree, *child, axis)?;
                }
                Ok(total)
            }
            ConstraintKind::ChildMax => {
                let children = tree.children(self.target().unwrap_or(id))?.to_vec();
                if axis == Axis::Radius {
                    let mut largest: Option<f64> = None;
                    for child in &children {
                        let height = tree.get_height(*child)?;
                        largest = Some(largest.map_or(height, |l| l.max(height)));
                    }
                    return Ok(largest.unwrap_or(0.0) * 2.0);
                }
                let mut best: Option<(f64, f64)> = None;
                for child in &children {
                    let size = extent(tree, *child, axis)?;
                    let key = size + padding_contribution(tree, *child, axis)?;
                    if best.map_or(true, |(best_key, _)| key > best_key) {
                        best = Some((key, size));
                    }
                }
                Ok(best.map_or(0.0, |(_, size)| size))
            }
            ConstraintKind::ChildRange => {
                let children = tree.children(self.target().unwrap_or(id))?.to_vec();
                if children.is_empty() {
                    return Ok(0.0);
                }
                let mut lowest = f64::INFINITY;
                let mut highest = f64::NEG_INFINITY;
                for child in &children {
                    lowest = lowest.min(start(tree, *child, axis)?);
                    highest = highest.max(end(tree, *child, axis)?);
                }
                Ok((highest - lowest).max(0.0))
            }
            &ConstraintKind::Fill { use_siblings } => {
                let frame = Frame::of(tree, id, self.target())?;
                match (axis, use_siblings) {
                    (Axis::Radius, true) => {
                        let mut remaining = frame.radius(tree)?;
                        for other in frame.children(tree)?.into_iter().filter(|c| *c != id) {
                            remaining -= tree.get_radius(other)?;
                        }
                        Ok(remaining)
                    }
                    (Axis::Radius, false) => Ok((frame.radius(tree)? - tree.get_left(id)?) / 2.0),
                    (_, true) => {
                        let mut remaining = frame.extent(tree, axis)?;
                        for other in frame.children(tree)?.into_iter().filter(|c| *c != id) {
                            remaining -= extent(tree, other, axis)?;
                        }
                        Ok(remaining)
                    }
                    (_, false) => Ok(frame.end(tree, axis)? - start(tree, id, axis)?),
                }
            }
            &ConstraintKind::Aspect { ratio } => {
                let holder = self.target().unwrap_or(id);
                let base = match axis {
                    Axis::X => tree.get_top(holder)?,
                    Axis::Y => tree.get_left(holder)?,
                    Axis::Width => tree.get_height(holder)?,
                    Axis::Height => tree.get_width(holder)?,
                    _ => tree.get_radius(holder)?,
                };
                Ok(base * ratio)
            }
            ConstraintKind::ImageAspect => {
                let &ComponentKind::Image { width, height } = tree.kind(id)? else {
                    return Err(LayoutError::unresolvable(
                        self.name(),
                        tree.name(id)?,
                        "only image components have natural dimensions",
                    ));
                };
                if width <= 0.0 || height <= 0.0 {
                    return Err(LayoutError::unresolvable(
                        self.name(),
                        tree.name(id)?,
                        "image has no area",
                    ));
                }
                match axis {
                    Axis::Width => Ok(tree.get_height(id)? * width / height),
                    _ => Ok(tree.get_width(id)? * height / width),
                }
            }
            ConstraintKind::TextAspect => {
                let text = text_of(tree, id, self.name())?;
                let string_width = tree.string_width(id, text, 1.0)?;
                let line_height = tree.font(id)?.line_height(1.0);
                match axis {
                    Axis::Width if line_height > 0.0 => {
                        Ok(string_width * tree.get_height(id)? / line_height)
                    }
                    Axis::Height if string_width > 0.0 => {
                        Ok(line_height * tree.get_width(id)? / string_width)
                    }
                    _ => Ok(0.0),
                }
            }
            &ConstraintKind::ScaledText { scale } => {
                let text = text_of(tree, id, self.name())?;
                match axis {
                    Axis::Width => tree.string_width(id, text, scale),
                    _ => Ok(tree.font(id)?.string_height(text, scale)),
                }
            }
            ConstraintKind::Add(a, b) => {
                let sum = operand(a)? + operand(b)?;
                if axis.is_position() {
                    Ok(sum - Frame::of(tree, id, None)?.start(tree, axis)?)
                } else {
                    Ok(sum)
                }
            }
            ConstraintKind::Subtract(a, b) => {
                let difference = operand(a)? - operand(b)?;
                if axis.is_position() {
                    Ok(difference + Frame::of(tree, id, None)?.start(tree, axis)?)
                } else {
                    Ok(difference)
                }
            }
            ConstraintKind::Scale(inner, factor) => Ok(operand(inner)? * factor),
            ConstraintKind::Min(a, b) => Ok(operand(a)?.min(operand(b)?)),
            ConstraintKind::Max(a, b) => Ok(operand(a)?.max(operand(b)?)),
            ConstraintKind::CoerceAtLeast(value, min) => Ok(operand(value)?.max(operand(min)?)),
            ConstraintKind::CoerceAtMost(value, max) => Ok(operand(value)?.min(operand(max)?)),
            ConstraintKind::CoerceIn { value, min, max } => {
                let value = operand(value)?;
                let (min, max) = (operand(min)?, operand(max)?);
                Ok(value.max(min).min(max))
            }
            ConstraintKind::Copy => match self.target() {
                Some(target) => tree.resolve(target, slot_axis),
                None => Err(LayoutError::unresolvable(
                    self.name(),
                    tree.name(id)?,
                    "copy must be bound to another component",
                )),
            },
            ConstraintKind::Round(inner, mode) => Ok(mode.apply(operand(inner)?)),
        }
    }

    fn compute_sibling(
        &self,
        tree: &UiTree,
        id: ComponentId,
        axis: Axis,
        padding: f64,
        align_opposite: bool,
    ) -> Result<f64, LayoutError> {
        if let Some(target) = self.target() {
            return if align_opposite {
                Ok(start(tree, target, axis)? - extent(tree, id, axis)? - padding)
            } else {
                Ok(end(tree, target, axis)? + padding)
            };
        }
        let frame = Frame::of(tree, id, None)?;
        match sibling_position(tree, id)? {
            Some((index, children)) if index > 0 => {
                let preceding = &children[..index];
                if align_opposite {
                    Ok(leading_point(tree, preceding, axis)? - extent(tree, id, axis)? - padding)
                } else {
                    Ok(trailing_point(tree, preceding, axis)? + padding)
                }
            }
            _ if align_opposite => Ok(frame.end(tree, axis)? - extent(tree, id, axis)?),
            _ => frame.start(tree, axis),
        }
    }
}
