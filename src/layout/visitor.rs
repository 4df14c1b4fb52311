//! Static dependency declaration
//!
//! Every constraint kind can report which slots it reads without computing anything. The cycle
//! detector in `graph.rs` builds on these declarations.

use crate::tree::{ComponentId, UiTree};

use super::color::{ColorConstraint, ColorKind};
use super::compute::sibling_position;
use super::constraint::{Constraint, ConstraintKind};
use super::error::LayoutError;
use super::types::Axis;

/// Receives the slots a constraint reads
pub trait ConstraintVisitor {
    fn visit_parent(&mut self, axis: Axis);
    fn visit_self(&mut self, axis: Axis);
    /// Sibling at `index` in the parent's child list
    fn visit_sibling(&mut self, index: usize, axis: Axis);
    fn visit_children(&mut self, axis: Axis);
    fn visit_component(&mut self, id: ComponentId, axis: Axis);
}

/// One declared read, relative to the component that owns the constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyEdge {
    Parent(Axis),
    SelfAxis(Axis),
    Sibling(usize, Axis),
    Children(Axis),
    Component(ComponentId, Axis),
}

/// Visitor that records declared edges in order
#[derive(Debug, Default)]
pub struct EdgeCollector {
    edges: Vec<DependencyEdge>,
}

impl EdgeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<DependencyEdge> {
        self.edges
    }
}

impl ConstraintVisitor for EdgeCollector {
    fn visit_parent(&mut self, axis: Axis) {
        self.edges.push(DependencyEdge::Parent(axis));
    }

    fn visit_self(&mut self, axis: Axis) {
        self.edges.push(DependencyEdge::SelfAxis(axis));
    }

    fn visit_sibling(&mut self, index: usize, axis: Axis) {
        self.edges.push(DependencyEdge::Sibling(index, axis));
    }

    fn visit_children(&mut self, axis: Axis) {
        self.edges.push(DependencyEdge::Children(axis));
    }

    fn visit_component(&mut self, id: ComponentId, axis: Axis) {
        self.edges.push(DependencyEdge::Component(id, axis));
    }
}

/// The bound target when present, the parent otherwise
fn visit_reference(visitor: &mut dyn ConstraintVisitor, target: Option<ComponentId>, axis: Axis) {
    match target {
        Some(target) => visitor.visit_component(target, axis),
        None => visitor.visit_parent(axis),
    }
}

/// The bound target when present, the owning component otherwise
fn visit_holder(visitor: &mut dyn ConstraintVisitor, target: Option<ComponentId>, axis: Axis) {
    match target {
        Some(target) => visitor.visit_component(target, axis),
        None => visitor.visit_self(axis),
    }
}

/// Children of the bound target, or of the owning component
fn visit_holder_children(
    tree: &UiTree,
    visitor: &mut dyn ConstraintVisitor,
    target: Option<ComponentId>,
    axis: Axis,
) -> Result<(), LayoutError> {
    match target {
        Some(target) => {
            for child in tree.children(target)? {
                visitor.visit_component(*child, axis);
            }
        }
        None => visitor.visit_children(axis),
    }
    Ok(())
}

impl Constraint {
    /// Report every slot this constraint reads when resolving `axis` of `id`
    pub fn declare_dependencies(
        &self,
        tree: &UiTree,
        id: ComponentId,
        axis: Axis,
        visitor: &mut dyn ConstraintVisitor,
    ) -> Result<(), LayoutError> {
        let slot_axis = axis;
        let axis = if axis == Axis::TextScale {
            Axis::Height
        } else {
            axis
        };
        let position = axis.position_axis();
        let size = axis.size_axis();
        let target = self.target();

        match self.kind() {
            &ConstraintKind::Pixels {
                align_opposite,
                align_outside,
                ..
            } => {
                if axis.is_position() {
                    visit_reference(visitor, target, position);
                    if align_opposite {
                        visit_reference(visitor, target, size);
                    }
                    if align_opposite != align_outside {
                        visitor.visit_self(size);
                    }
                }
            }
            ConstraintKind::Relative { .. } => match axis {
                Axis::X | Axis::Y => {
                    visit_reference(visitor, target, position);
                    visit_reference(visitor, target, size);
                }
                Axis::Radius => visit_reference(visitor, target, Axis::Width),
                _ => visit_reference(visitor, target, size),
            },
            ConstraintKind::Center => {
                visit_reference(visitor, target, position);
                visit_reference(visitor, target, size);
                if !tree.kind(id)?.is_position_center() {
                    visitor.visit_self(size);
                }
            }
            &ConstraintKind::Sibling { align_opposite, .. } => {
                if let Some(target) = target {
                    visitor.visit_component(target, position);
                    if align_opposite {
                        visitor.visit_self(size);
                    } else {
                        visitor.visit_component(target, size);
                    }
                    return Ok(());
                }
                if align_opposite {
                    visitor.visit_self(size);
                }
                match sibling_position(tree, id)? {
                    Some((index, _)) if index > 0 => {
                        for n in (0..index).rev() {
                            visitor.visit_sibling(n, position);
                            visitor.visit_sibling(n, size);
                        }
                    }
                    _ => {
                        visitor.visit_parent(position);
                        if align_opposite {
                            visitor.visit_parent(size);
                        }
                    }
                }
            }
            ConstraintKind::CramSibling { .. } => match sibling_position(tree, id)? {
                Some((index, _)) if index > 0 => {
                    visitor.visit_sibling(index - 1, Axis::X);
                    visitor.visit_sibling(index - 1, Axis::Width);
                    visitor.visit_self(Axis::Width);
                    visitor.visit_parent(Axis::X);
                    visitor.visit_parent(Axis::Width);
                    if axis == Axis::Y {
                        for n in (0..index).rev() {
                            visitor.visit_sibling(n, Axis::Y);
                            visitor.visit_sibling(n, Axis::Height);
                        }
                    }
                }
                _ => visitor.visit_parent(position),
            },
            ConstraintKind::ChildSum { .. } | ConstraintKind::ChildMax => {
                let read = if axis == Axis::Radius { Axis::Height } else { size };
                visit_holder_children(tree, visitor, target, read)?;
            }
            ConstraintKind::ChildRange => {
                visit_holder_children(tree, visitor, target, position)?;
                visit_holder_children(tree, visitor, target, size)?;
            }
            &ConstraintKind::Fill { use_siblings } => {
                let read = if axis == Axis::Radius { Axis::Radius } else { size };
                visit_reference(visitor, target, read);
                if use_siblings {
                    match target {
                        Some(target) => {
                            for other in tree.children(target)?.iter().filter(|c| **c != id) {
                                visitor.visit_component(*other, read);
                            }
                        }
                        None => {
                            if let Some((index, children)) = sibling_position(tree, id)? {
                                for n in (0..children.len()).filter(|n| *n != index) {
                                    visitor.visit_sibling(n, read);
                                }
                            }
                        }
                    }
                } else if axis == Axis::Radius {
                    visitor.visit_self(Axis::X);
                } else {
                    visit_reference(visitor, target, position);
                    visitor.visit_self(position);
                }
            }
            ConstraintKind::Aspect { .. } => {
                let read = match axis {
                    Axis::X => Axis::Y,
                    Axis::Y => Axis::X,
                    Axis::Width => Axis::Height,
                    Axis::Height => Axis::Width,
                    other => other,
                };
                visit_holder(visitor, target, read);
            }
            ConstraintKind::ImageAspect | ConstraintKind::TextAspect => {
                let read = if axis == Axis::Width {
                    Axis::Height
                } else {
                    Axis::Width
                };
                visitor.visit_self(read);
            }
            ConstraintKind::ScaledText { .. } => {}
            ConstraintKind::Add(..) | ConstraintKind::Subtract(..) => {
                for operand in self.operands() {
                    operand.declare_dependencies(tree, id, slot_axis, visitor)?;
                }
                if axis.is_position() {
                    visitor.visit_parent(position);
                }
            }
            ConstraintKind::Copy => {
                if let Some(target) = target {
                    visitor.visit_component(target, slot_axis);
                }
            }
            _ => {
                for operand in self.operands() {
                    operand.declare_dependencies(tree, id, slot_axis, visitor)?;
                }
            }
        }
        Ok(())
    }
}

impl ColorConstraint {
    /// Report the color slots this constraint reads
    pub fn declare_dependencies(&self, visitor: &mut dyn ConstraintVisitor) {
        match self.kind() {
            ColorKind::AlphaOfParent { .. } | ColorKind::Inherited => {
                visit_reference(visitor, self.target(), Axis::Color)
            }
            ColorKind::Copy => {
                if let Some(target) = self.target() {
                    visitor.visit_component(target, Axis::Color);
                }
            }
            ColorKind::Constant(_) | ColorKind::Rainbow(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ComponentKind;

    fn edges_of(tree: &UiTree, constraint: &Constraint, id: ComponentId, axis: Axis) -> Vec<DependencyEdge> {
        let mut collector = EdgeCollector::new();
        constraint
            .declare_dependencies(tree, id, axis, &mut collector)
            .unwrap();
        collector.into_edges()
    }

    #[test]
    fn test_center_skips_own_size_for_circles() {
        let mut tree = UiTree::default();
        let parent = tree.create("p", ComponentKind::Container);
        let block = tree.create("b", ComponentKind::Block);
        let circle = tree.create("c", ComponentKind::Circle);
        tree.add_child(parent, block).unwrap();
        tree.add_child(parent, circle).unwrap();

        let center = Constraint::center();
        assert_eq!(
            edges_of(&tree, &center, block, Axis::X),
            vec![
                DependencyEdge::Parent(Axis::X),
                DependencyEdge::Parent(Axis::Width),
                DependencyEdge::SelfAxis(Axis::Width),
            ]
        );
        assert_eq!(edges_of(&tree, &center, circle, Axis::X).len(), 2);
    }

    #[test]
    fn test_sibling_declares_all_previous_siblings() {
        let mut tree = UiTree::default();
        let parent = tree.create("p", ComponentKind::Container);
        let ids: Vec<_> = (0..3)
            .map(|i| {
                let id = tree.create(format!("c{}", i), ComponentKind::Block);
                tree.add_child(parent, id).unwrap();
                id
            })
            .collect();
        let edges = edges_of(&tree, &Constraint::sibling(0.0), ids[2], Axis::Y);
        assert_eq!(
            edges,
            vec![
                DependencyEdge::Sibling(1, Axis::Y),
                DependencyEdge::Sibling(1, Axis::Height),
                DependencyEdge::Sibling(0, Axis::Y),
                DependencyEdge::Sibling(0, Axis::Height),
            ]
        );
        let first = edges_of(&tree, &Constraint::sibling(0.0), ids[0], Axis::Y);
        assert_eq!(first, vec![DependencyEdge::Parent(Axis::Y)]);
    }

    #[test]
    fn test_combinators_union_operand_edges() {
        let mut tree = UiTree::default();
        let id = tree.create("a", ComponentKind::Block);
        let other = tree.create("b", ComponentKind::Block);
        let constraint = Constraint::aspect(1.0).max(Constraint::copy_of(other));
        assert_eq!(
            edges_of(&tree, &constraint, id, Axis::Width),
            vec![
                DependencyEdge::SelfAxis(Axis::Height),
                DependencyEdge::Component(other, Axis::Width),
            ]
        );
    }

    #[test]
    fn test_child_sum_declares_children() {
        let mut tree = UiTree::default();
        let id = tree.create("a", ComponentKind::Block);
        assert_eq!(
            edges_of(&tree, &Constraint::child_sum(2.0), id, Axis::Radius),
            vec![DependencyEdge::Children(Axis::Height)]
        );
    }

    #[test]
    fn test_color_inherit_reads_parent() {
        let mut collector = EdgeCollector::new();
        ColorConstraint::inherited().declare_dependencies(&mut collector);
        assert_eq!(collector.edges(), &[DependencyEdge::Parent(Axis::Color)]);
    }
}
