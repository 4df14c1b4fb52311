//! Static dependency graph over constraint slots
//!
//! The graph is built from declared dependencies only; nothing is evaluated while building or
//! searching it. Both construction and cycle search use explicit worklists, so arbitrarily deep
//! chains cannot overflow the stack.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::tree::{ComponentId, UiTree};

use super::error::LayoutError;
use super::types::{Axis, Rgba};
use super::visitor::{DependencyEdge, EdgeCollector};

/// One constraint slot: a component and one of its axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolverNode {
    pub component: ComponentId,
    pub axis: Axis,
}

impl ResolverNode {
    pub fn new(component: ComponentId, axis: Axis) -> Self {
        Self { component, axis }
    }

    /// `name.axis` label used in cycle reports
    pub fn label(&self, tree: &UiTree) -> String {
        format!("{}.{}", tree.display_name(self.component), self.axis)
    }
}

impl fmt::Display for ResolverNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.axis)
    }
}

/// Slots a node reads, derived from its installed constraint (or animation end constraint)
fn dependencies_of(tree: &UiTree, node: ResolverNode) -> Result<Vec<ResolverNode>, LayoutError> {
    let id = node.component;
    let mut collector = EdgeCollector::new();
    let constraints = tree.constraints(id)?;
    match constraints.scalar(node.axis) {
        Some(slot) => {
            let constraint = match slot.animation() {
                Some(animation) => animation.end(),
                None => slot.constraint(),
            };
            constraint.declare_dependencies(tree, id, node.axis, &mut collector)?;
        }
        None => {
            let slot = constraints.color();
            match slot.animation() {
                Some(animation) => animation.end().declare_dependencies(&mut collector),
                None => slot.constraint().declare_dependencies(&mut collector),
            }
        }
    }

    let parent = tree.parent(id)?;
    let mut targets = Vec::new();
    for edge in collector.into_edges() {
        match edge {
            DependencyEdge::Parent(axis) => {
                if let Some(parent) = parent {
                    targets.push(ResolverNode::new(parent, axis));
                }
            }
            DependencyEdge::SelfAxis(axis) => targets.push(ResolverNode::new(id, axis)),
            DependencyEdge::Sibling(index, axis) => {
                if let Some(sibling) = parent
                    .map(|p| tree.children(p))
                    .transpose()?
                    .and_then(|children| children.get(index).copied())
                {
                    targets.push(ResolverNode::new(sibling, axis));
                }
            }
            DependencyEdge::Children(axis) => {
                for child in tree.children(id)? {
                    targets.push(ResolverNode::new(*child, axis));
                }
            }
            DependencyEdge::Component(other, axis) => {
                tree.node(other)?;
                targets.push(ResolverNode::new(other, axis));
            }
        }
    }

    // Circle geometry is derived from the center and radius slots
    let mut resolved = Vec::with_capacity(targets.len());
    for target in targets {
        if tree.kind(target.component)?.is_position_center() {
            match target.axis {
                Axis::Width | Axis::Height => {
                    resolved.push(ResolverNode::new(target.component, Axis::Radius));
                    continue;
                }
                Axis::X | Axis::Y => {
                    resolved.push(ResolverNode::new(target.component, Axis::Radius));
                }
                _ => {}
            }
        }
        resolved.push(target);
    }
    resolved.sort();
    resolved.dedup();
    Ok(resolved)
}

/// Directed graph from each slot to the slots it reads
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<ResolverNode, Vec<ResolverNode>>,
}

impl DependencyGraph {
    /// Everything reachable from one slot
    pub fn from_root(tree: &UiTree, id: ComponentId, axis: Axis) -> Result<Self, LayoutError> {
        Self::from_nodes(tree, [ResolverNode::new(id, axis)])
    }

    /// Every axis of every live component
    pub fn from_tree(tree: &UiTree) -> Result<Self, LayoutError> {
        let nodes = tree
            .ids()
            .into_iter()
            .flat_map(|id| Axis::ALL.into_iter().map(move |axis| ResolverNode::new(id, axis)));
        Self::from_nodes(tree, nodes)
    }

    /// Everything reachable from a set of starting slots
    pub fn from_nodes(
        tree: &UiTree,
        roots: impl IntoIterator<Item = ResolverNode>,
    ) -> Result<Self, LayoutError> {
        let mut graph = Self::default();
        let mut worklist: Vec<ResolverNode> = roots.into_iter().collect();
        while let Some(node) = worklist.pop() {
            if graph.edges.contains_key(&node) {
                continue;
            }
            let dependencies = dependencies_of(tree, node)?;
            worklist.extend(
                dependencies
                    .iter()
                    .filter(|dep| !graph.edges.contains_key(dep))
                    .copied(),
            );
            graph.edges.insert(node, dependencies);
        }
        Ok(graph)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ResolverNode> {
        self.edges.keys()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn dependencies(&self, node: &ResolverNode) -> &[ResolverNode] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First cycle found, as a path that ends on the node it started from
    pub fn find_cycle(&self) -> Option<Vec<ResolverNode>> {
        let mut finished = BTreeSet::new();
        self.edges
            .keys()
            .find_map(|node| self.search(*node, &mut finished))
    }

    /// A cycle reachable from `start`, if any
    pub fn find_cycle_from(&self, start: ResolverNode) -> Option<Vec<ResolverNode>> {
        self.search(start, &mut BTreeSet::new())
    }

    /// Iterative depth-first search; `finished` nodes are known to reach no cycle
    fn search(
        &self,
        start: ResolverNode,
        finished: &mut BTreeSet<ResolverNode>,
    ) -> Option<Vec<ResolverNode>> {
        if finished.contains(&start) {
            return None;
        }
        let mut path: Vec<ResolverNode> = vec![start];
        let mut on_path: BTreeSet<ResolverNode> = BTreeSet::from([start]);
        let mut cursors: Vec<usize> = vec![0];

        while let Some(node) = path.last().copied() {
            let depth = path.len() - 1;
            let next = self.dependencies(&node).get(cursors[depth]).copied();
            cursors[depth] += 1;
            match next {
                Some(dep) if on_path.contains(&dep) => {
                    let from = path.iter().position(|n| *n == dep).unwrap_or(0);
                    let mut cycle = path[from..].to_vec();
                    cycle.push(dep);
                    return Some(cycle);
                }
                Some(dep) if !finished.contains(&dep) => {
                    path.push(dep);
                    on_path.insert(dep);
                    cursors.push(0);
                }
                Some(_) => {}
                None => {
                    path.pop();
                    cursors.pop();
                    on_path.remove(&node);
                    finished.insert(node);
                }
            }
        }
        None
    }

    /// Dependencies before dependents, or the stuck nodes if the graph has a cycle
    pub fn topological_order(&self, tree: &UiTree) -> Result<Vec<ResolverNode>, LayoutError> {
        let mut in_degree: BTreeMap<ResolverNode, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<ResolverNode, Vec<ResolverNode>> = BTreeMap::new();

        for (node, deps) in &self.edges {
            in_degree.entry(*node).or_insert(0);
            for dep in deps {
                in_degree.entry(*dep).or_insert(0);
                *in_degree.entry(*node).or_insert(0) += 1;
                dependents.entry(*dep).or_default().push(*node);
            }
        }

        // Kahn's algorithm
        let mut queue: Vec<ResolverNode> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(node, _)| *node)
            .collect();
        queue.reverse();

        let mut result = Vec::with_capacity(in_degree.len());
        while let Some(node) = queue.pop() {
            result.push(node);
            if let Some(waiting) = dependents.get(&node) {
                for dependent in waiting {
                    if let Some(deg) = in_degree.get_mut(dependent) {
                        *deg -= 1;
                        if *deg == 0 {
                            queue.push(*dependent);
                        }
                    }
                }
            }
        }

        if result.len() < in_degree.len() {
            let remaining: Vec<String> = in_degree
                .iter()
                .filter(|(_, &deg)| deg > 0)
                .map(|(node, _)| node.label(tree))
                .collect();
            return Err(LayoutError::circular(remaining));
        }
        Ok(result)
    }

    /// Render a cycle as `name.axis -> ... -> name.axis`
    pub fn describe(tree: &UiTree, cycle: &[ResolverNode]) -> String {
        Self::labels(tree, cycle).join(" -> ")
    }

    pub fn labels(tree: &UiTree, cycle: &[ResolverNode]) -> Vec<String> {
        cycle.iter().map(|node| node.label(tree)).collect()
    }
}

/// A resolved slot value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedValue {
    Scalar(f64),
    Color(Rgba),
}

/// Evaluates one slot per step, dependencies first
///
/// Each step only reads slots that earlier steps already cached, so resolution never nests
/// deeply. Construction fails if the graph reachable from the root has a cycle.
#[derive(Debug)]
pub struct ResolutionStepper<'a> {
    tree: &'a UiTree,
    order: Vec<ResolverNode>,
    position: usize,
    values: BTreeMap<ResolverNode, ResolvedValue>,
}

impl<'a> ResolutionStepper<'a> {
    pub fn new(tree: &'a UiTree, id: ComponentId, axis: Axis) -> Result<Self, LayoutError> {
        let graph = DependencyGraph::from_root(tree, id, axis)?;
        if let Some(cycle) = graph.find_cycle() {
            return Err(LayoutError::circular(DependencyGraph::labels(tree, &cycle)));
        }
        Ok(Self {
            tree,
            order: graph.topological_order(tree)?,
            position: 0,
            values: BTreeMap::new(),
        })
    }

    /// Evaluate the next slot, or `None` once every slot is done
    pub fn step(&mut self) -> Option<Result<(ResolverNode, ResolvedValue), LayoutError>> {
        let node = *self.order.get(self.position)?;
        self.position += 1;
        let value = if node.axis == Axis::Color {
            self.tree.resolve_color(node.component).map(ResolvedValue::Color)
        } else {
            self.tree
                .resolve(node.component, node.axis)
                .map(ResolvedValue::Scalar)
        };
        Some(value.map(|value| {
            self.values.insert(node, value);
            (node, value)
        }))
    }

    /// Run the remaining steps and return the root's value
    pub fn run(&mut self) -> Result<Option<ResolvedValue>, LayoutError> {
        let mut last = None;
        while let Some(result) = self.step() {
            last = Some(result?.1);
        }
        Ok(last)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.order.len()
    }

    /// Slots not yet evaluated
    pub fn remaining(&self) -> usize {
        self.order.len().saturating_sub(self.position)
    }

    pub fn order(&self) -> &[ResolverNode] {
        &self.order
    }

    /// Value produced by an earlier step
    pub fn value_of(&self, node: &ResolverNode) -> Option<ResolvedValue> {
        self.values.get(node).copied()
    }
}

impl UiTree {
    /// Look for cyclic dependencies among the slots of a subtree
    pub fn check_cycles(&self, id: ComponentId) -> Result<(), LayoutError> {
        let roots = self
            .descendants(id)?
            .into_iter()
            .flat_map(|member| Axis::ALL.into_iter().map(move |axis| ResolverNode::new(member, axis)));
        let graph = DependencyGraph::from_nodes(self, roots)?;
        match graph.find_cycle() {
            Some(cycle) => Err(LayoutError::circular(DependencyGraph::labels(self, &cycle))),
            None => Ok(()),
        }
    }

    /// Describe the cycle reachable from one slot, if any
    pub fn find_cycle_from(&self, id: ComponentId, axis: Axis) -> Result<Option<Vec<String>>, LayoutError> {
        let start = ResolverNode::new(id, axis);
        let graph = DependencyGraph::from_root(self, id, axis)?;
        Ok(graph
            .find_cycle_from(start)
            .or_else(|| graph.find_cycle())
            .map(|cycle| DependencyGraph::labels(self, &cycle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Constraint;
    use crate::tree::ComponentKind;

    fn sized(tree: &mut UiTree, name: &str, w: Constraint, h: Constraint) -> ComponentId {
        let id = tree.create(name, ComponentKind::Block);
        tree.set_width(id, w).unwrap();
        tree.set_height(id, h).unwrap();
        id
    }

    #[test]
    fn test_find_cycle_between_components() {
        let mut tree = UiTree::default();
        let a = tree.create("a", ComponentKind::Block);
        let b = tree.create("b", ComponentKind::Block);
        tree.set_width(a, Constraint::copy_of(b)).unwrap();
        tree.set_width(b, Constraint::copy_of(a)).unwrap();

        let graph = DependencyGraph::from_root(&tree, a, Axis::Width).unwrap();
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(
            DependencyGraph::describe(&tree, &cycle),
            "a.width -> b.width -> a.width"
        );
    }

    #[test]
    fn test_acyclic_graph_orders_dependencies_first() {
        let mut tree = UiTree::default();
        let parent = sized(&mut tree, "p", Constraint::pixels(100.0), Constraint::pixels(10.0));
        let child = sized(&mut tree, "c", Constraint::relative(0.5), Constraint::pixels(10.0));
        tree.add_child(parent, child).unwrap();

        let graph = DependencyGraph::from_root(&tree, child, Axis::Width).unwrap();
        assert!(graph.find_cycle().is_none());
        let order = graph.topological_order(&tree).unwrap();
        assert_eq!(
            order,
            vec![
                ResolverNode::new(parent, Axis::Width),
                ResolverNode::new(child, Axis::Width)
            ]
        );
    }

    #[test]
    fn test_topological_order_reports_stuck_nodes() {
        let mut tree = UiTree::default();
        let a = sized(&mut tree, "a", Constraint::aspect(1.0), Constraint::aspect(1.0));
        let graph = DependencyGraph::from_root(&tree, a, Axis::Width).unwrap();
        let err = graph.topological_order(&tree).unwrap_err();
        assert_eq!(
            err,
            LayoutError::circular(vec!["a.width".to_string(), "a.height".to_string()])
        );
    }

    #[test]
    fn test_stepper_evaluates_without_nesting() {
        let mut tree = UiTree::default();
        let parent = sized(&mut tree, "p", Constraint::pixels(80.0), Constraint::pixels(10.0));
        let child = sized(&mut tree, "c", Constraint::relative(0.25), Constraint::pixels(10.0));
        tree.add_child(parent, child).unwrap();

        let mut stepper = ResolutionStepper::new(&tree, child, Axis::Width).unwrap();
        assert_eq!(stepper.remaining(), 2);
        let (first, value) = stepper.step().unwrap().unwrap();
        assert_eq!(first, ResolverNode::new(parent, Axis::Width));
        assert_eq!(value, ResolvedValue::Scalar(80.0));
        assert_eq!(stepper.run().unwrap(), Some(ResolvedValue::Scalar(20.0)));
        assert!(stepper.is_finished());
    }

    #[test]
    fn test_stepper_refuses_cycles() {
        let mut tree = UiTree::default();
        let a = sized(&mut tree, "a", Constraint::aspect(1.0), Constraint::aspect(1.0));
        assert!(matches!(
            ResolutionStepper::new(&tree, a, Axis::Width),
            Err(LayoutError::CircularConstraint { .. })
        ));
    }

    #[test]
    fn test_circle_width_maps_to_radius() {
        let mut tree = UiTree::default();
        let dot = tree.create("dot", ComponentKind::Circle);
        let child = tree.create("child", ComponentKind::Block);
        tree.add_child(dot, child).unwrap();
        tree.set_width(child, Constraint::relative(1.0)).unwrap();
        tree.set_radius(dot, Constraint::child_max()).unwrap();
        // dot.radius reads child heights only, so no cycle
        assert!(tree.check_cycles(dot).is_ok());
        tree.set_height(child, Constraint::relative(1.0)).unwrap();
        let err = tree.check_cycles(dot).unwrap_err();
        assert!(err.to_string().contains("dot.radius"), "got {}", err);
    }
}
