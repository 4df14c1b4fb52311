//! Structural mutation of the component tree
//!
//! Every operation that edits a child list first checks that the list is not locked by an
//! active traversal ([`UiTree::for_each_child`]). None of these operations invalidate cached
//! constraint values; callers that reflow must invalidate explicitly.

use crate::layout::{Axis, ColorConstraint, Constraint, LayoutError};

use super::{ComponentId, UiTree};

impl UiTree {
    fn ensure_unlocked(&self, id: ComponentId) -> Result<(), LayoutError> {
        let node = self.node(id)?;
        if node.children_lock.get() > 0 {
            return Err(LayoutError::children_locked(node.name.clone()));
        }
        Ok(())
    }

    /// Reject attaching `child` below `parent` if it would create a loop
    fn ensure_can_adopt(&self, parent: ComponentId, child: ComponentId) -> Result<(), LayoutError> {
        self.ensure_unlocked(parent)?;
        if parent == child || self.is_child_of(parent, child)? {
            return Err(LayoutError::invalid_tree(
                self.display_name(child),
                format!(
                    "cannot become a child of its own descendant '{}'",
                    self.display_name(parent)
                ),
            ));
        }
        Ok(())
    }

    /// Remove `child` from whichever list currently holds it
    fn detach_from_current(&mut self, child: ComponentId) -> Result<(), LayoutError> {
        let node = self.node(child)?;
        if let (Some(old_parent), true) = (node.parent, node.attached) {
            self.ensure_unlocked(old_parent)?;
            self.node_mut(old_parent)?.children.retain(|c| *c != child);
            self.node_mut(child)?.attached = false;
        }
        Ok(())
    }

    fn adopt(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), LayoutError> {
        let node = self.node_mut(child)?;
        node.parent = Some(parent);
        node.attached = true;
        node.hidden_index = None;
        Ok(())
    }

    /// Append `child` to `parent`'s children
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), LayoutError> {
        self.ensure_can_adopt(parent, child)?;
        self.detach_from_current(child)?;
        self.node_mut(parent)?.children.push(child);
        self.adopt(parent, child)
    }

    /// Insert `child` at `index` in `parent`'s children
    pub fn insert_child_at(
        &mut self,
        parent: ComponentId,
        index: usize,
        child: ComponentId,
    ) -> Result<(), LayoutError> {
        self.ensure_can_adopt(parent, child)?;
        self.detach_from_current(child)?;
        let len = self.children(parent)?.len();
        if index > len {
            return Err(LayoutError::invalid_tree(
                self.display_name(parent),
                format!("index {} is out of bounds for {} children", index, len),
            ));
        }
        self.node_mut(parent)?.children.insert(index, child);
        self.adopt(parent, child)
    }

    /// Insert `child` directly before the existing child `anchor`
    pub fn insert_child_before(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        anchor: ComponentId,
    ) -> Result<(), LayoutError> {
        let index = self.require_child_index(parent, anchor)?;
        self.insert_relative(parent, child, anchor, index)
    }

    /// Insert `child` directly after the existing child `anchor`
    pub fn insert_child_after(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        anchor: ComponentId,
    ) -> Result<(), LayoutError> {
        let index = self.require_child_index(parent, anchor)?;
        self.insert_relative(parent, child, anchor, index + 1)
    }

    fn insert_relative(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        anchor: ComponentId,
        index: usize,
    ) -> Result<(), LayoutError> {
        self.ensure_can_adopt(parent, child)?;
        self.detach_from_current(child)?;
        // Detaching may have shifted the anchor when the child was a sibling before it
        let anchor_index = self.require_child_index(parent, anchor)?;
        let index = if index > anchor_index { anchor_index + 1 } else { anchor_index };
        self.node_mut(parent)?.children.insert(index, child);
        self.adopt(parent, child)
    }

    fn require_child_index(&self, parent: ComponentId, child: ComponentId) -> Result<usize, LayoutError> {
        self.children(parent)?
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| {
                LayoutError::invalid_tree(
                    self.display_name(child),
                    format!("not a child of '{}'", self.display_name(parent)),
                )
            })
    }

    /// Swap `old` out of `parent`'s children for `new`, keeping its position
    pub fn replace_child(
        &mut self,
        parent: ComponentId,
        new: ComponentId,
        old: ComponentId,
    ) -> Result<(), LayoutError> {
        self.require_child_index(parent, old)?;
        self.ensure_can_adopt(parent, new)?;
        self.detach_from_current(new)?;
        let index = self.require_child_index(parent, old)?;
        self.node_mut(parent)?.children[index] = new;
        self.node_mut(old)?.attached = false;
        self.adopt(parent, new)
    }

    /// Remove `child` from `parent`; the child keeps its parent back-reference
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), LayoutError> {
        self.ensure_unlocked(parent)?;
        let index = self.require_child_index(parent, child)?;
        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.attached = false;
        Ok(())
    }

    /// Remove every child of `parent`
    pub fn clear_children(&mut self, parent: ComponentId) -> Result<(), LayoutError> {
        self.ensure_unlocked(parent)?;
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in children {
            self.node_mut(child)?.attached = false;
        }
        Ok(())
    }

    /// Take the component out of its parent's children, remembering where it was
    pub fn hide(&mut self, id: ComponentId) -> Result<(), LayoutError> {
        let parent = self
            .parent(id)?
            .ok_or_else(|| LayoutError::NoParent {
                component: self.display_name(id),
            })?;
        let Some(index) = self.index_in_parent(id)? else {
            return Ok(());
        };
        self.remove_child(parent, id)?;
        self.node_mut(id)?.hidden_index = Some(index);
        Ok(())
    }

    /// Put a hidden component back, at its old index when requested and still valid
    pub fn unhide(&mut self, id: ComponentId, use_last_position: bool) -> Result<(), LayoutError> {
        if self.is_attached(id)? {
            return Ok(());
        }
        let node = self.node(id)?;
        let hidden_index = node.hidden_index;
        let parent = node.parent.ok_or_else(|| LayoutError::NoParent {
            component: self.display_name(id),
        })?;
        match hidden_index {
            Some(index) if use_last_position && index <= self.children(parent)?.len() => {
                self.insert_child_at(parent, index, id)
            }
            _ => self.add_child(parent, id),
        }
    }

    /// Destroy a component and its whole subtree; their handles go stale
    pub fn destroy(&mut self, id: ComponentId) -> Result<(), LayoutError> {
        let subtree = self.descendants(id)?;
        for member in &subtree {
            self.ensure_unlocked(*member)?;
        }
        self.detach_from_current(id)?;
        for &member in &subtree {
            if self.focused == Some(member) {
                self.focused = None;
            }
            if self.pressed == Some(member) {
                self.pressed = None;
            }
            self.release(member);
        }

        // Detached components that remembered a destroyed parent become free-standing
        for other in self.ids() {
            let node = self.node_mut(other)?;
            if !node.attached && node.parent.is_some_and(|p| subtree.contains(&p)) {
                node.parent = None;
                node.hidden_index = None;
            }
        }
        Ok(())
    }

    /// Visit each child of `id` with mutable access to the tree
    ///
    /// The child list of `id` is locked for the duration: any attempt to add, insert, remove,
    /// replace or clear its children from inside `f` fails with
    /// [`LayoutError::ChildrenLocked`].
    pub fn for_each_child<F>(&mut self, id: ComponentId, mut f: F) -> Result<(), LayoutError>
    where
        F: FnMut(&mut UiTree, ComponentId) -> Result<(), LayoutError>,
    {
        let snapshot = self.children(id)?.to_vec();
        let lock = &self.node(id)?.children_lock;
        lock.set(lock.get() + 1);
        let result = snapshot.into_iter().try_for_each(|child| f(self, child));
        if let Ok(node) = self.node(id) {
            node.children_lock.set(node.children_lock.get().saturating_sub(1));
        }
        result
    }

    /// Whether a traversal currently holds the child list of `id`
    pub fn children_locked(&self, id: ComponentId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.children_lock.get() > 0)
    }

    /// Install a scalar constraint, discarding the previous one and any running animation
    pub fn set_constraint(
        &mut self,
        id: ComponentId,
        axis: Axis,
        constraint: Constraint,
    ) -> Result<(), LayoutError> {
        constraint.validate_for(axis)?;
        for target in constraint.bound_targets() {
            self.node(target)?;
        }
        let slot = self
            .node_mut(id)?
            .constraints
            .scalar_mut(axis)
            .ok_or_else(|| LayoutError::unsupported_axis(constraint.name(), axis))?;
        slot.constraint = constraint;
        slot.animation = None;
        Ok(())
    }

    /// Install a color constraint, discarding the previous one and any running animation
    pub fn set_color(&mut self, id: ComponentId, constraint: ColorConstraint) -> Result<(), LayoutError> {
        if let Some(target) = constraint.target() {
            self.node(target)?;
        }
        let slot = self.node_mut(id)?.constraints.color_mut();
        slot.constraint = constraint;
        slot.animation = None;
        Ok(())
    }

    pub fn set_x(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::X, constraint)
    }

    pub fn set_y(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::Y, constraint)
    }

    pub fn set_width(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::Width, constraint)
    }

    pub fn set_height(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::Height, constraint)
    }

    pub fn set_radius(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::Radius, constraint)
    }

    pub fn set_text_scale(&mut self, id: ComponentId, constraint: Constraint) -> Result<(), LayoutError> {
        self.set_constraint(id, Axis::TextScale, constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ComponentKind;

    fn tree_with_children(n: usize) -> (UiTree, ComponentId, Vec<ComponentId>) {
        let mut tree = UiTree::default();
        let parent = tree.create("parent", ComponentKind::Container);
        let children = (0..n)
            .map(|i| {
                let child = tree.create(format!("c{}", i), ComponentKind::Block);
                tree.add_child(parent, child).unwrap();
                child
            })
            .collect();
        (tree, parent, children)
    }

    #[test]
    fn test_add_child_sets_back_reference() {
        let (tree, parent, children) = tree_with_children(2);
        assert_eq!(tree.parent(children[0]).unwrap(), Some(parent));
        assert_eq!(tree.children(parent).unwrap(), children.as_slice());
        assert!(!tree.is_root(children[1]).unwrap());
    }

    #[test]
    fn test_reparenting_keeps_single_parent() {
        let (mut tree, parent, children) = tree_with_children(2);
        let other = tree.create("other", ComponentKind::Container);
        tree.add_child(other, children[0]).unwrap();
        assert_eq!(tree.children(parent).unwrap(), &[children[1]]);
        assert_eq!(tree.parent(children[0]).unwrap(), Some(other));
    }

    #[test]
    fn test_cannot_adopt_ancestor() {
        let (mut tree, parent, children) = tree_with_children(1);
        let err = tree.add_child(children[0], parent).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidTreeOperation { .. }));
        assert!(tree.add_child(parent, parent).is_err());
    }

    #[test]
    fn test_removed_child_may_adopt_old_parent() {
        let (mut tree, parent, children) = tree_with_children(1);
        tree.remove_child(parent, children[0]).unwrap();
        assert!(!tree.is_child_of(children[0], parent).unwrap());
        tree.add_child(children[0], parent).unwrap();
        assert_eq!(tree.parent(parent).unwrap(), Some(children[0]));
        assert!(tree.is_child_of(parent, children[0]).unwrap());
    }

    #[test]
    fn test_hidden_child_outlives_destroyed_parent() {
        let (mut tree, parent, children) = tree_with_children(2);
        tree.hide(children[1]).unwrap();
        tree.set_width(children[1], Constraint::pixels(12.0)).unwrap();
        tree.destroy(parent).unwrap();

        assert!(tree.contains(children[1]));
        assert_eq!(tree.parent(children[1]).unwrap(), None);
        assert_eq!(tree.get_width(children[1]).unwrap(), 12.0);
        assert!(tree.unhide(children[1], true).is_err());
    }

    #[test]
    fn test_remove_keeps_parent_reference() {
        let (mut tree, parent, children) = tree_with_children(2);
        tree.remove_child(parent, children[0]).unwrap();
        assert_eq!(tree.children(parent).unwrap(), &[children[1]]);
        assert_eq!(tree.parent(children[0]).unwrap(), Some(parent));
        assert!(!tree.is_attached(children[0]).unwrap());
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut tree, parent, children) = tree_with_children(2);
        let a = tree.create("a", ComponentKind::Block);
        let b = tree.create("b", ComponentKind::Block);
        tree.insert_child_before(parent, a, children[1]).unwrap();
        tree.insert_child_after(parent, b, children[0]).unwrap();
        assert_eq!(
            tree.children(parent).unwrap(),
            &[children[0], b, a, children[1]]
        );
    }

    #[test]
    fn test_insert_at_out_of_bounds() {
        let (mut tree, parent, _) = tree_with_children(1);
        let extra = tree.create("x", ComponentKind::Block);
        assert!(tree.insert_child_at(parent, 5, extra).is_err());
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let (mut tree, parent, children) = tree_with_children(3);
        let fresh = tree.create("fresh", ComponentKind::Block);
        tree.replace_child(parent, fresh, children[1]).unwrap();
        assert_eq!(
            tree.children(parent).unwrap(),
            &[children[0], fresh, children[2]]
        );
        assert!(!tree.is_attached(children[1]).unwrap());
    }

    #[test]
    fn test_hide_and_unhide_in_place() {
        let (mut tree, parent, children) = tree_with_children(3);
        tree.hide(children[1]).unwrap();
        assert_eq!(tree.children(parent).unwrap(), &[children[0], children[2]]);
        tree.unhide(children[1], true).unwrap();
        assert_eq!(tree.children(parent).unwrap(), children.as_slice());
    }

    #[test]
    fn test_unhide_at_end() {
        let (mut tree, parent, children) = tree_with_children(3);
        tree.hide(children[0]).unwrap();
        tree.unhide(children[0], false).unwrap();
        assert_eq!(
            tree.children(parent).unwrap(),
            &[children[1], children[2], children[0]]
        );
    }

    #[test]
    fn test_hide_root_has_no_parent() {
        let mut tree = UiTree::default();
        let root = tree.create("root", ComponentKind::Container);
        assert!(matches!(tree.hide(root), Err(LayoutError::NoParent { .. })));
    }

    #[test]
    fn test_clear_children() {
        let (mut tree, parent, children) = tree_with_children(3);
        tree.clear_children(parent).unwrap();
        assert!(tree.children(parent).unwrap().is_empty());
        assert!(children.iter().all(|c| !tree.is_attached(*c).unwrap()));
    }

    #[test]
    fn test_mutation_during_traversal_is_rejected() {
        let (mut tree, parent, _) = tree_with_children(2);
        let mut seen = 0;
        let result = tree.for_each_child(parent, |tree, child| {
            seen += 1;
            tree.remove_child(parent, child)
        });
        assert_eq!(
            result,
            Err(LayoutError::children_locked("parent"))
        );
        assert_eq!(seen, 1);
        assert_eq!(tree.children(parent).unwrap().len(), 2);
        assert!(!tree.children_locked(parent).unwrap());
    }

    #[test]
    fn test_traversal_may_mutate_other_lists() {
        let (mut tree, parent, children) = tree_with_children(2);
        let result = tree.for_each_child(parent, |tree, child| {
            let leaf = tree.create("leaf", ComponentKind::Block);
            tree.add_child(child, leaf)
        });
        assert!(result.is_ok());
        assert_eq!(tree.children(children[0]).unwrap().len(), 1);
    }

    #[test]
    fn test_destroy_subtree() {
        let (mut tree, parent, children) = tree_with_children(2);
        let leaf = tree.create("leaf", ComponentKind::Block);
        tree.add_child(children[0], leaf).unwrap();
        tree.destroy(children[0]).unwrap();
        assert!(!tree.contains(leaf));
        assert_eq!(tree.children(parent).unwrap(), &[children[1]]);
    }

    #[test]
    fn test_set_constraint_validates_axis() {
        let mut tree = UiTree::default();
        let id = tree.create("a", ComponentKind::Block);
        let err = tree.set_width(id, Constraint::center()).unwrap_err();
        assert_eq!(err, LayoutError::unsupported_axis("center", Axis::Width));
        assert!(tree
            .set_constraint(id, Axis::Color, Constraint::pixels(1.0))
            .is_err());
    }

    #[test]
    fn test_set_constraint_rejects_stale_target() {
        let mut tree = UiTree::default();
        let a = tree.create("a", ComponentKind::Block);
        let b = tree.create("b", ComponentKind::Block);
        tree.destroy(b).unwrap();
        let err = tree.set_width(a, Constraint::copy_of(b)).unwrap_err();
        assert_eq!(err, LayoutError::StaleComponent(b));
    }
}
