//! The component tree
//!
//! Components live in an arena owned by [`UiTree`] and are addressed by [`ComponentId`]
//! handles. A handle carries a generation so it goes stale once its component is destroyed.
//! Parents are explicit: a component whose `parent` is `None` is a root.
//!
//! Structural operations live in `mutation.rs`; resolution of constraint values is implemented
//! on the tree in `layout::resolve`.

mod mutation;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::events::Listener;
use crate::font::{default_font, FontProvider, TextMetricsCache};
use crate::layout::debug::ConstraintDebugger;
use crate::layout::slot::ConstraintSet;
use crate::layout::{Constraint, LayoutConfig, LayoutError};

/// Handle to a component in a [`UiTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    index: u32,
    generation: u32,
}

impl ComponentId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// What a component draws and which companion data it carries
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    /// Draws nothing; groups children
    Container,
    /// Filled rectangle
    Block,
    /// A string drawn at the component's origin
    Text { text: String },
    /// An image with natural pixel dimensions
    Image { width: f64, height: f64 },
    /// A circle whose X/Y constraints place its center
    Circle,
}

impl ComponentKind {
    pub fn text(text: impl Into<String>) -> Self {
        ComponentKind::Text { text: text.into() }
    }

    pub fn image(width: f64, height: f64) -> Self {
        ComponentKind::Image { width, height }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Container => "container",
            ComponentKind::Block => "block",
            ComponentKind::Text { .. } => "text",
            ComponentKind::Image { .. } => "image",
            ComponentKind::Circle => "circle",
        }
    }

    /// Whether X/Y resolve to the center rather than the top-left corner
    pub fn is_position_center(&self) -> bool {
        matches!(self, ComponentKind::Circle)
    }
}

pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) kind: ComponentKind,
    pub(crate) parent: Option<ComponentId>,
    /// Whether the node is currently in its parent's child list
    pub(crate) attached: bool,
    pub(crate) hidden_index: Option<usize>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) constraints: ConstraintSet,
    pub(crate) font: Arc<dyn FontProvider>,
    pub(crate) children_lock: Cell<u32>,
    pub(crate) listeners: Vec<Listener>,
}

impl Node {
    fn new(name: String, kind: ComponentKind) -> Self {
        let mut constraints = ConstraintSet::default();
        if matches!(kind, ComponentKind::Text { .. }) {
            constraints.width.constraint = Constraint::scaled_text(1.0);
            constraints.height.constraint = Constraint::scaled_text(1.0);
        }
        Self {
            name,
            kind,
            parent: None,
            attached: false,
            hidden_index: None,
            children: Vec::new(),
            constraints,
            font: default_font(),
            children_lock: Cell::new(0),
            listeners: Vec::new(),
        }
    }
}

struct Entry {
    generation: u32,
    node: Option<Node>,
}

/// Arena of components plus the shared resolution state
pub struct UiTree {
    entries: Vec<Entry>,
    free: Vec<u32>,
    pub(crate) config: LayoutConfig,
    pub(crate) depth: Cell<usize>,
    pub(crate) debugging: Cell<bool>,
    pub(crate) debugger: RefCell<Option<Rc<dyn ConstraintDebugger>>>,
    pub(crate) metrics: RefCell<TextMetricsCache>,
    pub(crate) focused: Option<ComponentId>,
    pub(crate) pressed: Option<ComponentId>,
}

impl Default for UiTree {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for UiTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiTree")
            .field("components", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

impl UiTree {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            config,
            depth: Cell::new(0),
            debugging: Cell::new(false),
            debugger: RefCell::new(None),
            metrics: RefCell::new(TextMetricsCache::default()),
            focused: None,
            pressed: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration and invalidate every cached value
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.invalidate_all();
    }

    /// Create a detached component
    pub fn create(&mut self, name: impl Into<String>, kind: ComponentKind) -> ComponentId {
        let node = Node::new(name.into(), kind);
        match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.node = Some(node);
                ComponentId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    node: Some(node),
                });
                ComponentId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub(crate) fn node(&self, id: ComponentId) -> Result<&Node, LayoutError> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
            .ok_or(LayoutError::StaleComponent(id))
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node, LayoutError> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
            .ok_or(LayoutError::StaleComponent(id))
    }

    /// Free a slot and bump its generation so outstanding handles go stale
    pub(crate) fn release(&mut self, id: ComponentId) -> Option<Node> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let node = entry.node.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of every live component, in arena order
    pub fn ids(&self) -> Vec<ComponentId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.node.is_some())
            .map(|(index, entry)| ComponentId {
                index: index as u32,
                generation: entry.generation,
            })
            .collect()
    }

    pub fn name(&self, id: ComponentId) -> Result<&str, LayoutError> {
        Ok(self.node(id)?.name.as_str())
    }

    /// Name for diagnostics, falling back to the handle for stale ids
    pub fn display_name(&self, id: ComponentId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|_| id.to_string())
    }

    pub fn kind(&self, id: ComponentId) -> Result<&ComponentKind, LayoutError> {
        Ok(&self.node(id)?.kind)
    }

    /// Last known parent; kept after removal so hidden components can return
    pub fn parent(&self, id: ComponentId) -> Result<Option<ComponentId>, LayoutError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ComponentId) -> Result<&[ComponentId], LayoutError> {
        Ok(self.node(id)?.children.as_slice())
    }

    pub fn is_root(&self, id: ComponentId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.parent.is_none())
    }

    /// Whether the component is currently listed among its parent's children
    pub fn is_attached(&self, id: ComponentId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.attached)
    }

    /// Position in the parent's child list, if attached
    pub fn index_in_parent(&self, id: ComponentId) -> Result<Option<usize>, LayoutError> {
        let node = self.node(id)?;
        match (node.parent, node.attached) {
            (Some(parent), true) => Ok(self
                .children(parent)?
                .iter()
                .position(|child| *child == id)),
            _ => Ok(None),
        }
    }

    /// Whether `ancestor` is on the attached parent chain of `id`
    ///
    /// Removed and hidden components remember their parent but are not inside it.
    pub fn is_child_of(&self, id: ComponentId, ancestor: ComponentId) -> Result<bool, LayoutError> {
        let mut current = self.node(id)?;
        while let (Some(parent), true) = (current.parent, current.attached) {
            if parent == ancestor {
                return Ok(true);
            }
            current = self.node(parent)?;
        }
        Ok(false)
    }

    /// The topmost ancestor of `id`
    pub fn root_of(&self, id: ComponentId) -> Result<ComponentId, LayoutError> {
        let mut current = id;
        while let Some(parent) = self.parent(current)? {
            current = parent;
        }
        Ok(current)
    }

    /// `id` and every attached descendant, parents before children
    pub fn descendants(&self, id: ComponentId) -> Result<Vec<ComponentId>, LayoutError> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for child in self.children(current)?.iter().rev() {
                stack.push(*child);
            }
        }
        Ok(out)
    }

    /// Find a live component by name
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.ids()
            .into_iter()
            .find(|id| self.name(*id).map(|n| n == name).unwrap_or(false))
    }

    pub fn constraints(&self, id: ComponentId) -> Result<&ConstraintSet, LayoutError> {
        Ok(&self.node(id)?.constraints)
    }

    pub fn font(&self, id: ComponentId) -> Result<&Arc<dyn FontProvider>, LayoutError> {
        Ok(&self.node(id)?.font)
    }

    pub fn set_font(&mut self, id: ComponentId, font: Arc<dyn FontProvider>) -> Result<(), LayoutError> {
        self.node_mut(id)?.font = font;
        Ok(())
    }

    /// Replace the string of a text component
    pub fn set_text(&mut self, id: ComponentId, text: impl Into<String>) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            ComponentKind::Text { text: current } => {
                *current = text.into();
                Ok(())
            }
            other => Err(LayoutError::invalid_tree(
                node.name.clone(),
                format!("{} components have no text", other.name()),
            )),
        }
    }

    /// Measure a string with the component's font through the shared metrics cache
    pub fn string_width(&self, id: ComponentId, text: &str, scale: f64) -> Result<f64, LayoutError> {
        let font = self.font(id)?;
        Ok(self.metrics.borrow_mut().string_width(font, text, scale))
    }

    pub fn text_metrics(&self) -> std::cell::Ref<'_, TextMetricsCache> {
        self.metrics.borrow()
    }

    /// Drop cached measurements taken with `font`
    pub fn evict_font_metrics(&self, font: &Arc<dyn FontProvider>) {
        self.metrics.borrow_mut().evict(font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_detached_root() {
        let mut tree = UiTree::default();
        let id = tree.create("panel", ComponentKind::Block);
        assert!(tree.is_root(id).unwrap());
        assert!(!tree.is_attached(id).unwrap());
        assert_eq!(tree.name(id).unwrap(), "panel");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_stale_handle_after_destroy() {
        let mut tree = UiTree::default();
        let id = tree.create("a", ComponentKind::Block);
        tree.destroy(id).unwrap();
        assert_eq!(tree.name(id), Err(LayoutError::StaleComponent(id)));
        let reused = tree.create("b", ComponentKind::Block);
        assert_eq!(reused.index(), id.index());
        assert_ne!(reused, id);
    }

    #[test]
    fn test_text_defaults_to_measured_size() {
        let mut tree = UiTree::default();
        let id = tree.create("label", ComponentKind::text("abc"));
        let width = tree.constraints(id).unwrap().scalar(crate::layout::Axis::Width);
        assert_eq!(width.unwrap().constraint().name(), "text");
    }

    #[test]
    fn test_set_text_rejects_blocks() {
        let mut tree = UiTree::default();
        let id = tree.create("box", ComponentKind::Block);
        assert!(tree.set_text(id, "nope").is_err());
    }

    #[test]
    fn test_find_by_name() {
        let mut tree = UiTree::default();
        let a = tree.create("a", ComponentKind::Block);
        tree.create("b", ComponentKind::Block);
        assert_eq!(tree.find("a"), Some(a));
        assert_eq!(tree.find("zzz"), None);
    }
}
