//! Event routing over resolved geometry
//!
//! Mouse events are hit-tested against component bounds, topmost child first, and then bubble
//! from the hit component up through its ancestors. Listeners get mutable access to the tree, so
//! they can restyle or restructure it in response.

use std::fmt;

use crate::layout::{LayoutError, Point};
use crate::tree::{ComponentId, UiTree};

/// Which events a listener subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Scroll,
    MouseRelease,
    Drag,
    Key,
    FocusGained,
    FocusLost,
}

/// Payload of a dispatched event
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    Click { button: u8 },
    Scroll { delta: f64 },
    MouseRelease,
    Drag { button: u8 },
    Key { character: Option<char>, code: u32 },
    FocusGained,
    FocusLost,
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::Click { .. } => EventKind::Click,
            EventData::Scroll { .. } => EventKind::Scroll,
            EventData::MouseRelease => EventKind::MouseRelease,
            EventData::Drag { .. } => EventKind::Drag,
            EventData::Key { .. } => EventKind::Key,
            EventData::FocusGained => EventKind::FocusGained,
            EventData::FocusLost => EventKind::FocusLost,
        }
    }
}

/// An event as seen by one listener
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// Component the event was originally dispatched to
    pub target: ComponentId,
    /// Component whose listeners are currently running
    pub current: ComponentId,
    pub data: EventData,
    /// Pointer position in window coordinates, for pointer events
    pub position: Option<Point>,
    /// Pointer position relative to `current`'s top-left corner
    pub relative: Option<Point>,
    propagation_stopped: bool,
    immediate_stopped: bool,
}

impl UiEvent {
    fn new(target: ComponentId, data: EventData, position: Option<Point>) -> Self {
        Self {
            target,
            current: target,
            data,
            position,
            relative: None,
            propagation_stopped: false,
            immediate_stopped: false,
        }
    }

    /// Finish the current component's listeners but do not bubble further
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Skip remaining listeners on the current component and do not bubble
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

type Handler = Box<dyn FnMut(&mut UiTree, &mut UiEvent) -> Result<(), LayoutError>>;

/// A subscription held by a component
pub struct Listener {
    kind: EventKind,
    handler: Handler,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("kind", &self.kind).finish()
    }
}

impl UiTree {
    /// Subscribe `handler` to events of `kind` reaching `id`
    pub fn on_event<F>(&mut self, id: ComponentId, kind: EventKind, handler: F) -> Result<(), LayoutError>
    where
        F: FnMut(&mut UiTree, &mut UiEvent) -> Result<(), LayoutError> + 'static,
    {
        self.node_mut(id)?.listeners.push(Listener {
            kind,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn on_click<F>(&mut self, id: ComponentId, handler: F) -> Result<(), LayoutError>
    where
        F: FnMut(&mut UiTree, &mut UiEvent) -> Result<(), LayoutError> + 'static,
    {
        self.on_event(id, EventKind::Click, handler)
    }

    /// Deepest component under the point, preferring later (topmost) children
    ///
    /// Returns `None` when the point is outside `root`.
    pub fn hit_test(&self, root: ComponentId, x: f64, y: f64) -> Result<Option<ComponentId>, LayoutError> {
        let point = Point::new(x, y);
        if !self.bounds(root)?.contains(point) {
            return Ok(None);
        }
        let mut current = root;
        'descend: loop {
            for child in self.children(current)?.iter().rev() {
                if self.bounds(*child)?.contains(point) {
                    current = *child;
                    continue 'descend;
                }
            }
            return Ok(Some(current));
        }
    }

    /// Run the listeners on `id` for this event
    fn deliver(&mut self, id: ComponentId, event: &mut UiEvent) -> Result<(), LayoutError> {
        event.current = id;
        event.relative = match event.position {
            Some(position) => Some(Point::new(
                position.x - self.get_left(id)?,
                position.y - self.get_top(id)?,
            )),
            None => None,
        };

        let kind = event.data.kind();
        let mut listeners = std::mem::take(&mut self.node_mut(id)?.listeners);
        let mut result = Ok(());
        for listener in listeners.iter_mut().filter(|l| l.kind == kind) {
            result = (listener.handler)(self, event);
            if result.is_err() || event.immediate_stopped {
                break;
            }
        }
        // Listeners added while dispatching go after the existing ones
        if let Ok(node) = self.node_mut(id) {
            listeners.append(&mut node.listeners);
            node.listeners = listeners;
        }
        result
    }

    /// Deliver to `target` and then to each ancestor until propagation stops
    fn bubble(&mut self, target: ComponentId, event: &mut UiEvent) -> Result<(), LayoutError> {
        let mut current = Some(target);
        while let Some(id) = current {
            if !self.contains(id) {
                break;
            }
            self.deliver(id, event)?;
            if event.is_propagation_stopped() {
                break;
            }
            current = self.parent(id)?;
        }
        Ok(())
    }

    /// Click at a window position; returns the component that was hit
    pub fn dispatch_click(
        &mut self,
        root: ComponentId,
        x: f64,
        y: f64,
        button: u8,
    ) -> Result<Option<ComponentId>, LayoutError> {
        let hit = self.hit_test(root, x, y)?;
        if let Some(focused) = self.focused {
            if hit != Some(focused) {
                self.release_focus()?;
            }
        }
        let Some(target) = hit else {
            return Ok(None);
        };
        self.pressed = Some(target);
        let mut event = UiEvent::new(target, EventData::Click { button }, Some(Point::new(x, y)));
        self.bubble(target, &mut event)?;
        Ok(Some(target))
    }

    pub fn dispatch_scroll(
        &mut self,
        root: ComponentId,
        x: f64,
        y: f64,
        delta: f64,
    ) -> Result<Option<ComponentId>, LayoutError> {
        let Some(target) = self.hit_test(root, x, y)? else {
            return Ok(None);
        };
        let mut event = UiEvent::new(target, EventData::Scroll { delta }, Some(Point::new(x, y)));
        self.bubble(target, &mut event)?;
        Ok(Some(target))
    }

    /// Release the mouse; the component pressed by the last click receives the event
    pub fn dispatch_mouse_release(&mut self, x: f64, y: f64) -> Result<Option<ComponentId>, LayoutError> {
        let Some(pressed) = self.pressed.take() else {
            return Ok(None);
        };
        if !self.contains(pressed) {
            return Ok(None);
        }
        let mut event = UiEvent::new(pressed, EventData::MouseRelease, Some(Point::new(x, y)));
        self.deliver(pressed, &mut event)?;
        Ok(Some(pressed))
    }

    /// Drag while a button is held; delivered to the pressed component only
    pub fn dispatch_drag(&mut self, x: f64, y: f64, button: u8) -> Result<Option<ComponentId>, LayoutError> {
        let Some(pressed) = self.pressed.filter(|id| self.contains(*id)) else {
            return Ok(None);
        };
        let mut event = UiEvent::new(pressed, EventData::Drag { button }, Some(Point::new(x, y)));
        self.deliver(pressed, &mut event)?;
        Ok(Some(pressed))
    }

    /// Key press, delivered to the focused component
    pub fn dispatch_key(&mut self, character: Option<char>, code: u32) -> Result<Option<ComponentId>, LayoutError> {
        let Some(focused) = self.focused.filter(|id| self.contains(*id)) else {
            return Ok(None);
        };
        let mut event = UiEvent::new(focused, EventData::Key { character, code }, None);
        self.deliver(focused, &mut event)?;
        Ok(Some(focused))
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }

    pub fn pressed(&self) -> Option<ComponentId> {
        self.pressed
    }

    /// Move keyboard focus to `id`, notifying the previous holder
    pub fn focus(&mut self, id: ComponentId) -> Result<(), LayoutError> {
        self.node(id)?;
        if self.focused == Some(id) {
            return Ok(());
        }
        self.release_focus()?;
        self.focused = Some(id);
        let mut event = UiEvent::new(id, EventData::FocusGained, None);
        self.deliver(id, &mut event)
    }

    pub fn release_focus(&mut self) -> Result<(), LayoutError> {
        let Some(previous) = self.focused.take() else {
            return Ok(());
        };
        if !self.contains(previous) {
            return Ok(());
        }
        let mut event = UiEvent::new(previous, EventData::FocusLost, None);
        self.deliver(previous, &mut event)
    }
}
