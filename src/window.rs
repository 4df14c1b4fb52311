//! Frame driver
//!
//! A [`Window`] owns the tree and advances it one frame at a time. Each `tick` runs the same
//! fixed sequence: drain jobs submitted from other threads, advance animations, step per-frame
//! colors, and invalidate every cached value exactly once. `draw` then reads fresh values.
//!
//! Layout work never happens off the owning thread. Background producers hold a
//! [`WindowHandle`] and submit closures that run at the start of the next tick.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::events::UiEvent;
use crate::layout::{Axis, Constraint, LayoutConfig, LayoutError, Rect};
use crate::renderer::{DisplayList, RenderBackend};
use crate::tree::{ComponentId, ComponentKind, UiTree};

type Job = Box<dyn FnOnce(&mut UiTree) + Send>;

/// Result of drawing one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was replayed onto the backend
    Drawn { commands: usize },
    /// Resolution failed this frame; the error notice was drawn instead
    Failed(LayoutError),
    /// An earlier failure has not been cleared; the error notice was drawn again
    Suppressed,
}

/// Cloneable, `Send` handle for queueing tree mutations from other threads
#[derive(Clone)]
pub struct WindowHandle {
    sender: Sender<Job>,
}

impl WindowHandle {
    /// Queue `job` to run on the window's thread at the start of the next tick
    pub fn submit<F>(&self, job: F) -> Result<(), LayoutError>
    where
        F: FnOnce(&mut UiTree) + Send + 'static,
    {
        self.sender
            .send(Box::new(job))
            .map_err(|_| LayoutError::WindowClosed)
    }
}

/// Owns a tree and its root, and drives frames
pub struct Window {
    tree: UiTree,
    root: ComponentId,
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    last_error: Option<LayoutError>,
    frames: u64,
}

impl Window {
    /// Create a window whose root container fills the viewport
    pub fn new(config: LayoutConfig) -> Self {
        let mut tree = UiTree::new(config);
        let root = tree.create("window", ComponentKind::Container);
        // Relative sizes on a root resolve against the viewport and cannot fail
        let _ = tree.set_width(root, Constraint::relative(1.0));
        let _ = tree.set_height(root, Constraint::relative(1.0));
        Self::from_parts(tree, root)
    }

    /// Wrap an already built tree
    pub fn from_parts(tree: UiTree, root: ComponentId) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            tree,
            root,
            sender,
            receiver,
            last_error: None,
            frames: 0,
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle {
            sender: self.sender.clone(),
        }
    }

    /// Number of ticks run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> Rect {
        let (width, height) = self.tree.config().viewport;
        Rect::new(0.0, 0.0, width, height)
    }

    /// Change the viewport size; every cached value is invalidated
    pub fn resize(&mut self, width: f64, height: f64) {
        let config = self.tree.config().clone().with_viewport(width, height);
        self.tree.set_config(config);
    }

    pub fn has_errored(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&LayoutError> {
        self.last_error.as_ref()
    }

    /// Resume normal drawing after a failed frame
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Advance one frame by `dt` seconds
    ///
    /// Returns the animated slots that completed during this tick.
    #[tracing::instrument(skip(self), fields(frame = self.frames))]
    pub fn tick(&mut self, dt: f64) -> Vec<(ComponentId, Axis)> {
        let mut drained = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job(&mut self.tree);
            drained += 1;
        }
        if drained > 0 {
            tracing::debug!(jobs = drained, "drained hand-off queue");
        }

        let completed = self.tree.advance_animations(dt);
        self.tree.step_colors();
        self.tree.invalidate_all();
        self.frames += 1;
        completed
    }

    /// Resolve the tree and paint it onto `backend`
    ///
    /// Nothing is painted unless the whole frame resolves. After a failure the error notice is
    /// drawn on every frame until [`Window::clear_error`] is called.
    #[tracing::instrument(skip(self, backend), fields(frame = self.frames))]
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) -> FrameOutcome {
        let viewport = self.viewport();
        if let Some(err) = &self.last_error {
            backend.draw_error_notice(viewport, &err.to_string());
            return FrameOutcome::Suppressed;
        }

        match DisplayList::build(&self.tree, self.root) {
            Ok(list) => {
                list.replay(backend);
                FrameOutcome::Drawn {
                    commands: list.len(),
                }
            }
            Err(err) => {
                let err = self.diagnose(err);
                tracing::error!("rendering failed: {err}");
                backend.draw_error_notice(viewport, &err.to_string());
                self.last_error = Some(err.clone());
                FrameOutcome::Failed(err)
            }
        }
    }

    /// Turn runaway recursion into a cycle report when diagnostics are enabled
    fn diagnose(&self, err: LayoutError) -> LayoutError {
        let LayoutError::ResolutionDepthExceeded {
            component, axis, ..
        } = &err
        else {
            return err;
        };
        if !self.tree.config().diagnostics {
            return err;
        }
        match self.tree.find_cycle_from(*component, *axis) {
            Ok(Some(cycle)) => {
                tracing::warn!(cycle = %cycle.join(" -> "), "circular constraint detected");
                LayoutError::circular(cycle)
            }
            Ok(None) => err,
            Err(detect) => {
                tracing::warn!("cycle detection failed: {detect}");
                err
            }
        }
    }

    /// Route a click at window coordinates
    pub fn click(&mut self, x: f64, y: f64, button: u8) -> Result<Option<ComponentId>, LayoutError> {
        self.tree.dispatch_click(self.root, x, y, button)
    }

    pub fn scroll(&mut self, x: f64, y: f64, delta: f64) -> Result<Option<ComponentId>, LayoutError> {
        self.tree.dispatch_scroll(self.root, x, y, delta)
    }

    /// Attach a click listener, a shorthand for hosts that only care about clicks
    pub fn on_click<F>(&mut self, id: ComponentId, handler: F) -> Result<(), LayoutError>
    where
        F: FnMut(&mut UiTree, &mut UiEvent) -> Result<(), LayoutError> + 'static,
    {
        self.tree.on_click(id, handler)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::layout::{AnimationSpec, Easing};

    fn small_window() -> Window {
        Window::new(
            LayoutConfig::default()
                .with_viewport(200.0, 100.0)
                .with_max_resolution_depth(32),
        )
    }

    #[test]
    fn test_root_fills_viewport() {
        let mut window = small_window();
        let root = window.root();
        assert_eq!(window.tree().bounds(root).unwrap(), Rect::new(0.0, 0.0, 200.0, 100.0));
        window.resize(300.0, 50.0);
        assert_eq!(window.tree().get_width(root).unwrap(), 300.0);
    }

    #[test]
    fn test_tick_drains_jobs_from_other_threads() {
        let mut window = small_window();
        let root = window.root();
        let handle = window.handle();
        thread::spawn(move || {
            handle
                .submit(move |tree| {
                    let block = tree.create("late", ComponentKind::Block);
                    tree.add_child(root, block).unwrap();
                })
                .unwrap();
        })
        .join()
        .unwrap();

        assert!(window.tree().find("late").is_none());
        window.tick(0.016);
        assert!(window.tree().find("late").is_some());
        assert_eq!(window.frames(), 1);
    }

    #[test]
    fn test_submit_after_close_fails() {
        let window = small_window();
        let handle = window.handle();
        drop(window);
        assert_eq!(handle.submit(|_| {}), Err(LayoutError::WindowClosed));
    }

    #[test]
    fn test_tick_reports_completed_animations() {
        let mut window = small_window();
        let root = window.root();
        let block = window.tree_mut().create("b", ComponentKind::Block);
        window.tree_mut().add_child(root, block).unwrap();
        window
            .tree_mut()
            .animate(block, Axis::X, AnimationSpec::new(Easing::Linear, 0.5), Constraint::pixels(40.0))
            .unwrap();

        assert!(window.tick(0.25).is_empty());
        assert_eq!(window.tree().get_left(block).unwrap(), 20.0);
        assert_eq!(window.tick(0.25), vec![(block, Axis::X)]);
        assert_eq!(window.tree().get_left(block).unwrap(), 40.0);
    }

    #[test]
    fn test_failed_frame_persists_until_cleared() {
        let mut window = small_window();
        let root = window.root();
        let a = window.tree_mut().create("a", ComponentKind::Block);
        let b = window.tree_mut().create("b", ComponentKind::Block);
        window.tree_mut().add_child(root, a).unwrap();
        window.tree_mut().add_child(root, b).unwrap();
        window.tree_mut().set_width(a, Constraint::copy_of(b)).unwrap();
        window.tree_mut().set_width(b, Constraint::copy_of(a)).unwrap();

        let mut list = DisplayList::new();
        let outcome = window.draw(&mut list);
        let FrameOutcome::Failed(LayoutError::CircularConstraint { cycle }) = outcome else {
            panic!("expected a cycle report, got {:?}", outcome);
        };
        assert!(cycle.iter().any(|label| label == "a.width"));
        assert!(cycle.iter().any(|label| label == "b.width"));
        assert!(window.has_errored());

        assert_eq!(window.draw(&mut list), FrameOutcome::Suppressed);

        window.tree_mut().set_width(b, Constraint::pixels(10.0)).unwrap();
        window.clear_error();
        window.tick(0.0);
        let mut fresh = DisplayList::new();
        assert!(matches!(window.draw(&mut fresh), FrameOutcome::Drawn { .. }));
    }

    #[test]
    fn test_depth_error_kept_without_diagnostics() {
        let mut window = Window::new(
            LayoutConfig::default()
                .with_max_resolution_depth(32)
                .with_diagnostics(false),
        );
        let root = window.root();
        let a = window.tree_mut().create("a", ComponentKind::Block);
        window.tree_mut().add_child(root, a).unwrap();
        window.tree_mut().set_width(a, Constraint::aspect(1.0)).unwrap();
        window.tree_mut().set_height(a, Constraint::aspect(1.0)).unwrap();

        let outcome = window.draw(&mut DisplayList::new());
        assert!(
            matches!(outcome, FrameOutcome::Failed(ref err) if err.is_depth_exceeded()),
            "unexpected outcome {:?}",
            outcome
        );
    }
}
