//! Integration tests for per-frame caching: values stay fixed within a frame
//! and refresh once the frame driver (or an explicit invalidation) clears them.

use std::thread;

use pretty_assertions::assert_eq;
use trellis::{ComponentId, ComponentKind, Constraint, LayoutConfig, UiTree, Window};

fn parent_and_child(tree: &mut UiTree) -> (ComponentId, ComponentId) {
    let parent = tree.create("parent", ComponentKind::Container);
    tree.set_width(parent, Constraint::pixels(100.0)).unwrap();
    let child = tree.create("child", ComponentKind::Block);
    tree.add_child(parent, child).unwrap();
    tree.set_width(child, Constraint::relative(0.5)).unwrap();
    (parent, child)
}

#[test]
fn test_value_cached_until_invalidated() {
    let mut tree = UiTree::new(LayoutConfig::default());
    let (parent, child) = parent_and_child(&mut tree);

    assert_eq!(tree.get_width(child).unwrap(), 50.0);
    tree.set_width(parent, Constraint::pixels(200.0)).unwrap();
    assert_eq!(
        tree.get_width(child).unwrap(),
        50.0,
        "dependents keep this frame's value"
    );

    tree.invalidate_all();
    assert_eq!(tree.get_width(child).unwrap(), 100.0);
}

#[test]
fn test_invalidate_subtree_refreshes_descendants() {
    let mut tree = UiTree::new(LayoutConfig::default());
    let (parent, child) = parent_and_child(&mut tree);

    assert_eq!(tree.get_width(child).unwrap(), 50.0);
    tree.set_width(parent, Constraint::pixels(300.0)).unwrap();
    tree.invalidate_subtree(parent).unwrap();
    assert_eq!(tree.get_width(child).unwrap(), 150.0);
}

#[test]
fn test_tick_invalidates_every_cache() {
    let mut window = Window::new(LayoutConfig::default().with_viewport(400.0, 300.0));
    let root = window.root();
    let child = window.tree_mut().create("half", ComponentKind::Block);
    window.tree_mut().add_child(root, child).unwrap();
    window
        .tree_mut()
        .set_width(child, Constraint::relative(0.5))
        .unwrap();
    assert_eq!(window.tree().get_width(child).unwrap(), 200.0);

    window.resize(800.0, 300.0);
    window.tick(0.016);
    assert_eq!(window.tree().get_width(child).unwrap(), 400.0);
}

#[test]
fn test_jobs_from_other_threads_apply_on_next_tick() {
    let mut window = Window::new(LayoutConfig::default());
    let root = window.root();
    let handle = window.handle();

    let worker = thread::spawn(move || {
        handle
            .submit(move |tree: &mut UiTree| {
                let late = tree.create("late", ComponentKind::Block);
                tree.add_child(root, late).unwrap();
                tree.set_width(late, Constraint::pixels(42.0)).unwrap();
            })
            .unwrap();
    });
    worker.join().unwrap();

    assert!(window.tree().find("late").is_none(), "jobs wait for the tick");
    window.tick(0.016);
    let late = window.tree().find("late").expect("job ran during tick");
    assert_eq!(window.tree().get_width(late).unwrap(), 42.0);
}
