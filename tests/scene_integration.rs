//! Integration tests loading whole scenes and checking resolved geometry.
//! These verify layout semantics (siblings, cramming, child-based sizes,
//! fills and alignment) rather than SVG styling.

use pretty_assertions::assert_eq;
use trellis::{
    ComponentKind, Constraint, LayoutConfig, Rect, Scene, SceneError, Stylesheet, UiTree,
};

const TOLERANCE: f64 = 0.001;

fn load(source: &str) -> Scene {
    Scene::from_str(source, &Stylesheet::default())
        .unwrap_or_else(|e| panic!("scene failed to load: {}", e.report()))
}

fn bounds(scene: &Scene, name: &str) -> Rect {
    let id = scene
        .get(name)
        .unwrap_or_else(|| panic!("component '{}' not found", name));
    scene.tree().bounds(id).unwrap()
}

fn assert_bounds(scene: &Scene, name: &str, expected: (f64, f64, f64, f64)) {
    let b = bounds(scene, name);
    let actual = (b.x, b.y, b.width, b.height);
    assert!(
        (actual.0 - expected.0).abs() < TOLERANCE
            && (actual.1 - expected.1).abs() < TOLERANCE
            && (actual.2 - expected.2).abs() < TOLERANCE
            && (actual.3 - expected.3).abs() < TOLERANCE,
        "'{}' has bounds {:?}, expected {:?}",
        name,
        actual,
        expected
    );
}

#[test]
fn test_sidebar_and_content() {
    let scene = load(
        r#"
[window]
width = 400
height = 300

[[component]]
name = "sidebar"
width = "25%"
height = "100%"

[[component]]
name = "content"
x = "sibling(8)"
y = "10px"
width = "fill(cursor)"
height = "100% - 20px"
"#,
    );

    assert_bounds(&scene, "sidebar", (0.0, 0.0, 100.0, 300.0));
    assert_bounds(&scene, "content", (108.0, 10.0, 292.0, 280.0));
}

#[test]
fn test_cram_wraps_onto_next_line() {
    let scene = load(
        r#"
[[component]]
name = "row"
kind = "container"
width = "100px"
height = "children_range"

  [[component.children]]
  name = "a"
  x = "cram(5)"
  y = "cram(5)"
  width = "40px"
  height = "20px"

  [[component.children]]
  name = "b"
  x = "cram(5)"
  y = "cram(5)"
  width = "40px"
  height = "20px"

  [[component.children]]
  name = "c"
  x = "cram(5)"
  y = "cram(5)"
  width = "40px"
  height = "20px"
"#,
    );

    assert_bounds(&scene, "a", (0.0, 0.0, 40.0, 20.0));
    assert_bounds(&scene, "b", (45.0, 0.0, 40.0, 20.0));
    assert_bounds(&scene, "c", (0.0, 25.0, 40.0, 20.0));
    assert_eq!(bounds(&scene, "row").height, 45.0);
}

#[test]
fn test_container_wraps_sibling_chain() {
    let scene = load(
        r#"
[[component]]
name = "toolbar"
kind = "container"
width = "children"
height = "children_max"

  [[component.children]]
  name = "first"
  x = "sibling(10)"
  width = "20px"
  height = "10px"

  [[component.children]]
  name = "second"
  x = "sibling(10)"
  width = "30px"
  height = "25px"

  [[component.children]]
  name = "third"
  x = "sibling(10)"
  width = "40px"
  height = "15px"
"#,
    );

    assert_bounds(&scene, "second", (30.0, 0.0, 30.0, 25.0));
    assert_bounds(&scene, "third", (70.0, 0.0, 40.0, 15.0));
    assert_bounds(&scene, "toolbar", (0.0, 0.0, 110.0, 25.0));
}

#[test]
fn test_center_and_opposite_alignment() {
    let scene = load(
        r#"
[window]
width = 400
height = 300

[[component]]
name = "centered"
x = "center"
y = "center"
width = "100px"
height = "50px"

[[component]]
name = "corner"
x = "10px opposite"
y = "10px opposite"
width = "50px"
height = "20px"
"#,
    );

    assert_bounds(&scene, "centered", (150.0, 125.0, 100.0, 50.0));
    assert_bounds(&scene, "corner", (340.0, 270.0, 50.0, 20.0));
}

#[test]
fn test_text_sizes_from_string() {
    let scene = load(
        r#"
[[component]]
name = "label"
kind = "text"
text = "hello"
"#,
    );
    let b = bounds(&scene, "label");
    assert_eq!((b.width, b.height), (30.0, 9.0));
}

#[test]
fn test_image_keeps_aspect_ratio() {
    let scene = load(
        r#"
[[component]]
name = "logo"
kind = "image"
image = { width = 64, height = 32 }
width = "100px"
height = "image_aspect"
"#,
    );
    assert_eq!(bounds(&scene, "logo").height, 50.0);
}

#[test]
fn test_aspect_of_other_axis() {
    let scene = load(
        r#"
[[component]]
name = "square"
width = "40px"
height = "aspect(1.5)"
"#,
    );
    assert_eq!(bounds(&scene, "square").height, 60.0);
}

#[test]
fn test_hidden_component_detached() {
    let scene = load(
        r#"
[[component]]
name = "ghost"
width = "10px"
hidden = true
"#,
    );
    let ghost = scene.require("ghost").unwrap();
    assert!(!scene.tree().is_attached(ghost).unwrap());
    assert!(scene.tree().children(scene.root()).unwrap().is_empty());
}

#[test]
fn test_image_without_dimensions_rejected() {
    let result = Scene::from_str(
        "[[component]]\nname = \"logo\"\nkind = \"image\"\n",
        &Stylesheet::default(),
    );
    assert!(matches!(result, Err(SceneError::InvalidExpression { .. })));
}

#[test]
fn test_unknown_kind_suggests() {
    let result = Scene::from_str(
        "[[component]]\nname = \"a\"\nkind = \"blok\"\n",
        &Stylesheet::default(),
    );
    match result {
        Err(SceneError::UnknownKind { suggestions, .. }) => {
            assert_eq!(suggestions, vec!["block".to_string()]);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an unknown kind error"),
    }
}

#[test]
fn test_pixel_scale_snaps_centering() {
    let scene = load(
        r#"
[window]
width = 101
height = 100
pixel_scale = 1.0

[[component]]
name = "box"
x = "center"
width = "50px"
height = "10px"
"#,
    );
    let x = bounds(&scene, "box").x;
    assert_eq!(x, x.round(), "centered x should land on a whole pixel, got {x}");
}

#[test]
fn test_fill_is_complement_of_siblings() {
    const STRIP: f64 = 200.0;
    for fixed_width in [0.0, 37.5, 60.0, STRIP] {
        let scene = load(&format!(
            r#"
[[component]]
name = "strip"
kind = "container"
width = "{STRIP}px"
height = "20px"

  [[component.children]]
  name = "fixed"
  width = "{fixed_width}px"
  height = "100%"

  [[component.children]]
  name = "rest"
  x = "sibling"
  width = "fill"
  height = "100%"
"#
        ));
        let rest = bounds(&scene, "rest").width;
        assert!(
            (rest - (STRIP - fixed_width)).abs() < TOLERANCE,
            "fixed width {fixed_width}: fill resolved to {rest}"
        );
        assert!(
            (bounds(&scene, "fixed").width + rest - bounds(&scene, "strip").width).abs() < TOLERANCE,
            "fixed width {fixed_width}: siblings do not cover the strip"
        );
    }
}

#[test]
fn test_child_sum_of_another_component_counts_padding() {
    let scene = load(
        r#"
[[component]]
name = "row"
kind = "container"
width = "100px"
height = "50px"

  [[component.children]]
  name = "a"
  width = "10px"
  height = "10px"

  [[component.children]]
  name = "b"
  x = "sibling(5)"
  width = "20px"
  height = "10px"

  [[component.children]]
  name = "c"
  x = "sibling(5)"
  width = "30px"
  height = "10px"

[[component]]
name = "summary"
y = "sibling"
width = "children(5) to row"
height = "10px"
"#,
    );
    assert_eq!(bounds(&scene, "row").width, 100.0);
    assert_eq!(bounds(&scene, "summary").width, 70.0);
}

#[test]
fn test_child_sum_bound_through_the_api() {
    let mut tree = UiTree::new(LayoutConfig::default());
    let parent = tree.create("row", ComponentKind::Container);
    tree.set_width(parent, Constraint::pixels(100.0)).unwrap();
    tree.set_height(parent, Constraint::pixels(50.0)).unwrap();
    for (i, width) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        let child = tree.create(format!("c{i}"), ComponentKind::Block);
        tree.add_child(parent, child).unwrap();
        tree.set_width(child, Constraint::pixels(width)).unwrap();
    }
    let summary = tree.create("summary", ComponentKind::Block);
    tree.set_width(summary, Constraint::child_sum(5.0).to(parent).unwrap())
        .unwrap();

    assert_eq!(tree.get_width(summary).unwrap(), 70.0);
}

#[test]
fn test_center_is_symmetric_even_when_overflowing() {
    for child_width in ["50px", "300px"] {
        let scene = load(&format!(
            r#"
[[component]]
name = "frame"
kind = "container"
x = "20px"
width = "200px"
height = "50px"

  [[component.children]]
  name = "inner"
  x = "center"
  width = "{}"
  height = "10px"
"#,
            child_width
        ));
        let frame = bounds(&scene, "frame");
        let inner = bounds(&scene, "inner");
        let leading = inner.x - frame.x;
        let trailing = (frame.x + frame.width) - (inner.x + inner.width);
        assert!(
            (leading - trailing).abs() < TOLERANCE,
            "width {child_width}: leading gap {leading} != trailing gap {trailing}"
        );
    }
}
