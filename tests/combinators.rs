//! Integration tests for constraint arithmetic written as scene expressions.
//! Each case installs one expression on a subject component and checks the
//! resolved value against hand-computed geometry in a 400x300 window.

use pretty_assertions::assert_eq;
use trellis::{Scene, SceneError, Stylesheet};

const TOLERANCE: f64 = 0.001;

fn load(components: &str) -> Result<Scene, SceneError> {
    let source = format!("[window]\nwidth = 400\nheight = 300\n\n{}", components);
    Scene::from_str(&source, &Stylesheet::default())
}

/// Width of a block whose width is `expr`, next to a 30px wide anchor
fn subject_width(expr: &str) -> f64 {
    let components = format!(
        r#"
[[component]]
name = "anchor"
width = "30px"
height = "10px"

[[component]]
name = "subject"
width = "{}"
height = "10px"
"#,
        expr
    );
    let scene = load(&components).unwrap_or_else(|e| panic!("{expr:?} failed: {}", e.report()));
    let subject = scene.require("subject").unwrap();
    scene.tree().get_width(subject).unwrap()
}

fn assert_width(expr: &str, expected: f64) {
    let actual = subject_width(expr);
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{expr:?} resolved to {actual}, expected {expected}"
    );
}

#[test]
fn test_sum_with_scaled_term() {
    assert_width("10px + 20px + 30px + 5px * 2", 70.0);
}

#[test]
fn test_relative_minus_pixels() {
    assert_width("50% - 10px", 190.0);
}

#[test]
fn test_division_scales_down() {
    assert_width("100px / 4", 25.0);
    assert_width("(10px + 30px) / 2", 20.0);
}

#[test]
fn test_min_and_max() {
    assert_width("min(150px, 25%)", 100.0);
    assert_width("max(150px, 25%)", 150.0);
}

#[test]
fn test_coercions() {
    assert_width("at_least(10px, 50px)", 50.0);
    assert_width("at_most(80px, 50px)", 50.0);
    assert_width("clamp(75%, 10px, 200px)", 200.0);
    assert_width("clamp(5px, 10px, 200px)", 10.0);
}

#[test]
fn test_rounding_modes() {
    assert_width("round(10.4px)", 10.0);
    assert_width("floor(10.6px)", 10.0);
    assert_width("ceil(10.2px)", 11.0);
}

#[test]
fn test_copy_of_named_component() {
    assert_width("copy to anchor", 30.0);
    assert_width("copy to anchor * 2 + 5px", 65.0);
}

#[test]
fn test_relative_to_target_instead_of_parent() {
    assert_width("50% to anchor", 15.0);
}

#[test]
fn test_position_arithmetic_keeps_parent_offset() {
    let scene = load(
        r#"
[[component]]
name = "panel"
kind = "container"
x = "100px"
y = "50px"
width = "200px"
height = "100px"

  [[component.children]]
  name = "marker"
  x = "50% - 10px"
  y = "10px + 10px"
  width = "5px"
  height = "5px"
"#,
    )
    .expect("scene should load");
    let marker = scene.require("marker").unwrap();
    let tree = scene.tree();

    assert_eq!(tree.get_left(marker).unwrap(), 190.0);
    assert_eq!(tree.get_top(marker).unwrap(), 70.0);
}

#[test]
fn test_division_by_zero_rejected() {
    let result = load(
        r#"
[[component]]
name = "subject"
width = "10px / 0"
"#,
    );
    assert!(
        matches!(result, Err(SceneError::Expression { .. })),
        "division by zero should be a syntax error"
    );
}

#[test]
fn test_target_on_combinator_rejected() {
    let result = load(
        r#"
[[component]]
name = "anchor"

[[component]]
name = "subject"
width = "(10px + 20px) to anchor"
"#,
    );
    assert!(
        matches!(result, Err(SceneError::Layout(_))),
        "combinators cannot be bound to a target"
    );
}
