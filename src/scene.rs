//! Declarative scenes
//!
//! A scene is a TOML document describing a window and a tree of components. Every layout slot
//! is written as a constraint expression string:
//!
//! ```toml
//! [window]
//! width = 400
//! height = 300
//!
//! [[component]]
//! name = "sidebar"
//! width = "25%"
//! height = "100%"
//! color = "background-2"
//!
//! [[component]]
//! name = "content"
//! x = "sibling(8)"
//! width = "fill"
//! height = "copy to sidebar"
//!
//!   [[component.animate]]
//!   axis = "width"
//!   to = "50%"
//!   duration = 0.5
//!   easing = "out_quad"
//! ```
//!
//! Loading happens in two passes. The first creates every component and registers its name,
//! so expressions may refer to components declared later in the file. The second parses each
//! expression, binds `to name` targets and installs the result.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::ParseError;
use crate::layout::{
    AnimationSpec, Axis, ColorConstraint, ColorKind, Constraint, ConstraintKind, Easing,
    LayoutConfig, LayoutError,
};
use crate::parser::{parse_color, parse_constraint, BinaryFn, ColorExpr, Expr, Spanned};
use crate::stylesheet::Stylesheet;
use crate::tree::{ComponentId, ComponentKind, UiTree};
use crate::window::Window;

/// Name under which the root container is registered
pub const ROOT_NAME: &str = "window";

/// Errors that can occur while loading a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {axis} expression on '{component}': {}", join_messages(.errors))]
    Expression {
        component: String,
        axis: String,
        text: String,
        errors: Vec<ParseError>,
    },

    #[error("'{component}' refers to unknown component '{name}'{}", did_you_mean(.suggestions))]
    UnknownName {
        component: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("'{component}' uses unknown color token '{token}'{}", did_you_mean(.suggestions))]
    UnknownColor {
        component: String,
        token: String,
        suggestions: Vec<String>,
    },

    #[error("'{component}' uses unknown easing '{name}'{}", did_you_mean(.suggestions))]
    UnknownEasing {
        component: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("'{component}' has unknown kind '{name}'{}", did_you_mean(.suggestions))]
    UnknownKind {
        component: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("'{component}' animates unknown axis '{name}'")]
    UnknownAxis { component: String, name: String },

    #[error("component name '{name}' is used more than once")]
    DuplicateName { name: String },

    #[error("invalid {axis} expression on '{component}': {message}")]
    InvalidExpression {
        component: String,
        axis: String,
        message: String,
    },

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl SceneError {
    /// Render the error for a terminal, with source context for expression errors
    pub fn report(&self) -> String {
        match self {
            SceneError::Expression {
                component,
                axis,
                text,
                errors,
            } => {
                let filename = format!("{}.{}", component, axis);
                errors
                    .iter()
                    .map(|e| e.format(text, &filename))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => other.to_string(),
        }
    }
}

fn join_messages(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| match e {
            ParseError::Syntax { message, .. } => message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default)]
    window: WindowSpec,
    #[serde(default, rename = "component")]
    components: Vec<ComponentSpec>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct WindowSpec {
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_height")]
    height: f64,
    pixel_scale: Option<f64>,
    #[serde(default = "default_true")]
    diagnostics: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pixel_scale: None,
            diagnostics: true,
        }
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ComponentSpec {
    name: String,
    kind: Option<String>,
    text: Option<String>,
    image: Option<ImageSpec>,
    x: Option<String>,
    y: Option<String>,
    width: Option<String>,
    height: Option<String>,
    radius: Option<String>,
    text_scale: Option<String>,
    color: Option<String>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    animate: Vec<AnimateSpec>,
    #[serde(default)]
    children: Vec<ComponentSpec>,
}

impl ComponentSpec {
    fn scalar_expressions(&self) -> [(Axis, Option<&String>); 6] {
        [
            (Axis::X, self.x.as_ref()),
            (Axis::Y, self.y.as_ref()),
            (Axis::Width, self.width.as_ref()),
            (Axis::Height, self.height.as_ref()),
            (Axis::Radius, self.radius.as_ref()),
            (Axis::TextScale, self.text_scale.as_ref()),
        ]
    }

    fn component_kind(&self) -> Result<ComponentKind, SceneError> {
        let kind = self.kind.as_deref().unwrap_or("block");
        match kind {
            "container" => Ok(ComponentKind::Container),
            "block" => Ok(ComponentKind::Block),
            "circle" => Ok(ComponentKind::Circle),
            "text" => Ok(ComponentKind::text(self.text.clone().unwrap_or_default())),
            "image" => {
                let image = self.image.as_ref().ok_or_else(|| SceneError::InvalidExpression {
                    component: self.name.clone(),
                    axis: "image".to_string(),
                    message: "image components need `image = { width, height }`".to_string(),
                })?;
                Ok(ComponentKind::image(image.width, image.height))
            }
            other => Err(SceneError::UnknownKind {
                component: self.name.clone(),
                name: other.to_string(),
                suggestions: find_similar(other, KIND_NAMES.iter().copied(), 2),
            }),
        }
    }
}

const KIND_NAMES: [&str; 5] = ["container", "block", "text", "image", "circle"];

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ImageSpec {
    width: f64,
    height: f64,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct AnimateSpec {
    axis: String,
    to: String,
    duration: f64,
    #[serde(default)]
    delay: f64,
    #[serde(default = "default_easing")]
    easing: String,
}

fn default_easing() -> String {
    "linear".to_string()
}

/// A loaded scene: a window plus the names of its components
pub struct Scene {
    window: Window,
    names: HashMap<String, ComponentId>,
    stylesheet: Stylesheet,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path, stylesheet: &Stylesheet) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content, stylesheet)
    }

    /// Load a scene from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str, stylesheet: &Stylesheet) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(content)?;

        let mut config = LayoutConfig::default()
            .with_viewport(file.window.width, file.window.height)
            .with_diagnostics(file.window.diagnostics);
        if let Some(scale) = file.window.pixel_scale {
            config = config.with_pixel_scale(scale);
        }
        let mut window = Window::new(config);
        let root = window.root();

        let mut names = HashMap::new();
        names.insert(ROOT_NAME.to_string(), root);

        let mut created = Vec::new();
        create_components(
            window.tree_mut(),
            root,
            &file.components,
            &mut names,
            &mut created,
        )?;

        let binder = Binder {
            names: &names,
            stylesheet,
        };
        let tree = window.tree_mut();
        for (id, spec) in &created {
            install_constraints(tree, &binder, *id, spec)?;
        }
        for (id, spec) in &created {
            install_animations(tree, &binder, *id, spec)?;
        }
        for (id, spec) in &created {
            if spec.hidden {
                tree.hide(*id)?;
            }
        }

        tracing::debug!(components = created.len(), "scene loaded");
        Ok(Self {
            window,
            names,
            stylesheet: stylesheet.clone(),
        })
    }

    /// Look up a component by name
    pub fn get(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Look up a component by name, suggesting close matches when it is missing
    pub fn require(&self, name: &str) -> Result<ComponentId, SceneError> {
        self.get(name).ok_or_else(|| SceneError::UnknownName {
            component: ROOT_NAME.to_string(),
            name: name.to_string(),
            suggestions: find_similar(name, self.names.keys().map(String::as_str), 2),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, ComponentId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn root(&self) -> ComponentId {
        self.window.root()
    }

    pub fn tree(&self) -> &UiTree {
        self.window.tree()
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        self.window.tree_mut()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn into_window(self) -> Window {
        self.window
    }

    /// Compile a constraint expression against this scene's component names
    pub fn compile_constraint(&self, source: &str) -> Result<Constraint, SceneError> {
        let expr = parse_constraint(source).map_err(|errors| SceneError::Expression {
            component: ROOT_NAME.to_string(),
            axis: "expression".to_string(),
            text: source.to_string(),
            errors,
        })?;
        self.binder().constraint(ROOT_NAME, "expression", &expr)
    }

    /// Compile a color expression against this scene's names and stylesheet
    pub fn compile_color(&self, source: &str) -> Result<ColorConstraint, SceneError> {
        let expr = parse_color(source).map_err(|errors| SceneError::Expression {
            component: ROOT_NAME.to_string(),
            axis: "color".to_string(),
            text: source.to_string(),
            errors,
        })?;
        self.binder().color(ROOT_NAME, &expr)
    }

    fn binder(&self) -> Binder<'_> {
        Binder {
            names: &self.names,
            stylesheet: &self.stylesheet,
        }
    }
}

fn create_components<'s>(
    tree: &mut UiTree,
    parent: ComponentId,
    specs: &'s [ComponentSpec],
    names: &mut HashMap<String, ComponentId>,
    created: &mut Vec<(ComponentId, &'s ComponentSpec)>,
) -> Result<(), SceneError> {
    for spec in specs {
        if names.contains_key(&spec.name) {
            return Err(SceneError::DuplicateName {
                name: spec.name.clone(),
            });
        }
        let id = tree.create(spec.name.clone(), spec.component_kind()?);
        tree.add_child(parent, id)?;
        names.insert(spec.name.clone(), id);
        created.push((id, spec));
        create_components(tree, id, &spec.children, names, created)?;
    }
    Ok(())
}

fn install_constraints(
    tree: &mut UiTree,
    binder: &Binder<'_>,
    id: ComponentId,
    spec: &ComponentSpec,
) -> Result<(), SceneError> {
    for (axis, source) in spec.scalar_expressions() {
        let Some(source) = source else { continue };
        let constraint = binder.compile_scalar(&spec.name, axis, source)?;
        tree.set_constraint(id, axis, constraint)?;
    }
    if let Some(source) = &spec.color {
        let color = binder.compile_color(&spec.name, source)?;
        tree.set_color(id, color)?;
    }
    Ok(())
}

fn install_animations(
    tree: &mut UiTree,
    binder: &Binder<'_>,
    id: ComponentId,
    spec: &ComponentSpec,
) -> Result<(), SceneError> {
    for animation in &spec.animate {
        let axis = Axis::from_name(&animation.axis).ok_or_else(|| SceneError::UnknownAxis {
            component: spec.name.clone(),
            name: animation.axis.clone(),
        })?;
        let easing =
            Easing::from_name(&animation.easing).ok_or_else(|| SceneError::UnknownEasing {
                component: spec.name.clone(),
                name: animation.easing.clone(),
                suggestions: find_similar(
                    &animation.easing,
                    Easing::ALL.iter().map(|e| e.name()),
                    3,
                ),
            })?;
        let timing = AnimationSpec::new(easing, animation.duration).with_delay(animation.delay);

        if axis == Axis::Color {
            let end = binder.compile_color(&spec.name, &animation.to)?;
            tree.animate_color(id, timing, end)?;
        } else {
            let end = binder.compile_scalar(&spec.name, axis, &animation.to)?;
            tree.animate(id, axis, timing, end)?;
        }
    }
    Ok(())
}

/// Lowers parsed expressions to engine constraints, resolving names and palette tokens
struct Binder<'a> {
    names: &'a HashMap<String, ComponentId>,
    stylesheet: &'a Stylesheet,
}

impl Binder<'_> {
    fn compile_scalar(
        &self,
        component: &str,
        axis: Axis,
        source: &str,
    ) -> Result<Constraint, SceneError> {
        let expr = parse_constraint(source).map_err(|errors| SceneError::Expression {
            component: component.to_string(),
            axis: axis.name().to_string(),
            text: source.to_string(),
            errors,
        })?;
        self.constraint(component, axis.name(), &expr)
    }

    fn compile_color(&self, component: &str, source: &str) -> Result<ColorConstraint, SceneError> {
        let expr = parse_color(source).map_err(|errors| SceneError::Expression {
            component: component.to_string(),
            axis: "color".to_string(),
            text: source.to_string(),
            errors,
        })?;
        self.color(component, &expr)
    }

    fn lookup(&self, component: &str, name: &Spanned<String>) -> Result<ComponentId, SceneError> {
        self.names
            .get(&name.node)
            .copied()
            .ok_or_else(|| SceneError::UnknownName {
                component: component.to_string(),
                name: name.node.clone(),
                suggestions: find_similar(&name.node, self.names.keys().map(String::as_str), 2),
            })
    }

    fn constraint(
        &self,
        component: &str,
        axis: &str,
        expr: &Spanned<Expr>,
    ) -> Result<Constraint, SceneError> {
        let lower = |e: &Spanned<Expr>| self.constraint(component, axis, e);
        let constraint = match &expr.node {
            Expr::Pixels {
                value,
                opposite,
                outside,
            } => Constraint::pixels_aligned(*value, *opposite, *outside),
            Expr::Relative(fraction) => Constraint::relative(*fraction),
            Expr::Center => Constraint::center(),
            Expr::Sibling {
                padding,
                opposite: false,
            } => Constraint::sibling(*padding),
            Expr::Sibling {
                padding,
                opposite: true,
            } => Constraint::sibling_opposite(*padding),
            Expr::Cram(padding) => Constraint::cram_sibling(*padding),
            Expr::Children(padding) => Constraint::child_sum(*padding),
            Expr::ChildrenMax => Constraint::child_max(),
            Expr::ChildrenRange => Constraint::child_range(),
            Expr::Fill { cursor: true } => Constraint::fill_from_cursor(),
            Expr::Fill { cursor: false } => Constraint::fill(),
            Expr::Aspect(ratio) => Constraint::aspect(*ratio),
            Expr::ImageAspect => Constraint::image_aspect(),
            Expr::TextAspect => Constraint::text_aspect(),
            Expr::Text(scale) => Constraint::scaled_text(*scale),
            Expr::Copy => {
                return Err(SceneError::InvalidExpression {
                    component: component.to_string(),
                    axis: axis.to_string(),
                    message: "`copy` needs a target, as in `copy to header`".to_string(),
                })
            }
            Expr::Call(func, a, b) => {
                let (a, b) = (lower(a)?, lower(b)?);
                match func {
                    BinaryFn::Min => a.min(b),
                    BinaryFn::Max => a.max(b),
                    BinaryFn::AtLeast => a.coerce_at_least(b),
                    BinaryFn::AtMost => a.coerce_at_most(b),
                }
            }
            Expr::Clamp { value, min, max } => lower(value)?.coerce_in(lower(min)?, lower(max)?),
            Expr::Round(mode, inner) => lower(inner)?.rounded(*mode),
            Expr::Scale(inner, factor) => lower(inner)?.scale(*factor),
            Expr::Add(a, b) => lower(a)?.add(lower(b)?),
            Expr::Subtract(a, b) => lower(a)?.subtract(lower(b)?),
            Expr::Target { expr: inner, name } => {
                let target = self.lookup(component, name)?;
                let base = match &inner.node {
                    Expr::Copy => Constraint::new(ConstraintKind::Copy),
                    _ => lower(inner)?,
                };
                base.to(target)?
            }
        };
        Ok(constraint)
    }

    fn color(
        &self,
        component: &str,
        expr: &Spanned<ColorExpr>,
    ) -> Result<ColorConstraint, SceneError> {
        let invalid = |message: &str| SceneError::InvalidExpression {
            component: component.to_string(),
            axis: "color".to_string(),
            message: message.to_string(),
        };
        let constraint = match &expr.node {
            ColorExpr::Hex(color) => ColorConstraint::constant(*color),
            ColorExpr::Token(token) => {
                let color =
                    self.stylesheet
                        .resolve(token)
                        .ok_or_else(|| SceneError::UnknownColor {
                            component: component.to_string(),
                            token: token.clone(),
                            suggestions: find_similar(
                                token,
                                self.stylesheet.token_names().iter().map(String::as_str),
                                2,
                            ),
                        })?;
                ColorConstraint::constant(color)
            }
            ColorExpr::Inherit => ColorConstraint::inherited(),
            ColorExpr::Rainbow { speed, alpha } => {
                ColorConstraint::rainbow(*speed, alpha.clamp(0.0, 255.0).round() as u8)
            }
            ColorExpr::ParentAlpha { color, alpha } => match self.color(component, color)?.kind() {
                ColorKind::Constant(base) => ColorConstraint::alpha_of_parent(*base, *alpha),
                _ => return Err(invalid("`parent_alpha` takes a literal color or palette token")),
            },
            ColorExpr::Copy => {
                return Err(invalid("`copy` needs a target, as in `copy to header`"));
            }
            ColorExpr::Target { expr: inner, name } => {
                let target = self.lookup(component, name)?;
                let base = match &inner.node {
                    ColorExpr::Copy => ColorConstraint::new(ColorKind::Copy),
                    _ => self.color(component, inner)?,
                };
                base.to(target)?
            }
        };
        Ok(constraint)
    }
}

/// Compute the Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(row[j]).min(above)
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Up to three candidates within `max_distance` edits of `target`, closest first
fn find_similar<'a>(
    target: &str,
    candidates: impl Iterator<Item = &'a str>,
    max_distance: usize,
) -> Vec<String> {
    let mut matches: Vec<(usize, &str)> = candidates
        .map(|c| (levenshtein_distance(target, c), c))
        .filter(|(d, _)| *d > 0 && *d <= max_distance)
        .collect();
    matches.sort();
    matches.into_iter().take(3).map(|(_, c)| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rgba;

    fn load(src: &str) -> Scene {
        Scene::from_str(src, &Stylesheet::default()).expect("scene should load")
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_find_similar_sorted_and_limited() {
        let candidates = ["header", "headers", "leader", "footer", "heade"];
        let similar = find_similar("header", candidates.iter().copied(), 2);
        assert_eq!(similar, vec!["heade", "headers", "leader"]);
    }

    #[test]
    fn test_window_section_configures_viewport() {
        let scene = load("[window]\nwidth = 320\nheight = 200\n");
        assert_eq!(scene.tree().config().viewport, (320.0, 200.0));
        assert_eq!(scene.get(ROOT_NAME), Some(scene.root()));
    }

    #[test]
    fn test_forward_reference_resolves() {
        let scene = load(
            r#"
[[component]]
name = "a"
width = "copy to b"

[[component]]
name = "b"
width = "120px"
"#,
        );
        let a = scene.require("a").unwrap();
        assert_eq!(scene.tree().get_width(a).unwrap(), 120.0);
    }

    #[test]
    fn test_nested_children() {
        let scene = load(
            r#"
[[component]]
name = "panel"
kind = "container"

  [[component.children]]
  name = "label"
  kind = "text"
  text = "hi"
"#,
        );
        let panel = scene.require("panel").unwrap();
        let label = scene.require("label").unwrap();
        assert_eq!(scene.tree().parent(label).unwrap(), Some(panel));
    }

    #[test]
    fn test_unknown_name_suggests() {
        let result = Scene::from_str(
            r#"
[[component]]
name = "header"

[[component]]
name = "body"
y = "sibling to headr"
"#,
            &Stylesheet::default(),
        );
        match result {
            Err(SceneError::UnknownName {
                name, suggestions, ..
            }) => {
                assert_eq!(name, "headr");
                assert_eq!(suggestions, vec!["header"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an unknown name error"),
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Scene::from_str(
            "[[component]]\nname = \"a\"\n[[component]]\nname = \"a\"\n",
            &Stylesheet::default(),
        );
        assert!(matches!(result, Err(SceneError::DuplicateName { .. })));
    }

    #[test]
    fn test_expression_error_reports_source() {
        let result = Scene::from_str(
            "[[component]]\nname = \"a\"\nwidth = \"10px +\"\n",
            &Stylesheet::default(),
        );
        let Err(err) = result else {
            panic!("expected an expression error")
        };
        assert!(matches!(err, SceneError::Expression { .. }));
        assert!(err.report().contains("a.width"));
    }

    #[test]
    fn test_palette_token_and_unknown_token() {
        let scene = load("[[component]]\nname = \"a\"\ncolor = \"status-error\"\n");
        let a = scene.require("a").unwrap();
        assert_eq!(
            scene.tree().get_color(a).unwrap(),
            Rgba::rgb(0xf4, 0x43, 0x36)
        );

        let result = Scene::from_str(
            "[[component]]\nname = \"a\"\ncolor = \"status-eror\"\n",
            &Stylesheet::default(),
        );
        assert!(matches!(result, Err(SceneError::UnknownColor { .. })));
    }

    #[test]
    fn test_bare_copy_rejected() {
        let result = Scene::from_str(
            "[[component]]\nname = \"a\"\nwidth = \"copy\"\n",
            &Stylesheet::default(),
        );
        assert!(matches!(result, Err(SceneError::InvalidExpression { .. })));
    }

    #[test]
    fn test_unknown_easing_suggests() {
        let result = Scene::from_str(
            r#"
[[component]]
name = "a"

  [[component.animate]]
  axis = "width"
  to = "10px"
  duration = 1.0
  easing = "linaer"
"#,
            &Stylesheet::default(),
        );
        match result {
            Err(SceneError::UnknownEasing { suggestions, .. }) => {
                assert!(suggestions.contains(&"linear".to_string()));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an unknown easing error"),
        }
    }

    #[test]
    fn test_compile_constraint_against_scene() {
        let scene = load("[[component]]\nname = \"a\"\nwidth = \"40px\"\n");
        let constraint = scene.compile_constraint("copy to a * 2").unwrap();
        assert_eq!(constraint.name(), "scale");
    }
}
