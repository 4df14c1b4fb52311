//! Trellis - a retained-mode constraint layout engine
//!
//! Every visual property of a component (position, size, radius, text scale and color) is
//! produced by a constraint that is resolved lazily against the component tree and cached for
//! the current frame. Scenes can be built in code through [`UiTree`] or declared in TOML with
//! constraint expressions such as `sibling(8)`, `50% - 10px` or `copy to header`.
//!
//! # Example
//!
//! ```rust
//! use trellis::render;
//!
//! let svg = render(r#"
//! [window]
//! width = 200
//! height = 100
//!
//! [[component]]
//! name = "bar"
//! width = "50%"
//! height = "20px"
//! color = "accent-1"
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod events;
pub mod font;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod scene;
pub mod stylesheet;
pub mod tree;
pub mod window;

use std::fmt::Write as _;
use std::rc::Rc;

pub use error::ParseError;
pub use events::{EventData, EventKind, UiEvent};
pub use layout::{
    AnimationSpec, Axis, ColorConstraint, Constraint, Easing, LayoutConfig, LayoutError, Rect,
    Rgba, RecordingDebugger,
};
pub use parser::{parse_color, parse_constraint};
pub use renderer::{render_svg, DisplayList, RenderBackend, SvgBackend, SvgConfig};
pub use scene::{Scene, SceneError};
pub use stylesheet::{Stylesheet, StylesheetError};
pub use tree::{ComponentId, ComponentKind, UiTree};
pub use window::{FrameOutcome, Window, WindowHandle};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The scene could not be loaded
    #[error("{0}")]
    Scene(#[from] SceneError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The stylesheet could not be loaded
    #[error("stylesheet error: {0}")]
    Stylesheet(#[from] StylesheetError),
}

impl RenderError {
    /// Render the error for a terminal, with source context where available
    pub fn report(&self) -> String {
        match self {
            RenderError::Scene(err) => err.report(),
            other => other.to_string(),
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for palette tokens
    pub stylesheet: Stylesheet,
    /// Frames to advance before drawing
    pub frames: u32,
    /// Seconds per frame
    pub frame_time: f64,
    /// Debug mode: print resolved bounds and label SVG elements
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            frames: 0,
            frame_time: 1.0 / 60.0,
            debug: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for palette tokens
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Advance `frames` ticks of `frame_time` seconds before drawing
    pub fn with_frames(mut self, frames: u32, frame_time: f64) -> Self {
        self.frames = frames;
        self.frame_time = frame_time;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Render a TOML scene to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML scene to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use trellis::{render_with_config, RenderConfig, SvgConfig};
///
/// let scene = r#"
/// [[component]]
/// name = "grow"
/// width = "0px"
/// height = "10px"
///
///   [[component.animate]]
///   axis = "width"
///   to = "100px"
///   duration = 1.0
/// "#;
/// let config = RenderConfig::new()
///     .with_frames(2, 0.25)
///     .with_svg(SvgConfig::default().with_pretty_print(false));
///
/// let svg = render_with_config(scene, config).unwrap();
/// assert!(svg.contains(r#"width="50""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let mut scene = Scene::from_str(source, &config.stylesheet)?;
    let window = scene.window_mut();
    for _ in 0..config.frames {
        window.tick(config.frame_time);
    }

    if config.debug {
        eprintln!("=== Layout Debug ===");
        eprint!("{}", describe_layout(window.tree(), window.root())?);
        eprintln!("====================");
    }

    let svg_config = if config.debug {
        config.svg.clone().with_debug_labels(true)
    } else {
        config.svg.clone()
    };
    let mut backend = SvgBackend::new(svg_config, window.viewport());
    backend.add_stylesheet(&config.stylesheet);
    if let FrameOutcome::Failed(err) = window.draw(&mut backend) {
        return Err(err.into());
    }
    Ok(backend.finish())
}

/// Resolved bounds of every component under `root`, one indented line each
pub fn describe_layout(tree: &UiTree, root: ComponentId) -> Result<String, LayoutError> {
    fn describe(
        tree: &UiTree,
        id: ComponentId,
        depth: usize,
        out: &mut String,
    ) -> Result<(), LayoutError> {
        let bounds = tree.bounds(id)?;
        let _ = writeln!(
            out,
            "{}[{}] {} x={:.1} y={:.1} w={:.1} h={:.1}",
            "  ".repeat(depth),
            tree.name(id)?,
            tree.kind(id)?.name(),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
        for child in tree.children(id)?.to_vec() {
            describe(tree, child, depth + 1, out)?;
        }
        Ok(())
    }

    let mut out = String::new();
    describe(tree, root, 0, &mut out)?;
    Ok(out)
}

/// Record every constraint evaluation needed to paint the tree under `root`
pub fn trace_layout(tree: &UiTree, root: ComponentId) -> Result<String, LayoutError> {
    tree.invalidate_all();
    let recorder = Rc::new(RecordingDebugger::new());
    let result = tree.with_debugger(recorder.clone(), |tree| DisplayList::build(tree, root));
    tree.invalidate_all();
    result?;
    Ok(recorder.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COLUMNS: &str = r##"
[window]
width = 200
height = 100

[[component]]
name = "left"
width = "50%"
height = "100%"
color = "#ff0000"

[[component]]
name = "right"
x = "sibling"
width = "fill"
height = "copy to left"
color = "#0000ff"
"##;

    #[test]
    fn test_render_simple_scene() {
        let svg = render(TWO_COLUMNS).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r##"fill="#0000ff""##));
    }

    #[test]
    fn test_render_scene_error() {
        let result = render("[[component]]\nname = \"a\"\nwidth = \"copy to nowhere\"\n");
        assert!(matches!(result, Err(RenderError::Scene(_))));
    }

    #[test]
    fn test_render_layout_error() {
        let result = render(
            r#"
[[component]]
name = "a"
width = "copy to b"
height = "10px"

[[component]]
name = "b"
width = "copy to a"
height = "10px"
"#,
        );
        let Err(RenderError::Layout(LayoutError::CircularConstraint { cycle })) = result else {
            panic!("expected a circular constraint error");
        };
        assert!(cycle.iter().any(|step| step == "a.width"));
    }

    #[test]
    fn test_debug_labels_name_elements() {
        let svg = render_with_config(TWO_COLUMNS, RenderConfig::new().with_debug(true)).unwrap();
        assert!(svg.contains(r#"data-name="left""#));
    }

    #[test]
    fn test_describe_layout() {
        let scene = Scene::from_str(TWO_COLUMNS, &Stylesheet::default()).unwrap();
        let report = describe_layout(scene.tree(), scene.root()).unwrap();
        assert!(report.contains("[right] block x=100.0 y=0.0 w=100.0 h=100.0"));
    }

    #[test]
    fn test_trace_layout_lists_evaluations() {
        let scene = Scene::from_str(TWO_COLUMNS, &Stylesheet::default()).unwrap();
        let trace = trace_layout(scene.tree(), scene.root()).unwrap();
        assert!(trace.contains("right.height = copy"));
    }
}
