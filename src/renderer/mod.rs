//! Rendering backends
//!
//! A frame is first recorded into a [`DisplayList`] by walking the tree and resolving every
//! component's geometry. Only a fully recorded list is replayed onto a [`RenderBackend`], so a
//! resolution failure never leaves a half-painted frame behind.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, SvgBackend};

use crate::layout::{LayoutError, Point, Rect, Rgba};
use crate::tree::{ComponentId, ComponentKind, UiTree};

/// Drawing primitives the layout engine needs from a host
pub trait RenderBackend {
    fn fill_rect(&mut self, name: &str, rect: Rect, color: Rgba);

    fn fill_circle(&mut self, name: &str, center: Point, radius: f64, color: Rgba);

    /// Draw `text` with its top-left corner at `origin`
    fn draw_string(&mut self, name: &str, text: &str, origin: Point, scale: f64, color: Rgba);

    /// Draw an image stretched over `rect`, tinted by `color`
    fn draw_image(&mut self, name: &str, rect: Rect, color: Rgba);

    /// Replace the frame with a notice that rendering failed
    fn draw_error_notice(&mut self, viewport: Rect, message: &str);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        name: String,
        rect: Rect,
        color: Rgba,
    },
    Circle {
        name: String,
        center: Point,
        radius: f64,
        color: Rgba,
    },
    Text {
        name: String,
        text: String,
        origin: Point,
        scale: f64,
        color: Rgba,
    },
    Image {
        name: String,
        rect: Rect,
        color: Rgba,
    },
    ErrorNotice {
        viewport: Rect,
        message: String,
    },
}

/// Drawing operations in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the subtree under `root`, parents before children
    pub fn build(tree: &UiTree, root: ComponentId) -> Result<Self, LayoutError> {
        let mut list = Self::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            list.record(tree, id)?;
            stack.extend(tree.children(id)?.iter().rev());
        }
        Ok(list)
    }

    fn record(&mut self, tree: &UiTree, id: ComponentId) -> Result<(), LayoutError> {
        let name = tree.name(id)?;
        match tree.kind(id)? {
            ComponentKind::Container => {}
            ComponentKind::Block => {
                let color = tree.get_color(id)?;
                if color.a > 0 {
                    self.fill_rect(name, tree.bounds(id)?, color);
                }
            }
            ComponentKind::Circle => {
                let color = tree.get_color(id)?;
                if color.a > 0 {
                    let radius = tree.get_radius(id)?;
                    let center = Point::new(tree.get_left(id)? + radius, tree.get_top(id)? + radius);
                    self.fill_circle(name, center, radius, color);
                }
            }
            ComponentKind::Text { text } => {
                if !text.is_empty() {
                    let origin = Point::new(tree.get_left(id)?, tree.get_top(id)?);
                    let scale = tree.get_text_scale(id)?;
                    self.draw_string(name, text, origin, scale, tree.get_color(id)?);
                }
            }
            ComponentKind::Image { .. } => {
                self.draw_image(name, tree.bounds(id)?, tree.get_color(id)?);
            }
        }
        Ok(())
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay every command onto `backend`
    pub fn replay(&self, backend: &mut dyn RenderBackend) {
        for command in &self.commands {
            match command {
                DrawCommand::Rect { name, rect, color } => backend.fill_rect(name, *rect, *color),
                DrawCommand::Circle {
                    name,
                    center,
                    radius,
                    color,
                } => backend.fill_circle(name, *center, *radius, *color),
                DrawCommand::Text {
                    name,
                    text,
                    origin,
                    scale,
                    color,
                } => backend.draw_string(name, text, *origin, *scale, *color),
                DrawCommand::Image { name, rect, color } => backend.draw_image(name, *rect, *color),
                DrawCommand::ErrorNotice { viewport, message } => {
                    backend.draw_error_notice(*viewport, message)
                }
            }
        }
    }
}

impl RenderBackend for DisplayList {
    fn fill_rect(&mut self, name: &str, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Rect {
            name: name.to_string(),
            rect,
            color,
        });
    }

    fn fill_circle(&mut self, name: &str, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            name: name.to_string(),
            center,
            radius,
            color,
        });
    }

    fn draw_string(&mut self, name: &str, text: &str, origin: Point, scale: f64, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            name: name.to_string(),
            text: text.to_string(),
            origin,
            scale,
            color,
        });
    }

    fn draw_image(&mut self, name: &str, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Image {
            name: name.to_string(),
            rect,
            color,
        });
    }

    fn draw_error_notice(&mut self, viewport: Rect, message: &str) {
        self.commands.push(DrawCommand::ErrorNotice {
            viewport,
            message: message.to_string(),
        });
    }
}
