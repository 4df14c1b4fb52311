//! SVG backend

use crate::layout::{LayoutError, Point, Rect, Rgba};
use crate::stylesheet::Stylesheet;
use crate::tree::{ComponentId, UiTree};

use super::{DisplayList, RenderBackend, SvgConfig};

/// Line height of unscaled text, matching the default font
const BASE_FONT_SIZE: f64 = 9.0;

/// Builds an SVG document from drawing calls
pub struct SvgBackend {
    config: SvgConfig,
    viewport: Rect,
    styles: Vec<String>,
    elements: Vec<String>,
    failed: bool,
}

impl SvgBackend {
    /// Create a backend drawing into a canvas the size of `viewport`
    pub fn new(config: SvgConfig, viewport: Rect) -> Self {
        Self {
            config,
            viewport,
            styles: vec![],
            elements: vec![],
            failed: false,
        }
    }

    /// Expose the palette as CSS custom properties
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut tokens: Vec<_> = stylesheet.colors.iter().collect();
        tokens.sort_by(|a, b| a.0.cmp(b.0));
        let mut css = String::from(":root {");
        for (token, color) in tokens {
            css.push_str(&format!(" --{}: {};", token, color.to_hex()));
        }
        css.push_str(" }");
        self.styles.push(css);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        " ".repeat(self.config.indent)
    }

    fn newline(&self) -> &str {
        if self.config.is_pretty() {
            "\n"
        } else {
            ""
        }
    }

    fn class_attr(&self, kind: &str) -> String {
        let prefix = self.prefix();
        format!(r#" class="{}shape {}{}""#, prefix, prefix, kind)
    }

    fn name_attrs(&self, name: &str) -> String {
        if self.config.debug_labels {
            let name = escape_xml(name);
            format!(r#" id="{}" data-name="{}""#, name, name)
        } else {
            String::new()
        }
    }

    /// Whether an error notice has been drawn
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Build the final SVG string
    pub fn finish(self) -> String {
        let padding = self.config.margin;
        let vb_x = self.viewport.x - padding;
        let vb_y = self.viewport.y - padding;
        let vb_w = self.viewport.width + 2.0 * padding;
        let vb_h = self.viewport.height + 2.0 * padding;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            vb_w, vb_h, vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str(&format!("{}<style>", self.indent_str()));
            for style in &self.styles {
                svg.push_str(style);
            }
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        if let Some(background) = self.config.background {
            svg.push_str(&format!(
                r#"{}<rect class="{}background" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                self.indent_str(),
                self.prefix(),
                self.viewport.x,
                self.viewport.y,
                self.viewport.width,
                self.viewport.height,
                fill_attrs(background)
            ));
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

impl RenderBackend for SvgBackend {
    fn fill_rect(&mut self, name: &str, rect: Rect, color: Rgba) {
        self.elements.push(format!(
            r#"{}<rect{}{} x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            self.name_attrs(name),
            self.class_attr("block"),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            fill_attrs(color)
        ));
    }

    fn fill_circle(&mut self, name: &str, center: Point, radius: f64, color: Rgba) {
        self.elements.push(format!(
            r#"{}<circle{}{} cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            self.name_attrs(name),
            self.class_attr("circle"),
            center.x,
            center.y,
            radius,
            fill_attrs(color)
        ));
    }

    fn draw_string(&mut self, name: &str, text: &str, origin: Point, scale: f64, color: Rgba) {
        self.elements.push(format!(
            r#"{}<text{}{} x="{}" y="{}" font-size="{}" font-family="{}" dominant-baseline="hanging"{}>{}</text>"#,
            self.indent_str(),
            self.name_attrs(name),
            self.class_attr("text"),
            origin.x,
            origin.y,
            BASE_FONT_SIZE * scale,
            escape_xml(&self.config.font_family),
            fill_attrs(color),
            escape_xml(text)
        ));
    }

    fn draw_image(&mut self, name: &str, rect: Rect, color: Rgba) {
        // Image decoding is left to the host; emit the placeholder frame
        self.elements.push(format!(
            r#"{}<rect{}{} x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}"/>"#,
            self.indent_str(),
            self.name_attrs(name),
            self.class_attr("image"),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            color.to_hex()
        ));
    }

    fn draw_error_notice(&mut self, viewport: Rect, message: &str) {
        let prefix = self.prefix();
        self.failed = true;
        self.elements.clear();
        self.elements.push(format!(
            r##"{}<rect class="{}error" x="{}" y="{}" width="{}" height="{}" fill="#000000"/>"##,
            self.indent_str(),
            prefix,
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height
        ));
        self.elements.push(format!(
            r##"{}<text class="{}error" x="{}" y="{}" text-anchor="middle" fill="#ff5555">rendering failed: {}</text>"##,
            self.indent_str(),
            prefix,
            viewport.center().x,
            viewport.center().y,
            escape_xml(message)
        ));
    }
}

/// Render the subtree under `root` to an SVG string sized to the tree's viewport
pub fn render_svg(tree: &UiTree, root: ComponentId, config: &SvgConfig) -> Result<String, LayoutError> {
    let (width, height) = tree.config().viewport;
    let list = DisplayList::build(tree, root)?;
    let mut backend = SvgBackend::new(config.clone(), Rect::new(0.0, 0.0, width, height));
    list.replay(&mut backend);
    Ok(backend.finish())
}

fn fill_attrs(color: Rgba) -> String {
    if color.a == 255 {
        format!(r#" fill="{}""#, color.to_hex())
    } else {
        format!(
            r#" fill="{}" fill-opacity="{}""#,
            color.to_hex(),
            (color.opacity() * 1000.0).round() / 1000.0
        )
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
