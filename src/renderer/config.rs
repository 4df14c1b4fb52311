//! Output options for the SVG backend

use crate::layout::Rgba;

/// How [`SvgBackend`](super::SvgBackend) lays out its document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Extra space around the window in the viewBox, in layout units
    pub margin: f64,

    /// Emit the `<?xml ...?>` declaration before the root element
    pub standalone: bool,

    /// Spaces per nesting level; `0` writes the whole document on one line
    pub indent: usize,

    /// Prepended to every CSS class, so `tr-` gives `tr-block`
    pub class_prefix: Option<String>,

    /// Painted over the whole window before any component
    pub background: Option<Rgba>,

    /// `font-family` of text elements; should match the font the layout measured with
    pub font_family: String,

    /// Emit each component's name as `id` and `data-name`
    pub debug_labels: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            standalone: true,
            indent: 2,
            class_prefix: Some("tr-".to_string()),
            background: None,
            font_family: "monospace".to_string(),
            debug_labels: false,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-line fragment without the XML declaration, for embedding
    pub fn compact() -> Self {
        Self {
            standalone: false,
            indent: 0,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Pretty printing indents by two spaces; turning it off writes one line
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.indent = if pretty { 2 } else { 0 };
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_debug_labels(mut self, debug: bool) -> Self {
        self.debug_labels = debug;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.indent > 0
    }
}
