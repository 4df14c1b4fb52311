//! Configuration for the layout engine

/// Configuration options for constraint resolution
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Size of the window the root component fills (width, height)
    pub viewport: (f64, f64),

    /// Deepest chain of nested resolutions before falling back to dependency order
    ///
    /// Every level costs several stack frames, so this stays small enough for a 2 MB thread.
    pub max_resolution_depth: usize,

    /// Slack allowed when testing whether a crammed sibling still fits
    pub cram_epsilon: f64,

    /// Device pixels per layout unit; resolved geometry snaps to this grid
    pub pixel_scale: Option<f64>,

    /// Run the cycle detector when a frame fails on runaway recursion
    pub diagnostics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: (800.0, 600.0),
            max_resolution_depth: 24,
            cram_epsilon: 0.01,
            pixel_scale: None,
            diagnostics: true,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Set the maximum resolution depth
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// Set the cram fit tolerance
    pub fn with_cram_epsilon(mut self, epsilon: f64) -> Self {
        self.cram_epsilon = epsilon;
        self
    }

    /// Snap resolved values to real pixels at the given scale
    pub fn with_pixel_scale(mut self, scale: f64) -> Self {
        self.pixel_scale = Some(scale);
        self
    }

    /// Enable or disable cycle diagnostics on failed frames
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Round a value to the nearest real pixel, if a pixel scale is set
    pub fn round_to_real_pixels(&self, value: f64) -> f64 {
        match self.pixel_scale {
            Some(scale) if scale > 0.0 && value.is_finite() => (value * scale).round() / scale,
            _ => value,
        }
    }
}
