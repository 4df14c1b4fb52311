//! Text measurement
//!
//! Constraints that size components from their text (`text(..)`, `text_aspect`) ask the
//! component's [`FontProvider`] for pixel metrics. Measurements go through a
//! [`TextMetricsCache`] owned by the tree, keyed by font identity, text and scale.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;

/// Returns pixel metrics for strings at a given scale
pub trait FontProvider: Debug {
    /// Width of `text` in pixels at `scale`
    fn string_width(&self, text: &str, scale: f64) -> f64;

    /// Height of `text` in pixels at `scale`
    fn string_height(&self, text: &str, scale: f64) -> f64 {
        let lines = text.lines().count().max(1) as f64;
        self.line_height(scale) * lines
    }

    /// Height of a single line at `scale`
    fn line_height(&self, scale: f64) -> f64;
}

/// Fixed-advance font used when nothing else is configured
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceFont {
    /// Horizontal advance of every glyph at scale 1
    pub advance: f64,
    /// Line height at scale 1
    pub line_height: f64,
}

impl Default for MonospaceFont {
    fn default() -> Self {
        Self {
            advance: 6.0,
            line_height: 9.0,
        }
    }
}

impl FontProvider for MonospaceFont {
    fn string_width(&self, text: &str, scale: f64) -> f64 {
        let widest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        widest as f64 * self.advance * scale
    }

    fn line_height(&self, scale: f64) -> f64 {
        self.line_height * scale
    }
}

/// The font every new component starts with
pub fn default_font() -> Arc<dyn FontProvider> {
    Arc::new(MonospaceFont::default())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetricsKey {
    font: usize,
    text: String,
    scale: u64,
}

/// Bounded cache of string widths
///
/// Oldest entries are evicted first once `capacity` is reached.
#[derive(Debug)]
pub struct TextMetricsCache {
    capacity: usize,
    widths: HashMap<MetricsKey, f64>,
    order: VecDeque<MetricsKey>,
    hits: u64,
    misses: u64,
}

impl Default for TextMetricsCache {
    fn default() -> Self {
        Self::with_capacity(512)
    }
}

impl TextMetricsCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            widths: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Width of `text` in `font`, measuring on a miss
    pub fn string_width(&mut self, font: &Arc<dyn FontProvider>, text: &str, scale: f64) -> f64 {
        let key = MetricsKey {
            font: font_identity(font),
            text: text.to_string(),
            scale: scale.to_bits(),
        };
        if let Some(width) = self.widths.get(&key) {
            self.hits += 1;
            return *width;
        }
        self.misses += 1;
        let width = font.string_width(text, scale);
        if self.widths.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.widths.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.widths.insert(key, width);
        width
    }

    /// Drop every measurement taken with `font`
    pub fn evict(&mut self, font: &Arc<dyn FontProvider>) {
        let identity = font_identity(font);
        self.widths.retain(|key, _| key.font != identity);
        self.order.retain(|key| key.font != identity);
    }

    pub fn clear(&mut self) {
        self.widths.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

fn font_identity(font: &Arc<dyn FontProvider>) -> usize {
    Arc::as_ptr(font) as *const () as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_metrics() {
        let font = MonospaceFont::default();
        assert_eq!(font.string_width("abcd", 1.0), 24.0);
        assert_eq!(font.string_width("abcd", 2.0), 48.0);
        assert_eq!(font.string_height("ab\ncd", 1.0), 18.0);
        assert_eq!(font.string_width("", 1.0), 0.0);
    }

    #[test]
    fn test_cache_hits_after_first_measure() {
        let font = default_font();
        let mut cache = TextMetricsCache::default();
        assert_eq!(cache.string_width(&font, "hello", 1.0), 30.0);
        assert_eq!(cache.string_width(&font, "hello", 1.0), 30.0);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let font = default_font();
        let mut cache = TextMetricsCache::with_capacity(2);
        cache.string_width(&font, "a", 1.0);
        cache.string_width(&font, "b", 1.0);
        cache.string_width(&font, "c", 1.0);
        assert_eq!(cache.len(), 2);
        cache.string_width(&font, "a", 1.0);
        assert_eq!(cache.stats(), (0, 4));
    }

    #[test]
    fn test_evict_by_font() {
        let first = default_font();
        let second: Arc<dyn FontProvider> = Arc::new(MonospaceFont {
            advance: 8.0,
            line_height: 12.0,
        });
        let mut cache = TextMetricsCache::default();
        cache.string_width(&first, "x", 1.0);
        cache.string_width(&second, "x", 1.0);
        cache.evict(&first);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.string_width(&second, "x", 1.0), 8.0);
    }
}
