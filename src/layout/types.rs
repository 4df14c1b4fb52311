//! Core value types shared by the constraint engine

use std::fmt;

/// The property a constraint slot controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Width,
    Height,
    Radius,
    TextScale,
    Color,
}

impl Axis {
    /// Every axis, in slot order
    pub const ALL: [Axis; 7] = [
        Axis::X,
        Axis::Y,
        Axis::Width,
        Axis::Height,
        Axis::Radius,
        Axis::TextScale,
        Axis::Color,
    ];

    /// The axes that resolve to a scalar
    pub const SCALAR: [Axis; 6] = [
        Axis::X,
        Axis::Y,
        Axis::Width,
        Axis::Height,
        Axis::Radius,
        Axis::TextScale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Width => "width",
            Axis::Height => "height",
            Axis::Radius => "radius",
            Axis::TextScale => "text_scale",
            Axis::Color => "color",
        }
    }

    /// Look up an axis by its lowercase name
    pub fn from_name(name: &str) -> Option<Axis> {
        Axis::ALL.into_iter().find(|axis| axis.name() == name)
    }

    pub fn is_scalar(self) -> bool {
        self != Axis::Color
    }

    pub fn is_position(self) -> bool {
        matches!(self, Axis::X | Axis::Y)
    }

    /// The size axis measured along the same direction as this position axis
    pub fn size_axis(self) -> Axis {
        match self {
            Axis::X | Axis::Width => Axis::Width,
            Axis::Y | Axis::Height => Axis::Height,
            other => other,
        }
    }

    /// The position axis measured along the same direction as this size axis
    pub fn position_axis(self) -> Axis {
        match self {
            Axis::Width | Axis::X => Axis::X,
            Axis::Height | Axis::Y => Axis::Y,
            other => other,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut expanded = String::with_capacity(6);
                for c in digits.chars() {
                    expanded.push(c);
                    expanded.push(c);
                }
                Self::from_hex(&format!("#{}", expanded))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a fraction in `[0, 1]`
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Channel-wise linear interpolation
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |from: u8, to: u8| {
            let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A resolved rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Strict containment: points on the edge are outside
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_names_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_name(axis.name()), Some(axis));
        }
        assert_eq!(Axis::from_name("depth"), None);
    }

    #[test]
    fn test_axis_direction_pairs() {
        assert_eq!(Axis::X.size_axis(), Axis::Width);
        assert_eq!(Axis::Height.position_axis(), Axis::Y);
        assert!(!Axis::Color.is_scalar());
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#ff8000"), Some(Rgba::rgb(255, 128, 0)));
        assert_eq!(Rgba::from_hex("#f00"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(
            Rgba::from_hex("#00000080"),
            Some(Rgba::new(0, 0, 0, 128))
        );
        assert_eq!(Rgba::from_hex("ff0000"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::new(128, 128, 128, 255));
    }

    #[test]
    fn test_rect_contains_is_strict() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(5.0, 5.0)));
        assert!(!rect.contains(Point::new(0.0, 5.0)));
        assert!(!rect.contains(Point::new(10.0, 10.0)));
    }
}
