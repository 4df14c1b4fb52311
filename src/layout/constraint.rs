//! Scalar constraint kinds
//!
//! A [`Constraint`] is pure data plus a cache slot. It has no back-reference to the component
//! that owns it; the owning component and axis are passed in on every resolution. Evaluation
//! lives in `compute.rs` and dependency declaration in `visitor.rs`, so the cycle detector can
//! inspect a constraint without ever evaluating it.

use crate::tree::ComponentId;

use super::cache::ConstraintCache;
use super::error::LayoutError;
use super::types::Axis;

/// How [`ConstraintKind::Round`] snaps its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    Floor,
    Ceil,
    Round,
}

impl RoundingMode {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::Floor => value.floor(),
            RoundingMode::Ceil => value.ceil(),
            RoundingMode::Round => value.round(),
        }
    }
}

/// The closed set of scalar constraint behaviors
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// Constant offset from an edge of the reference frame, or a constant size
    Pixels {
        value: f64,
        align_opposite: bool,
        align_outside: bool,
    },
    /// Fraction of the reference frame's size
    Relative { fraction: f64 },
    /// Centered within the reference frame
    Center,
    /// Directly after the previous sibling
    Sibling { padding: f64, align_opposite: bool },
    /// After the previous sibling on the same line when it fits, otherwise on a new line
    CramSibling { padding: f64 },
    /// Sum of the children's sizes plus padding between them
    ChildSum { padding: f64 },
    /// Largest child size
    ChildMax,
    /// Distance from the leading edge of the first child to the trailing edge of the last
    ChildRange,
    /// Space left in the reference frame
    Fill { use_siblings: bool },
    /// Multiple of the component's other axis
    Aspect { ratio: f64 },
    /// Keeps an image component's natural aspect ratio
    ImageAspect,
    /// Keeps a text component's natural aspect ratio
    TextAspect,
    /// Size of a text component's string at a fixed scale
    ScaledText { scale: f64 },
    Add(Box<Constraint>, Box<Constraint>),
    Subtract(Box<Constraint>, Box<Constraint>),
    Scale(Box<Constraint>, f64),
    Min(Box<Constraint>, Box<Constraint>),
    Max(Box<Constraint>, Box<Constraint>),
    CoerceAtLeast(Box<Constraint>, Box<Constraint>),
    CoerceAtMost(Box<Constraint>, Box<Constraint>),
    CoerceIn {
        value: Box<Constraint>,
        min: Box<Constraint>,
        max: Box<Constraint>,
    },
    /// Same value as the bound target's same axis
    Copy,
    Round(Box<Constraint>, RoundingMode),
}

/// A scalar constraint installed in a component's axis slot
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: ConstraintKind,
    target: Option<ComponentId>,
    cache: ConstraintCache<f64>,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::pixels(0.0)
    }
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            target: None,
            cache: ConstraintCache::new(0.0),
        }
    }

    pub fn pixels(value: f64) -> Self {
        Self::new(ConstraintKind::Pixels {
            value,
            align_opposite: false,
            align_outside: false,
        })
    }

    /// Pixels measured from the trailing edge and/or placed outside the reference frame
    pub fn pixels_aligned(value: f64, align_opposite: bool, align_outside: bool) -> Self {
        Self::new(ConstraintKind::Pixels {
            value,
            align_opposite,
            align_outside,
        })
    }

    pub fn relative(fraction: f64) -> Self {
        Self::new(ConstraintKind::Relative { fraction })
    }

    pub fn center() -> Self {
        Self::new(ConstraintKind::Center)
    }

    pub fn sibling(padding: f64) -> Self {
        Self::new(ConstraintKind::Sibling {
            padding,
            align_opposite: false,
        })
    }

    pub fn sibling_opposite(padding: f64) -> Self {
        Self::new(ConstraintKind::Sibling {
            padding,
            align_opposite: true,
        })
    }

    pub fn cram_sibling(padding: f64) -> Self {
        Self::new(ConstraintKind::CramSibling { padding })
    }

    pub fn child_sum(padding: f64) -> Self {
        Self::new(ConstraintKind::ChildSum { padding })
    }

    pub fn child_max() -> Self {
        Self::new(ConstraintKind::ChildMax)
    }

    pub fn child_range() -> Self {
        Self::new(ConstraintKind::ChildRange)
    }

    /// Fill what the siblings leave of the reference frame
    pub fn fill() -> Self {
        Self::new(ConstraintKind::Fill { use_siblings: true })
    }

    /// Fill from the component's own leading edge to the frame's trailing edge
    pub fn fill_from_cursor() -> Self {
        Self::new(ConstraintKind::Fill {
            use_siblings: false,
        })
    }

    pub fn aspect(ratio: f64) -> Self {
        Self::new(ConstraintKind::Aspect { ratio })
    }

    pub fn image_aspect() -> Self {
        Self::new(ConstraintKind::ImageAspect)
    }

    pub fn text_aspect() -> Self {
        Self::new(ConstraintKind::TextAspect)
    }

    pub fn scaled_text(scale: f64) -> Self {
        Self::new(ConstraintKind::ScaledText { scale })
    }

    /// Copy the same axis from `target`
    pub fn copy_of(target: ComponentId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(ConstraintKind::Copy)
        }
    }

    pub fn add(self, other: Constraint) -> Self {
        Self::new(ConstraintKind::Add(Box::new(self), Box::new(other)))
    }

    pub fn subtract(self, other: Constraint) -> Self {
        Self::new(ConstraintKind::Subtract(Box::new(self), Box::new(other)))
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(ConstraintKind::Scale(Box::new(self), factor))
    }

    pub fn min(self, other: Constraint) -> Self {
        Self::new(ConstraintKind::Min(Box::new(self), Box::new(other)))
    }

    pub fn max(self, other: Constraint) -> Self {
        Self::new(ConstraintKind::Max(Box::new(self), Box::new(other)))
    }

    pub fn coerce_at_least(self, min: Constraint) -> Self {
        Self::new(ConstraintKind::CoerceAtLeast(Box::new(self), Box::new(min)))
    }

    pub fn coerce_at_most(self, max: Constraint) -> Self {
        Self::new(ConstraintKind::CoerceAtMost(Box::new(self), Box::new(max)))
    }

    pub fn coerce_in(self, min: Constraint, max: Constraint) -> Self {
        Self::new(ConstraintKind::CoerceIn {
            value: Box::new(self),
            min: Box::new(min),
            max: Box::new(max),
        })
    }

    pub fn rounded(self, mode: RoundingMode) -> Self {
        Self::new(ConstraintKind::Round(Box::new(self), mode))
    }

    /// Resolve against `target` instead of the natural parent/self
    ///
    /// Kinds whose value is defined by their operands or by the owning component's own
    /// content reject a target.
    pub fn to(mut self, target: ComponentId) -> Result<Self, LayoutError> {
        self.bind_target(target)?;
        Ok(self)
    }

    /// In-place form of [`Constraint::to`]
    pub fn bind_target(&mut self, target: ComponentId) -> Result<(), LayoutError> {
        if !self.accepts_target() {
            return Err(LayoutError::target_not_supported(self.name()));
        }
        self.target = Some(target);
        self.cache.invalidate();
        Ok(())
    }

    fn accepts_target(&self) -> bool {
        !matches!(
            self.kind,
            ConstraintKind::CramSibling { .. }
                | ConstraintKind::ImageAspect
                | ConstraintKind::TextAspect
                | ConstraintKind::ScaledText { .. }
                | ConstraintKind::Add(..)
                | ConstraintKind::Subtract(..)
                | ConstraintKind::Scale(..)
                | ConstraintKind::Min(..)
                | ConstraintKind::Max(..)
                | ConstraintKind::CoerceAtLeast(..)
                | ConstraintKind::CoerceAtMost(..)
                | ConstraintKind::CoerceIn { .. }
        )
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn target(&self) -> Option<ComponentId> {
        self.target
    }

    pub fn cache(&self) -> &ConstraintCache<f64> {
        &self.cache
    }

    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self.kind {
            ConstraintKind::Pixels { .. } => "pixels",
            ConstraintKind::Relative { .. } => "relative",
            ConstraintKind::Center => "center",
            ConstraintKind::Sibling { .. } => "sibling",
            ConstraintKind::CramSibling { .. } => "cram",
            ConstraintKind::ChildSum { .. } => "children",
            ConstraintKind::ChildMax => "children_max",
            ConstraintKind::ChildRange => "children_range",
            ConstraintKind::Fill { .. } => "fill",
            ConstraintKind::Aspect { .. } => "aspect",
            ConstraintKind::ImageAspect => "image_aspect",
            ConstraintKind::TextAspect => "text_aspect",
            ConstraintKind::ScaledText { .. } => "text",
            ConstraintKind::Add(..) => "add",
            ConstraintKind::Subtract(..) => "subtract",
            ConstraintKind::Scale(..) => "scale",
            ConstraintKind::Min(..) => "min",
            ConstraintKind::Max(..) => "max",
            ConstraintKind::CoerceAtLeast(..) => "at_least",
            ConstraintKind::CoerceAtMost(..) => "at_most",
            ConstraintKind::CoerceIn { .. } => "clamp",
            ConstraintKind::Copy => "copy",
            ConstraintKind::Round(..) => "round",
        }
    }

    /// Nested constraints whose values feed this one
    pub fn operands(&self) -> Vec<&Constraint> {
        match &self.kind {
            ConstraintKind::Add(a, b)
            | ConstraintKind::Subtract(a, b)
            | ConstraintKind::Min(a, b)
            | ConstraintKind::Max(a, b)
            | ConstraintKind::CoerceAtLeast(a, b)
            | ConstraintKind::CoerceAtMost(a, b) => vec![a.as_ref(), b.as_ref()],
            ConstraintKind::CoerceIn { value, min, max } => {
                vec![value.as_ref(), min.as_ref(), max.as_ref()]
            }
            ConstraintKind::Scale(inner, _) | ConstraintKind::Round(inner, _) => {
                vec![inner.as_ref()]
            }
            _ => Vec::new(),
        }
    }

    /// Whether this kind defines a value for `axis`
    pub fn supports(&self, axis: Axis) -> bool {
        use Axis::*;
        match &self.kind {
            ConstraintKind::Pixels { .. }
            | ConstraintKind::Relative { .. }
            | ConstraintKind::Copy => axis.is_scalar(),
            ConstraintKind::Center
            | ConstraintKind::Sibling { .. }
            | ConstraintKind::CramSibling { .. } => axis.is_position(),
            ConstraintKind::ChildSum { .. } | ConstraintKind::ChildMax => {
                matches!(axis, Width | Height | Radius | TextScale)
            }
            ConstraintKind::ChildRange
            | ConstraintKind::ImageAspect
            | ConstraintKind::TextAspect
            | ConstraintKind::ScaledText { .. } => matches!(axis, Width | Height),
            ConstraintKind::Fill { .. } => matches!(axis, Width | Height | Radius),
            ConstraintKind::Aspect { .. } => matches!(axis, X | Y | Width | Height | Radius),
            _ => axis.is_scalar() && self.operands().iter().all(|op| op.supports(axis)),
        }
    }

    /// Check that this constraint can be installed on `axis`
    pub fn validate_for(&self, axis: Axis) -> Result<(), LayoutError> {
        if self.supports(axis) {
            Ok(())
        } else {
            Err(LayoutError::unsupported_axis(self.name(), axis))
        }
    }

    /// Mark this constraint and every operand as needing recomputation
    pub fn invalidate(&self) {
        self.cache.invalidate();
        for operand in self.operands() {
            operand.invalidate();
        }
    }

    /// Components this constraint reads through an explicit binding, operands included
    pub fn bound_targets(&self) -> Vec<ComponentId> {
        let mut targets: Vec<ComponentId> = self.target.into_iter().collect();
        for operand in self.operands() {
            targets.extend(operand.bound_targets());
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_pixels() {
        let constraint = Constraint::default();
        assert!(matches!(
            constraint.kind(),
            ConstraintKind::Pixels { value, .. } if *value == 0.0
        ));
        assert!(constraint.cache().needs_recalculation());
    }

    #[test]
    fn test_axis_support_table() {
        assert!(Constraint::center().supports(Axis::X));
        assert!(!Constraint::center().supports(Axis::Width));
        assert!(Constraint::child_sum(0.0).supports(Axis::TextScale));
        assert!(!Constraint::fill().supports(Axis::X));
        assert!(!Constraint::pixels(1.0).supports(Axis::Color));
    }

    #[test]
    fn test_operand_support_propagates() {
        let mixed = Constraint::center().add(Constraint::pixels(4.0));
        assert!(mixed.supports(Axis::Y));
        assert!(!mixed.supports(Axis::Height));
    }

    #[test]
    fn test_validate_for_reports_kind() {
        let err = Constraint::sibling(2.0).validate_for(Axis::Height).unwrap_err();
        assert_eq!(err, LayoutError::unsupported_axis("sibling", Axis::Height));
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(RoundingMode::Floor.apply(2.7), 2.0);
        assert_eq!(RoundingMode::Ceil.apply(2.1), 3.0);
        assert_eq!(RoundingMode::Round.apply(2.5), 3.0);
    }
}
