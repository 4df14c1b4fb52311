//! Error types for the layout engine

use thiserror::Error;

use crate::tree::ComponentId;

use super::types::Axis;

/// Errors that can occur while building the tree or resolving constraints
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A constraint was evaluated on a component that lacks the data it needs
    #[error("cannot resolve {constraint} on '{component}': {reason}")]
    UnresolvableConstraint {
        constraint: String,
        component: String,
        reason: String,
    },

    /// A constraint kind was installed on an axis it does not define
    #[error("{constraint} cannot be used for the {axis} axis")]
    UnsupportedAxis { constraint: String, axis: Axis },

    /// An explicit target was bound to a constraint that forbids one
    #[error("{constraint} cannot be bound to another component")]
    TargetNotSupported { constraint: String },

    /// The child list is being traversed and cannot be mutated
    #[error("children of '{component}' are locked by an active traversal")]
    ChildrenLocked { component: String },

    /// Structural change that would break the tree invariants
    #[error("invalid tree operation on '{component}': {reason}")]
    InvalidTreeOperation { component: String, reason: String },

    /// A handle refers to a destroyed component
    #[error("component handle {0} is stale")]
    StaleComponent(ComponentId),

    /// The operation needs a parent but the component is a root
    #[error("'{component}' has no parent")]
    NoParent { component: String },

    /// Resolution recursed deeper than the configured limit
    #[error("resolution of '{name}'.{axis} exceeded depth {depth}")]
    ResolutionDepthExceeded {
        component: ComponentId,
        name: String,
        axis: Axis,
        depth: usize,
    },

    /// Circular dependency between constraint slots
    #[error("circular constraint dependency: {}", cycle.join(" -> "))]
    CircularConstraint { cycle: Vec<String> },

    /// The window owning a hand-off queue has been dropped
    #[error("window is closed")]
    WindowClosed,
}

impl LayoutError {
    /// Create an unresolvable constraint error
    pub fn unresolvable(
        constraint: impl Into<String>,
        component: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvableConstraint {
            constraint: constraint.into(),
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported axis error
    pub fn unsupported_axis(constraint: impl Into<String>, axis: Axis) -> Self {
        Self::UnsupportedAxis {
            constraint: constraint.into(),
            axis,
        }
    }

    /// Create a target-not-supported error
    pub fn target_not_supported(constraint: impl Into<String>) -> Self {
        Self::TargetNotSupported {
            constraint: constraint.into(),
        }
    }

    /// Create a children-locked error
    pub fn children_locked(component: impl Into<String>) -> Self {
        Self::ChildrenLocked {
            component: component.into(),
        }
    }

    /// Create an invalid tree operation error
    pub fn invalid_tree(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTreeOperation {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create a circular constraint error
    pub fn circular(cycle: Vec<String>) -> Self {
        Self::CircularConstraint { cycle }
    }

    /// Whether this error signals runaway recursion
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, Self::ResolutionDepthExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_display() {
        let err = LayoutError::unresolvable("image_aspect", "logo", "not an image");
        assert!(err.to_string().contains("image_aspect"));
        assert!(err.to_string().contains("logo"));
    }

    #[test]
    fn test_unsupported_axis_display() {
        let err = LayoutError::unsupported_axis("center", Axis::Width);
        assert_eq!(err.to_string(), "center cannot be used for the width axis");
    }

    #[test]
    fn test_circular_constraint_display() {
        let err = LayoutError::circular(vec![
            "a.width".to_string(),
            "b.width".to_string(),
            "a.width".to_string(),
        ]);
        assert!(err.to_string().contains("a.width -> b.width -> a.width"));
    }
}
