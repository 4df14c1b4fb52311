//! Constraint layout engine
//!
//! Every visual property of a component is produced lazily by the constraint installed in the
//! matching slot. Reads resolve through per-constraint caches that the frame driver invalidates
//! once per tick; dependencies between slots can be inspected statically through the visitor and
//! dependency graph without evaluating anything.

pub mod animation;
pub mod cache;
pub mod color;
mod compute;
pub mod config;
pub mod constraint;
pub mod debug;
pub mod error;
pub mod graph;
mod resolve;
pub mod slot;
pub mod types;
pub mod visitor;

pub use animation::{AnimationSpec, ColorAnimation, Easing, ScalarAnimation, Timeline};
pub use cache::ConstraintCache;
pub use color::{ColorConstraint, ColorKind, Rainbow};
pub use config::LayoutConfig;
pub use constraint::{Constraint, ConstraintKind, RoundingMode};
pub use debug::{
    ConstraintDebugger, CycleSafeDebugger, NoopDebugger, RecalculatingDebugger, RecordingDebugger,
    TraceEntry,
};
pub use error::LayoutError;
pub use graph::{DependencyGraph, ResolutionStepper, ResolvedValue, ResolverNode};
pub use slot::{ColorSlot, ConstraintSet, ScalarSlot};
pub use types::*;
pub use visitor::{ConstraintVisitor, DependencyEdge, EdgeCollector};
