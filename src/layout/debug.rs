//! Debugger hook for constraint resolution
//!
//! A [`ConstraintDebugger`] installed with [`UiTree::with_debugger`] sees every scalar
//! resolution before the cache path does, nested operands included.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;

use crate::tree::{ComponentId, UiTree};

use super::constraint::Constraint;
use super::error::LayoutError;
use super::types::Axis;

/// Intercepts the evaluation of a single constraint
pub trait ConstraintDebugger {
    fn evaluate(
        &self,
        tree: &UiTree,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError>;
}

/// Plain cache path; useful to restore normal behavior inside a debug scope
#[derive(Debug, Default)]
pub struct NoopDebugger;

impl ConstraintDebugger for NoopDebugger {
    fn evaluate(
        &self,
        tree: &UiTree,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        tree.resolve_cached(constraint, id, axis)
    }
}

/// Recomputes every constraint, ignoring cached values
#[derive(Debug, Default)]
pub struct RecalculatingDebugger;

impl ConstraintDebugger for RecalculatingDebugger {
    fn evaluate(
        &self,
        tree: &UiTree,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        let value = tree.compute_fresh(constraint, id, axis)?;
        constraint.cache().store(value);
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Evaluation {
    constraint: usize,
    component: ComponentId,
    axis: Axis,
    label: String,
}

/// Detects re-entrant evaluation and substitutes 0 instead of recursing
///
/// Each detected cycle is recorded as a list of `name.axis` labels that starts and ends on the
/// same slot.
#[derive(Debug, Default)]
pub struct CycleSafeDebugger {
    stack: RefCell<Vec<Evaluation>>,
    cycles: RefCell<Vec<Vec<String>>>,
}

impl CycleSafeDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.cycles.borrow().clone()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.borrow().is_empty()
    }
}

impl ConstraintDebugger for CycleSafeDebugger {
    fn evaluate(
        &self,
        tree: &UiTree,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        let frame = Evaluation {
            constraint: constraint as *const Constraint as usize,
            component: id,
            axis,
            label: format!("{}.{}", tree.display_name(id), axis),
        };

        let repeated = {
            let stack = self.stack.borrow();
            stack.iter().position(|f| {
                f.constraint == frame.constraint && f.component == id && f.axis == axis
            })
            .map(|start| {
                let mut cycle: Vec<String> = stack[start..].iter().map(|f| f.label.clone()).collect();
                cycle.push(frame.label.clone());
                cycle
            })
        };
        if let Some(cycle) = repeated {
            self.cycles.borrow_mut().push(cycle);
            return Ok(0.0);
        }

        self.stack.borrow_mut().push(frame);
        let result = tree.compute_fresh(constraint, id, axis);
        self.stack.borrow_mut().pop();
        let value = result?;
        constraint.cache().store(value);
        Ok(value)
    }
}

/// One line of a [`RecordingDebugger`] trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub depth: usize,
    pub component: String,
    pub axis: Axis,
    pub constraint: &'static str,
    pub value: Option<f64>,
}

/// Records every evaluation as an indented trace
#[derive(Debug, Default)]
pub struct RecordingDebugger {
    depth: Cell<usize>,
    entries: RefCell<Vec<TraceEntry>>,
}

impl RecordingDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.borrow().clone()
    }

    /// Render the trace, one evaluation per line, nested evaluations indented
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.borrow().iter() {
            let value = match entry.value {
                Some(value) => format!("{}", value),
                None => "error".to_string(),
            };
            let _ = writeln!(
                out,
                "{}{}.{} = {} -> {}",
                "  ".repeat(entry.depth),
                entry.component,
                entry.axis,
                entry.constraint,
                value
            );
        }
        out
    }
}

impl ConstraintDebugger for RecordingDebugger {
    fn evaluate(
        &self,
        tree: &UiTree,
        constraint: &Constraint,
        id: ComponentId,
        axis: Axis,
    ) -> Result<f64, LayoutError> {
        let index = {
            let mut entries = self.entries.borrow_mut();
            entries.push(TraceEntry {
                depth: self.depth.get(),
                component: tree.display_name(id),
                axis,
                constraint: constraint.name(),
                value: None,
            });
            entries.len() - 1
        };
        self.depth.set(self.depth.get() + 1);
        let result = tree.compute_fresh(constraint, id, axis);
        self.depth.set(self.depth.get().saturating_sub(1));
        let value = result?;
        constraint.cache().store(value);
        if let Some(entry) = self.entries.borrow_mut().get_mut(index) {
            entry.value = Some(value);
        }
        Ok(value)
    }
}
