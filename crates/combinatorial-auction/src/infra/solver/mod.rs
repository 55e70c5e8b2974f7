//! Boundary to the external integer program solver.

use crate::domain::program::Program;

mod microlp;

pub use microlp::Microlp;

/// Solves integer programs.
///
/// Implementations block the calling thread until the solver finished, so
/// callers on an async runtime are expected to run them on a blocking task.
#[cfg_attr(test, mockall::automock)]
pub trait Solver: Send + Sync + 'static {
    fn solve(&self, program: &Program) -> Result<Solution, Failure>;
}

/// A variable assignment returned by a [`Solver`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    /// Values indexed by variable. Solvers may return values that are only
    /// close to 0 or 1 for binary variables.
    pub values: Vec<f64>,
    /// The objective value the solver reports for `values`.
    pub objective: f64,
}

impl Solution {
    pub fn value(&self, variable: crate::domain::program::VariableId) -> f64 {
        self.values.get(variable.0).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Failure {
    /// The program has no feasible assignment. Winner determination programs
    /// always admit the empty allocation, so this indicates a defect.
    #[error("program is infeasible")]
    Infeasible,
    #[error("solver timed out")]
    Timeout,
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl Failure {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Failure::Infeasible => "infeasible",
            Failure::Timeout => "timeout",
            Failure::Numerical(_) => "numerical",
        }
    }
}
