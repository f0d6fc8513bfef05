//! Single-round assignment solvers.
//!
//! A round solver takes a set of tasks, a set of resources and a cost
//! table and returns a minimum-cost assignment in which every task is
//! placed on exactly one reachable resource.
//!
//! # Formulation
//!
//! ```text
//! minimize    Σ_{(t,r) ∈ C} cost(t,r) · x_{t,r}
//! subject to  Σ_{r : (t,r) ∈ C} x_{t,r} = 1     for every task t
//!             x_{t,r} ∈ {0, 1}
//! ```
//!
//! Resource capacity is not part of the formulation. Callers enforce it by
//! restricting which resources (and therefore which cost entries) they
//! offer to a round.
//!
//! # Usage
//!
//! ```
//! use u_assign::models::CostTable;
//! use u_assign::solver::{AssignmentSolver, IlpAssignmentSolver};
//!
//! let costs = CostTable::new()
//!     .with_cost("Task_1", "Edge_1", 4)
//!     .with_cost("Task_1", "Cloud_1", 2);
//!
//! let solver = IlpAssignmentSolver::new();
//! let solution = solver.solve(&["Task_1"], &["Edge_1", "Cloud_1"], &costs).unwrap();
//! assert_eq!(solution.total_cost, 2);
//! assert_eq!(solution.placements[0].resource_id, "Cloud_1");
//! ```

mod ilp;
mod min_cost;

pub use ilp::{AssignmentProgram, AssignmentProgramBuilder, IlpAssignmentSolver};
pub use min_cost::MinCostSolver;

use std::collections::HashSet;
use std::fmt::Debug;

use crate::error::{AllocationError, AllocationResult};
use crate::models::{CostTable, Placement};

/// Optimal assignment for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSolution {
    /// One placement per input task, in input task order.
    pub placements: Vec<Placement>,
    /// Sum of placement costs.
    pub total_cost: u64,
}

impl RoundSolution {
    /// Builds a solution from placements, summing their costs.
    pub fn from_placements(placements: Vec<Placement>) -> Self {
        let total_cost = placements.iter().map(|p| u64::from(p.cost)).sum();
        Self {
            placements,
            total_cost,
        }
    }
}

/// A stateless solver for the single-round assignment problem.
///
/// # Contract
/// - Every input task appears in exactly one placement, and every
///   placement's (task, resource) pair exists in `costs`.
/// - A task with no entry in `costs` among `resources` yields
///   [`AllocationError::Infeasible`], never a partial result.
/// - The same inputs always produce the same solution.
pub trait AssignmentSolver: Send + Sync + Debug {
    /// Solver name (for logs and error reports).
    fn name(&self) -> &'static str;

    /// Solves one round.
    fn solve(
        &self,
        tasks: &[&str],
        resources: &[&str],
        costs: &CostTable,
    ) -> AllocationResult<RoundSolution>;
}

/// Cost entries usable in a round: the task and the resource are both
/// offered. Preserves cost table order.
pub(crate) fn offered_costs(tasks: &[&str], resources: &[&str], costs: &CostTable) -> CostTable {
    let tasks: HashSet<&str> = tasks.iter().copied().collect();
    let resources: HashSet<&str> = resources.iter().copied().collect();
    costs.restrict(|t, r| tasks.contains(t) && resources.contains(r))
}

/// Fails with `Infeasible` for the first task without any offered entry.
pub(crate) fn ensure_reachable(tasks: &[&str], offered: &CostTable) -> AllocationResult<()> {
    let reachable: HashSet<&str> = offered.iter().map(|e| e.task_id.as_str()).collect();
    match tasks.iter().find(|t| !reachable.contains(**t)) {
        Some(task) => Err(AllocationError::Infeasible {
            task: task.to_string(),
        }),
        None => Ok(()),
    }
}
