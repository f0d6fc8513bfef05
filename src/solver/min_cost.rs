//! Closed-form round solver.
//!
//! Without capacity constraints the round formulation separates per task:
//! the optimum places every task on its cheapest reachable resource. This
//! solver computes that directly in O(|costs|).

use std::collections::{HashMap, HashSet};

use super::{ensure_reachable, offered_costs, AssignmentSolver, RoundSolution};
use crate::error::AllocationResult;
use crate::models::{CostEntry, CostTable, Placement};

/// Picks the cheapest reachable resource per task.
///
/// Ties go to the entry inserted first into the cost table, matching
/// [`IlpAssignmentSolver`](super::IlpAssignmentSolver).
#[derive(Debug, Clone, Copy, Default)]
pub struct MinCostSolver;

impl MinCostSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl AssignmentSolver for MinCostSolver {
    fn name(&self) -> &'static str {
        "min-cost"
    }

    fn solve(
        &self,
        tasks: &[&str],
        resources: &[&str],
        costs: &CostTable,
    ) -> AllocationResult<RoundSolution> {
        let offered = offered_costs(tasks, resources, costs);
        ensure_reachable(tasks, &offered)?;

        let mut cheapest: HashMap<&str, &CostEntry> = HashMap::new();
        for e in offered.iter() {
            cheapest
                .entry(e.task_id.as_str())
                .and_modify(|best| {
                    if e.cost < best.cost {
                        *best = e;
                    }
                })
                .or_insert(e);
        }

        let mut placed = HashSet::new();
        let placements = tasks
            .iter()
            .filter(|t| placed.insert(**t))
            .filter_map(|t| cheapest.get(t))
            .map(|e| Placement {
                task_id: e.task_id.clone(),
                resource_id: e.resource_id.clone(),
                cost: e.cost,
            })
            .collect();

        Ok(RoundSolution::from_placements(placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationError;
    use crate::solver::IlpAssignmentSolver;

    fn costs() -> CostTable {
        CostTable::new()
            .with_cost("T1", "Edge_1", 6)
            .with_cost("T1", "Cloud_1", 6)
            .with_cost("T2", "Edge_1", 9)
            .with_cost("T2", "Cloud_1", 3)
    }

    #[test]
    fn test_cheapest_with_tie_break() {
        let sol = MinCostSolver::new()
            .solve(&["T1", "T2"], &["Edge_1", "Cloud_1"], &costs())
            .unwrap();
        assert_eq!(sol.total_cost, 9);
        assert_eq!(sol.placements[0].resource_id, "Edge_1");
        assert_eq!(sol.placements[1].resource_id, "Cloud_1");
    }

    #[test]
    fn test_matches_ilp() {
        let tasks = ["T2", "T1"];
        let resources = ["Cloud_1", "Edge_1"];
        let a = MinCostSolver::new().solve(&tasks, &resources, &costs()).unwrap();
        let b = IlpAssignmentSolver::new()
            .solve(&tasks, &resources, &costs())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unreachable() {
        let err = MinCostSolver::new()
            .solve(&["T1"], &["Cloud_2"], &costs())
            .unwrap_err();
        assert_eq!(err, AllocationError::Infeasible { task: "T1".into() });
    }
}
