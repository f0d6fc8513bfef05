//! Allocation (solution) model.
//!
//! An allocation outcome is the ordered record of committed task placements
//! produced by the iterative scheduler, together with per-round reports and
//! the tasks that could not be placed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A task-resource pair chosen by a solver, with its cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Task ID.
    pub task_id: String,
    /// Resource ID.
    pub resource_id: String,
    /// Cost from the cost table.
    pub cost: u32,
}

/// A committed placement in the allocation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Task ID.
    pub task_id: String,
    /// Resource ID.
    pub resource_id: String,
    /// Cost from the cost table.
    pub cost: u32,
    /// Round in which the placement was committed (1-based).
    pub round: usize,
    /// Remaining capacity of the resource right after this commit.
    pub remaining_capacity: u32,
}

/// What happened in one round of the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Round number (1-based).
    pub round: usize,
    /// Total cost the solver reported for the round's assignment.
    pub solution_cost: u64,
    /// Placements committed this round, in commit order.
    pub committed: Vec<Placement>,
    /// Placements whose resource filled up within the round.
    /// Their tasks were carried over to the next round.
    pub deferred: Vec<Placement>,
    /// Tasks left out of the round because no available resource reaches them.
    pub skipped: Vec<String>,
}

/// Whether every task was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    /// All tasks were allocated.
    Complete,
    /// Some tasks are unallocated under the given capacity and connectivity.
    Partial,
}

/// Result of an iterative allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Committed placements in commit order.
    pub sequence: Vec<AllocationEntry>,
    /// Per-round reports.
    pub rounds: Vec<RoundReport>,
    /// Tasks that were not placed, in input order.
    pub unallocated: Vec<String>,
    /// Remaining capacity per resource when the run started.
    pub initial_capacities: BTreeMap<String, u32>,
    /// Remaining capacity per resource when the run ended.
    pub final_capacities: BTreeMap<String, u32>,
}

impl RoundReport {
    /// Sum of committed placement costs.
    pub fn committed_cost(&self) -> u64 {
        self.committed.iter().map(|p| u64::from(p.cost)).sum()
    }

    /// Sum of deferred placement costs.
    pub fn deferred_cost(&self) -> u64 {
        self.deferred.iter().map(|p| u64::from(p.cost)).sum()
    }
}

impl AllocationOutcome {
    /// Whether all tasks were placed.
    pub fn status(&self) -> AllocationStatus {
        if self.unallocated.is_empty() {
            AllocationStatus::Complete
        } else {
            AllocationStatus::Partial
        }
    }

    /// Whether all tasks were placed.
    pub fn is_complete(&self) -> bool {
        self.status() == AllocationStatus::Complete
    }

    /// Total cost of all committed placements.
    pub fn total_cost(&self) -> u64 {
        self.sequence.iter().map(|e| u64::from(e.cost)).sum()
    }

    /// Running total of cost after each entry of the sequence.
    pub fn cumulative_costs(&self) -> Vec<u64> {
        self.sequence
            .iter()
            .scan(0u64, |acc, e| {
                *acc += u64::from(e.cost);
                Some(*acc)
            })
            .collect()
    }

    /// Finds the entry for a task.
    pub fn entry_for_task(&self, task_id: &str) -> Option<&AllocationEntry> {
        self.sequence.iter().find(|e| e.task_id == task_id)
    }

    /// Returns all entries for a resource, in commit order.
    pub fn entries_for_resource(&self, resource_id: &str) -> Vec<&AllocationEntry> {
        self.sequence
            .iter()
            .filter(|e| e.resource_id == resource_id)
            .collect()
    }

    /// Number of committed placements.
    pub fn allocation_count(&self) -> usize {
        self.sequence.len()
    }

    /// Number of rounds that committed placements.
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}
