//! Allocation quality metrics (KPIs).
//!
//! Computes summary indicators from a finished allocation outcome, without
//! re-running any solver.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Cost | Sum of committed placement costs |
//! | Allocation Rate | Allocated tasks / all tasks |
//! | Avg Cost | Total cost / allocated tasks |
//! | Utilization | Slots used / initial capacity, per resource |
//! | Edge Share | Fraction of placements on edge resources |
//! | Deferrals | Placements pushed to a later round by capacity |

use std::collections::HashMap;

use crate::models::{AllocationOutcome, Resource, ResourceClass};

/// Allocation performance indicators.
#[derive(Debug, Clone)]
pub struct AllocationKpi {
    /// Sum of committed costs.
    pub total_cost: u64,
    /// Number of allocated tasks.
    pub allocated: usize,
    /// Number of unallocated tasks.
    pub unallocated: usize,
    /// Fraction of tasks allocated (0.0..1.0).
    pub allocation_rate: f64,
    /// Mean cost per allocated task.
    pub avg_cost: f64,
    /// Number of rounds run.
    pub rounds: usize,
    /// Number of placements deferred across all rounds.
    pub deferrals: usize,
    /// Per-resource utilization (used / initial capacity).
    pub utilization_by_resource: HashMap<String, f64>,
    /// Mean utilization over resources with non-zero capacity.
    pub avg_utilization: f64,
    /// Fraction of placements on edge resources (0.0..1.0).
    pub edge_share: f64,
}

impl AllocationKpi {
    /// Computes KPIs from an outcome and the resources it ran on.
    ///
    /// # Arguments
    /// * `outcome` - The finished allocation.
    /// * `resources` - Resource descriptions (for the edge/cloud split).
    pub fn calculate(outcome: &AllocationOutcome, resources: &[Resource]) -> Self {
        let allocated = outcome.allocation_count();
        let unallocated = outcome.unallocated.len();
        let total_cost = outcome.total_cost();

        let mut used: HashMap<&str, u32> = HashMap::new();
        for e in &outcome.sequence {
            *used.entry(e.resource_id.as_str()).or_insert(0) += 1;
        }

        let utilization_by_resource: HashMap<String, f64> = outcome
            .initial_capacities
            .iter()
            .filter(|(_, &cap)| cap > 0)
            .map(|(id, &cap)| {
                let n = used.get(id.as_str()).copied().unwrap_or(0);
                (id.clone(), f64::from(n) / f64::from(cap))
            })
            .collect();
        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            utilization_by_resource.values().sum::<f64>() / utilization_by_resource.len() as f64
        };

        let class_of: HashMap<&str, ResourceClass> =
            resources.iter().map(|r| (r.id.as_str(), r.class)).collect();
        let on_edge = outcome
            .sequence
            .iter()
            .filter(|e| class_of.get(e.resource_id.as_str()) == Some(&ResourceClass::Edge))
            .count();

        let total_tasks = allocated + unallocated;
        Self {
            total_cost,
            allocated,
            unallocated,
            allocation_rate: if total_tasks == 0 {
                1.0
            } else {
                allocated as f64 / total_tasks as f64
            },
            avg_cost: if allocated == 0 {
                0.0
            } else {
                total_cost as f64 / allocated as f64
            },
            rounds: outcome.round_count(),
            deferrals: outcome.rounds.iter().map(|r| r.deferred.len()).sum(),
            utilization_by_resource,
            avg_utilization,
            edge_share: if allocated == 0 {
                0.0
            } else {
                on_edge as f64 / allocated as f64
            },
        }
    }

    /// Whether the outcome meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_avg_cost: f64, min_allocation_rate: f64) -> bool {
        self.avg_cost <= max_avg_cost && self.allocation_rate >= min_allocation_rate
    }
}
