//! Iterative capacity-constrained allocation.
//!
//! # Algorithm
//!
//! While tasks remain:
//! 1. Offer the resources that still have capacity.
//! 2. Restrict the cost table to remaining tasks × offered resources.
//!    If nothing is left, stop: the remaining tasks are unallocated.
//! 3. Solve the round's assignment problem.
//! 4. Commit the solution in task order, at most as many placements per
//!    resource as it has free slots. Tasks whose resource filled up are
//!    deferred to the next round and re-optimized there.
//!
//! Every round with a non-empty offer commits at least one task (the first
//! placement always fits), so a run takes at most one round per task.
//!
//! # Optimality
//! Each round is solved to optimality, but the sequence of rounds is a
//! greedy approximation: it can cost more than a single global assignment
//! that respects all capacities at once. That is the price of producing a
//! placement order that drains capacity one slot at a time.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::CapacityLedger;
use crate::error::{AllocationError, AllocationResult};
use crate::models::{
    AllocationEntry, AllocationOutcome, CostTable, Placement, Resource, RoundReport, Task,
};
use crate::solver::{AssignmentSolver, IlpAssignmentSolver, RoundSolution};
use crate::validation::validate_instance;

/// What to do when some remaining tasks have no reachable resource with
/// free capacity while others do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfeasibilityPolicy {
    /// Leave unreachable tasks out of the round and keep going. Capacity
    /// only drains during a run, so they end up unallocated.
    #[default]
    SkipUnreachable,
    /// Offer every remaining task to the solver and fail the run with
    /// `Infeasible` if any of them cannot be placed.
    Abort,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Handling of partially infeasible rounds.
    pub infeasibility: InfeasibilityPolicy,
    /// Stop after this many rounds. `None` = until no progress is possible.
    pub max_rounds: Option<usize>,
}

impl SchedulerConfig {
    /// Sets the infeasibility policy.
    pub fn with_infeasibility(mut self, policy: InfeasibilityPolicy) -> Self {
        self.infeasibility = policy;
        self
    }

    /// Sets the round ceiling.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// Round-based allocator driving a pluggable [`AssignmentSolver`].
///
/// # Example
///
/// ```
/// use u_assign::models::{CostTable, Resource, Task};
/// use u_assign::scheduler::{CapacityLedger, IterativeScheduler};
///
/// let tasks = vec![Task::new("Task_1"), Task::new("Task_2")];
/// let resources = vec![Resource::edge("Edge_1").with_capacity(1)];
/// let costs = CostTable::new()
///     .with_cost("Task_1", "Edge_1", 3)
///     .with_cost("Task_2", "Edge_1", 4);
/// let mut capacities = CapacityLedger::from_resources(&resources).unwrap();
///
/// let outcome = IterativeScheduler::new()
///     .run(&tasks, &resources, &costs, &mut capacities)
///     .unwrap();
/// assert_eq!(outcome.allocation_count(), 1);
/// assert_eq!(outcome.unallocated, vec!["Task_2".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IterativeScheduler<S = IlpAssignmentSolver> {
    solver: S,
    config: SchedulerConfig,
}

impl IterativeScheduler<IlpAssignmentSolver> {
    /// Creates a scheduler with the ILP round solver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: AssignmentSolver> IterativeScheduler<S> {
    /// Creates a scheduler with a custom round solver.
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            config: SchedulerConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Round solver in use.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Allocates tasks round by round, draining `capacities`.
    ///
    /// An empty task or resource list returns an empty outcome without
    /// invoking the solver. The ledger keeps the drained capacities after
    /// the run.
    ///
    /// # Errors
    /// - `InvalidCapacity` if a resource is not tracked by `capacities`.
    /// - `Infeasible` under [`InfeasibilityPolicy::Abort`].
    /// - `SolverFailure` / `InvalidSolution` from the round solver.
    ///
    /// A failing round leaves the ledger as committed by earlier rounds.
    pub fn run(
        &self,
        tasks: &[Task],
        resources: &[Resource],
        costs: &CostTable,
        capacities: &mut CapacityLedger,
    ) -> AllocationResult<AllocationOutcome> {
        let mut outcome = AllocationOutcome {
            initial_capacities: capacities.snapshot(),
            ..Default::default()
        };

        if tasks.is_empty() || resources.is_empty() {
            debug!(
                tasks = tasks.len(),
                resources = resources.len(),
                "empty instance, nothing to allocate"
            );
            outcome.unallocated = tasks.iter().map(|t| t.id.clone()).collect();
            outcome.final_capacities = capacities.snapshot();
            return Ok(outcome);
        }

        capacities.ensure_covers(resources)?;

        let resource_ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
        let mut remaining: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        while !remaining.is_empty() {
            if self
                .config
                .max_rounds
                .is_some_and(|max| outcome.rounds.len() >= max)
            {
                warn!(
                    rounds = outcome.rounds.len(),
                    remaining = remaining.len(),
                    "round ceiling reached"
                );
                break;
            }
            let round = outcome.rounds.len() + 1;

            let available: HashSet<&str> = resource_ids
                .iter()
                .copied()
                .filter(|id| capacities.has_capacity(id))
                .collect();
            let pending: HashSet<&str> = remaining.iter().copied().collect();
            let round_costs =
                costs.restrict(|t, r| pending.contains(t) && available.contains(r));

            if round_costs.is_empty() {
                debug!(
                    round,
                    remaining = remaining.len(),
                    "no reachable resource with free capacity"
                );
                break;
            }

            let (round_tasks, skipped): (Vec<&str>, Vec<&str>) = match self.config.infeasibility {
                InfeasibilityPolicy::Abort => (remaining.clone(), Vec::new()),
                InfeasibilityPolicy::SkipUnreachable => remaining
                    .iter()
                    .copied()
                    .partition(|t| round_costs.has_task(t)),
            };
            if !skipped.is_empty() {
                debug!(round, skipped = skipped.len(), "unreachable tasks left out of round");
            }

            let solution = self.solver.solve(&round_tasks, &resource_ids, &round_costs)?;
            self.check_solution(&round_tasks, &round_costs, &solution)?;

            // Plan the whole batch against this round's free slots first.
            let mut free: HashMap<&str, u32> = available
                .iter()
                .map(|&id| (id, capacities.remaining(id).unwrap_or(0)))
                .collect();
            let (committed, deferred): (Vec<Placement>, Vec<Placement>) =
                solution.placements.into_iter().partition(|p| {
                    match free.get_mut(p.resource_id.as_str()) {
                        Some(slots) if *slots > 0 => {
                            *slots -= 1;
                            true
                        }
                        _ => false,
                    }
                });

            let batch: Vec<&str> = committed.iter().map(|p| p.resource_id.as_str()).collect();
            let left = capacities.consume_batch(&batch)?;

            for (p, remaining_capacity) in committed.iter().zip(left) {
                outcome.sequence.push(AllocationEntry {
                    task_id: p.task_id.clone(),
                    resource_id: p.resource_id.clone(),
                    cost: p.cost,
                    round,
                    remaining_capacity,
                });
            }
            let placed: HashSet<&str> = committed.iter().map(|p| p.task_id.as_str()).collect();
            remaining.retain(|t| !placed.contains(t));

            debug!(
                round,
                committed = committed.len(),
                deferred = deferred.len(),
                solution_cost = solution.total_cost,
                "round committed"
            );

            outcome.rounds.push(RoundReport {
                round,
                solution_cost: solution.total_cost,
                committed,
                deferred,
                skipped: skipped.into_iter().map(String::from).collect(),
            });
        }

        outcome.unallocated = remaining.into_iter().map(String::from).collect();
        outcome.final_capacities = capacities.snapshot();

        if outcome.unallocated.is_empty() {
            info!(
                solver = self.solver.name(),
                rounds = outcome.rounds.len(),
                allocated = outcome.sequence.len(),
                total_cost = outcome.total_cost(),
                "allocation complete"
            );
        } else {
            warn!(
                solver = self.solver.name(),
                rounds = outcome.rounds.len(),
                allocated = outcome.sequence.len(),
                unallocated = outcome.unallocated.len(),
                "allocation partial"
            );
        }

        Ok(outcome)
    }

    /// Like [`run`](Self::run), but rejects empty and malformed instances.
    ///
    /// # Errors
    /// - `EmptyInstance` if there are no tasks or no resources.
    /// - `Validation` with every structural problem found.
    pub fn run_checked(
        &self,
        tasks: &[Task],
        resources: &[Resource],
        costs: &CostTable,
        capacities: &mut CapacityLedger,
    ) -> AllocationResult<AllocationOutcome> {
        if tasks.is_empty() || resources.is_empty() {
            return Err(AllocationError::EmptyInstance {
                tasks: tasks.len(),
                resources: resources.len(),
            });
        }
        validate_instance(tasks, resources, costs)?;
        self.run(tasks, resources, costs, capacities)
    }

    /// Rejects solutions that break the solver contract, so a misbehaving
    /// solver cannot corrupt the ledger or stall the loop.
    fn check_solution(
        &self,
        round_tasks: &[&str],
        round_costs: &CostTable,
        solution: &RoundSolution,
    ) -> AllocationResult<()> {
        let invalid = |reason: String| AllocationError::InvalidSolution {
            solver: self.solver.name(),
            reason,
        };

        if solution.placements.is_empty() && !round_tasks.is_empty() {
            return Err(invalid("no placements".into()));
        }

        let offered: HashSet<&str> = round_tasks.iter().copied().collect();
        if solution.placements.len() != offered.len() {
            return Err(invalid(format!(
                "{} placements for {} offered tasks",
                solution.placements.len(),
                offered.len()
            )));
        }
        let mut seen = HashSet::new();
        for p in &solution.placements {
            if !offered.contains(p.task_id.as_str()) {
                return Err(invalid(format!("task '{}' was not offered", p.task_id)));
            }
            if !seen.insert(p.task_id.as_str()) {
                return Err(invalid(format!("task '{}' placed twice", p.task_id)));
            }
            if round_costs.get(&p.task_id, &p.resource_id) != Some(p.cost) {
                return Err(invalid(format!(
                    "pair ({}, {}) with cost {} is not offered",
                    p.task_id, p.resource_id, p.cost
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate, InstanceConfig};
    use crate::solver::MinCostSolver;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn tasks(ids: &[&str]) -> Vec<Task> {
        ids.iter().map(|id| Task::new(*id)).collect()
    }

    fn ledger(resources: &[Resource]) -> CapacityLedger {
        CapacityLedger::from_resources(resources).unwrap()
    }

    fn pairs(outcome: &AllocationOutcome) -> Vec<(&str, &str)> {
        outcome
            .sequence
            .iter()
            .map(|e| (e.task_id.as_str(), e.resource_id.as_str()))
            .collect()
    }

    /// T1 and T2 only reach R1 (capacity 1). T3 prefers R1 but can fall
    /// back to R2.
    fn contended() -> (Vec<Task>, Vec<Resource>, CostTable) {
        let resources = vec![
            Resource::edge("R1").with_capacity(1),
            Resource::cloud("R2").with_capacity(1),
        ];
        let costs = CostTable::new()
            .with_cost("T1", "R1", 2)
            .with_cost("T2", "R1", 3)
            .with_cost("T3", "R1", 1)
            .with_cost("T3", "R2", 5);
        (tasks(&["T1", "T2", "T3"]), resources, costs)
    }

    #[test]
    fn test_single_task() {
        let resources = vec![Resource::edge("R1").with_capacity(1)];
        let costs = CostTable::new().with_cost("T1", "R1", 3);
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .run(&tasks(&["T1"]), &resources, &costs, &mut caps)
            .unwrap();

        assert_eq!(pairs(&outcome), vec![("T1", "R1")]);
        assert_eq!(outcome.total_cost(), 3);
        assert!(outcome.is_complete());
        assert_eq!(outcome.sequence[0].remaining_capacity, 0);
        assert_eq!(caps.remaining("R1"), Some(0));
    }

    #[test]
    fn test_capacity_exhaustion_is_partial() {
        let resources = vec![Resource::edge("R1").with_capacity(1)];
        let costs = CostTable::new()
            .with_cost("T1", "R1", 4)
            .with_cost("T2", "R1", 4);
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .run(&tasks(&["T1", "T2"]), &resources, &costs, &mut caps)
            .unwrap();

        assert_eq!(outcome.allocation_count(), 1);
        assert_eq!(outcome.unallocated.len(), 1);
        assert_eq!(outcome.status(), crate::models::AllocationStatus::Partial);
        // The second task was deferred in round 1, then nothing was left.
        assert_eq!(outcome.round_count(), 1);
        assert_eq!(outcome.rounds[0].deferred.len(), 1);
    }

    #[test]
    fn test_three_tasks_two_resources() {
        let resources = vec![
            Resource::edge("R1").with_capacity(2),
            Resource::cloud("R2").with_capacity(2),
        ];
        let costs = CostTable::new()
            .with_cost("T1", "R1", 1)
            .with_cost("T1", "R2", 4)
            .with_cost("T2", "R1", 2)
            .with_cost("T2", "R2", 5)
            .with_cost("T3", "R1", 3)
            .with_cost("T3", "R2", 6);
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .run(&tasks(&["T1", "T2", "T3"]), &resources, &costs, &mut caps)
            .unwrap();

        assert_eq!(
            pairs(&outcome),
            vec![("T1", "R1"), ("T2", "R1"), ("T3", "R2")]
        );
        assert!(outcome.entries_for_resource("R1").len() <= 2);
        assert!(outcome.entries_for_resource("R2").len() <= 2);
        assert_eq!(outcome.round_count(), 2);
        assert_eq!(outcome.rounds[0].solution_cost, 1 + 2 + 3);
        assert_eq!(outcome.rounds[0].committed_cost(), 3);
        assert_eq!(outcome.rounds[1].solution_cost, 6);
        assert_eq!(outcome.total_cost(), 9);
        assert_eq!(outcome.sequence[2].round, 2);
    }

    #[test]
    fn test_solver_reports_unreachable_task() {
        let costs = CostTable::new().with_cost("T1", "R1", 1);
        let err = IlpAssignmentSolver::new()
            .solve(&["T1", "T2"], &["R1"], &costs)
            .unwrap_err();
        assert_eq!(err, AllocationError::Infeasible { task: "T2".into() });
    }

    #[test]
    fn test_unconnected_task_skipped_by_default() {
        let resources = vec![Resource::edge("R1")];
        let costs = CostTable::new().with_cost("T1", "R1", 1);
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .run(&tasks(&["T1", "T2"]), &resources, &costs, &mut caps)
            .unwrap();

        assert_eq!(pairs(&outcome), vec![("T1", "R1")]);
        assert_eq!(outcome.unallocated, vec!["T2".to_string()]);
        assert_eq!(outcome.rounds[0].skipped, vec!["T2".to_string()]);
    }

    #[test]
    fn test_unconnected_task_aborts_run() {
        let resources = vec![Resource::edge("R1")];
        let costs = CostTable::new().with_cost("T1", "R1", 1);
        let mut caps = ledger(&resources);

        let scheduler = IterativeScheduler::new()
            .with_config(SchedulerConfig::default().with_infeasibility(InfeasibilityPolicy::Abort));
        let err = scheduler
            .run(&tasks(&["T1", "T2"]), &resources, &costs, &mut caps)
            .unwrap_err();

        assert_eq!(err, AllocationError::Infeasible { task: "T2".into() });
        assert_eq!(caps.remaining("R1"), Some(5));
    }

    #[test]
    fn test_skip_policy_continues_after_stranding() {
        let (tasks, resources, costs) = contended();
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .run(&tasks, &resources, &costs, &mut caps)
            .unwrap();

        // Round 1 commits T1 (first in order); T2 and T3 are deferred.
        // Round 2: R1 is full, T2 is skipped and T3 falls back to R2.
        assert_eq!(pairs(&outcome), vec![("T1", "R1"), ("T3", "R2")]);
        assert_eq!(outcome.unallocated, vec!["T2".to_string()]);
        assert_eq!(outcome.rounds[0].deferred.len(), 2);
        assert_eq!(outcome.rounds[1].skipped, vec!["T2".to_string()]);
        assert_eq!(caps.free_slots(), 0);
    }

    #[test]
    fn test_abort_keeps_earlier_rounds() {
        let (tasks, resources, costs) = contended();
        let mut caps = ledger(&resources);

        let scheduler = IterativeScheduler::new()
            .with_config(SchedulerConfig::default().with_infeasibility(InfeasibilityPolicy::Abort));
        let err = scheduler
            .run(&tasks, &resources, &costs, &mut caps)
            .unwrap_err();

        assert_eq!(err, AllocationError::Infeasible { task: "T2".into() });
        // Round 1 was committed; the failing round 2 applied nothing.
        assert_eq!(caps.remaining("R1"), Some(0));
        assert_eq!(caps.remaining("R2"), Some(1));
    }

    #[test]
    fn test_max_rounds() {
        let (tasks, resources, costs) = contended();
        let mut caps = ledger(&resources);

        let outcome = IterativeScheduler::new()
            .with_config(SchedulerConfig::default().with_max_rounds(1))
            .run(&tasks, &resources, &costs, &mut caps)
            .unwrap();

        assert_eq!(outcome.round_count(), 1);
        assert_eq!(outcome.unallocated, vec!["T2".to_string(), "T3".to_string()]);
    }

    #[test]
    fn test_empty_instance() {
        let resources = vec![Resource::edge("R1")];
        let mut caps = ledger(&resources);
        let scheduler = IterativeScheduler::new();

        let outcome = scheduler
            .run(&[], &resources, &CostTable::new(), &mut caps)
            .unwrap();
        assert!(outcome.sequence.is_empty());
        assert!(outcome.is_complete());

        let outcome = scheduler
            .run(&tasks(&["T1"]), &[], &CostTable::new(), &mut caps)
            .unwrap();
        assert!(outcome.sequence.is_empty());
        assert_eq!(outcome.unallocated, vec!["T1".to_string()]);

        let err = scheduler
            .run_checked(&[], &resources, &CostTable::new(), &mut caps)
            .unwrap_err();
        assert_eq!(err, AllocationError::EmptyInstance { tasks: 0, resources: 1 });
    }

    #[test]
    fn test_missing_capacity_rejected() {
        let resources = vec![Resource::edge("R1"), Resource::cloud("R2")];
        let costs = CostTable::new().with_cost("T1", "R1", 1);
        let mut caps = CapacityLedger::from_capacities([("R1", 1)]).unwrap();

        let err = IterativeScheduler::new()
            .run(&tasks(&["T1"]), &resources, &costs, &mut caps)
            .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidCapacity { ref resource, capacity: None } if resource == "R2"));
        assert_eq!(caps.remaining("R1"), Some(1));
    }

    #[test]
    fn test_run_checked_validates() {
        let resources = vec![Resource::edge("R1")];
        let costs = CostTable::new().with_cost("T1", "R1", 0);
        let mut caps = ledger(&resources);

        let err = IterativeScheduler::new()
            .run_checked(&tasks(&["T1"]), &resources, &costs, &mut caps)
            .unwrap_err();
        assert!(matches!(err, AllocationError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_ledger_reuse_across_runs() {
        let resources = vec![Resource::edge("R1").with_capacity(1)];
        let costs = CostTable::new()
            .with_cost("T1", "R1", 1)
            .with_cost("T2", "R1", 1);
        let mut caps = ledger(&resources);
        let scheduler = IterativeScheduler::new();

        let first = scheduler
            .run(&tasks(&["T1"]), &resources, &costs, &mut caps)
            .unwrap();
        assert!(first.is_complete());

        let blocked = scheduler
            .run(&tasks(&["T2"]), &resources, &costs, &mut caps)
            .unwrap();
        assert_eq!(blocked.unallocated, vec!["T2".to_string()]);

        // T1 completes and frees its slot.
        caps.release("R1").unwrap();
        let second = scheduler
            .run(&tasks(&["T2"]), &resources, &costs, &mut caps)
            .unwrap();
        assert_eq!(pairs(&second), vec![("T2", "R1")]);
        assert_eq!(second.initial_capacities["R1"], 1);
        assert_eq!(second.final_capacities["R1"], 0);
    }

    /// Places every task on a resource it cannot reach.
    #[derive(Debug)]
    struct RogueSolver;

    impl AssignmentSolver for RogueSolver {
        fn name(&self) -> &'static str {
            "rogue"
        }

        fn solve(
            &self,
            tasks: &[&str],
            _resources: &[&str],
            _costs: &CostTable,
        ) -> AllocationResult<RoundSolution> {
            Ok(RoundSolution::from_placements(
                tasks
                    .iter()
                    .map(|t| Placement {
                        task_id: t.to_string(),
                        resource_id: "Elsewhere".into(),
                        cost: 1,
                    })
                    .collect(),
            ))
        }
    }

    #[test]
    fn test_invalid_solution_rejected() {
        let resources = vec![Resource::edge("R1")];
        let costs = CostTable::new().with_cost("T1", "R1", 1);
        let mut caps = ledger(&resources);

        let err = IterativeScheduler::with_solver(RogueSolver)
            .run(&tasks(&["T1"]), &resources, &costs, &mut caps)
            .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidSolution { solver: "rogue", .. }));
        assert_eq!(caps.remaining("R1"), Some(5));
    }

    /// Places only the first offered task on its first offered resource.
    #[derive(Debug)]
    struct FirstOnlySolver;

    impl AssignmentSolver for FirstOnlySolver {
        fn name(&self) -> &'static str {
            "first-only"
        }

        fn solve(
            &self,
            tasks: &[&str],
            _resources: &[&str],
            costs: &CostTable,
        ) -> AllocationResult<RoundSolution> {
            let placements = tasks
                .first()
                .and_then(|&t| costs.entries_for_task(t).next())
                .map(|e| Placement {
                    task_id: e.task_id.clone(),
                    resource_id: e.resource_id.clone(),
                    cost: e.cost,
                })
                .into_iter()
                .collect();
            Ok(RoundSolution::from_placements(placements))
        }
    }

    #[test]
    fn test_solution_missing_tasks_rejected() {
        let resources = vec![Resource::edge("R1"), Resource::cloud("R2")];
        let costs = CostTable::new()
            .with_cost("T1", "R1", 1)
            .with_cost("T2", "R2", 2);
        let mut caps = ledger(&resources);

        let err = IterativeScheduler::with_solver(FirstOnlySolver)
            .run(&tasks(&["T1", "T2"]), &resources, &costs, &mut caps)
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::InvalidSolution {
                solver: "first-only",
                ..
            }
        ));
        assert_eq!(caps.remaining("R1"), Some(5));
        assert_eq!(caps.remaining("R2"), Some(5));
    }

    #[test]
    fn test_outcome_serde() {
        let (tasks, resources, costs) = contended();
        let mut caps = ledger(&resources);
        let outcome = IterativeScheduler::new()
            .run(&tasks, &resources, &costs, &mut caps)
            .unwrap();

        let json = serde_json::to_string(&outcome).unwrap();
        let back: AllocationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_config_serde() {
        let config = SchedulerConfig::default()
            .with_infeasibility(InfeasibilityPolicy::Abort)
            .with_max_rounds(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: SchedulerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    fn instance_strategy() -> impl Strategy<Value = (InstanceConfig, u64)> {
        (0usize..12, 0usize..4, 0usize..4, 1u32..=10, 0i32..4, any::<u64>()).prop_map(
            |(n, e, c, p, cap, seed)| {
                let config = InstanceConfig::new(n, e, c)
                    .with_connection_probability(f64::from(p) / 10.0)
                    .with_capacity(cap);
                (config, seed)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_allocation_invariants((config, seed) in instance_strategy()) {
            let inst = generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
            let mut caps = inst.capacity_ledger().unwrap();

            let outcome = IterativeScheduler::new()
                .run(&inst.tasks, &inst.resources, &inst.costs, &mut caps)
                .unwrap();

            // Exactly once.
            let mut seen = HashSet::new();
            for e in &outcome.sequence {
                prop_assert!(seen.insert(e.task_id.clone()));
            }
            prop_assert_eq!(seen.len() + outcome.unallocated.len(), inst.tasks.len());

            // Capacity and connectivity.
            let mut used: BTreeMap<&str, u32> = BTreeMap::new();
            for e in &outcome.sequence {
                *used.entry(e.resource_id.as_str()).or_insert(0) += 1;
                prop_assert_eq!(inst.costs.get(&e.task_id, &e.resource_id), Some(e.cost));
            }
            for (id, n) in &used {
                prop_assert!(*n <= outcome.initial_capacities[*id]);
            }

            // Progress.
            prop_assert!(outcome.round_count() <= inst.tasks.len());
            for r in &outcome.rounds {
                prop_assert!(!r.committed.is_empty());
                prop_assert_eq!(r.committed_cost() + r.deferred_cost(), r.solution_cost);
            }

            // Unallocated tasks have no reachable resource with free slots.
            for t in &outcome.unallocated {
                prop_assert!(inst
                    .costs
                    .entries_for_task(t)
                    .all(|e| outcome.final_capacities[&e.resource_id] == 0));
            }
        }

        #[test]
        fn prop_fully_connected_with_room_completes(
            n in 0usize..10,
            e in 1usize..4,
            c in 0usize..3,
            seed in any::<u64>(),
        ) {
            let resources = e + c;
            let cap = n.div_ceil(resources) as i32;
            let config = InstanceConfig::new(n, e, c)
                .with_connection_probability(1.0)
                .with_capacity(cap);
            let inst = generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
            let mut caps = inst.capacity_ledger().unwrap();

            let outcome = IterativeScheduler::new()
                .run(&inst.tasks, &inst.resources, &inst.costs, &mut caps)
                .unwrap();

            prop_assert!(outcome.is_complete());
            prop_assert_eq!(outcome.allocation_count(), n);
        }

        #[test]
        fn prop_solvers_agree((config, seed) in instance_strategy()) {
            let inst = generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap();

            let mut caps_a = inst.capacity_ledger().unwrap();
            let a = IterativeScheduler::new()
                .run(&inst.tasks, &inst.resources, &inst.costs, &mut caps_a)
                .unwrap();

            let mut caps_b = inst.capacity_ledger().unwrap();
            let b = IterativeScheduler::with_solver(MinCostSolver::new())
                .run(&inst.tasks, &inst.resources, &inst.costs, &mut caps_b)
                .unwrap();

            prop_assert_eq!(a, b);
        }
    }
}
