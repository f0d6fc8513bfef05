//! Iterative allocation and KPI evaluation.
//!
//! Provides the round-based allocator, the capacity ledger it drains, and
//! outcome quality metrics.
//!
//! # Algorithm
//!
//! `IterativeScheduler` re-solves a single-round assignment problem over
//! the remaining tasks and the resources that still have free slots,
//! committing one atomic batch per round. Rounds are optimal; the whole
//! sequence is a greedy approximation.
//!
//! # KPI
//!
//! `AllocationKpi` computes total and average cost, allocation rate,
//! per-resource utilization and the edge/cloud split.
//!
//! # References
//!
//! - Burkard, Dell'Amico & Martello (2012), "Assignment Problems", Ch. 1
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod capacity;
mod iterative;
mod kpi;

pub use capacity::CapacityLedger;
pub use iterative::{InfeasibilityPolicy, IterativeScheduler, SchedulerConfig};
pub use kpi::AllocationKpi;

