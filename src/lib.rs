//! Iterative capacity-constrained task allocation for the U-Engine ecosystem.
//!
//! Places tasks on heterogeneous resources (edge and cloud nodes) at minimum
//! cost while respecting per-resource capacity. Instead of one global
//! assignment, a small assignment problem is re-solved round by round over
//! the capacity that is still free, yielding an ordered allocation sequence.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Resource`, `CostTable`,
//!   `AllocationOutcome`, `AllocationEntry`, `RoundReport`
//! - **`solver`**: Single-round assignment (`AssignmentSolver` trait,
//!   `IlpAssignmentSolver`, `MinCostSolver`)
//! - **`scheduler`**: Round loop (`IterativeScheduler`), `CapacityLedger`,
//!   `AllocationKpi`
//! - **`generator`**: Random problem instances
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling cost
//!   entries, non-positive costs, negative capacities)
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use u_assign::generator::{generate, InstanceConfig};
//! use u_assign::scheduler::{AllocationKpi, IterativeScheduler};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let instance = generate(&InstanceConfig::default(), &mut rng).unwrap();
//! let mut capacities = instance.capacity_ledger().unwrap();
//!
//! let outcome = IterativeScheduler::new()
//!     .run(&instance.tasks, &instance.resources, &instance.costs, &mut capacities)
//!     .unwrap();
//! let kpi = AllocationKpi::calculate(&outcome, &instance.resources);
//! assert_eq!(kpi.allocated + kpi.unallocated, instance.tasks.len());
//! ```
//!
//! # References
//!
//! - Burkard, Dell'Amico & Martello (2012), "Assignment Problems"
//! - Wolsey (1998), "Integer Programming"

pub mod error;
pub mod generator;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{AllocationError, AllocationResult};
