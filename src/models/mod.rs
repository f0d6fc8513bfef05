//! Allocation domain models.
//!
//! Provides the core data types for describing task allocation problems
//! and their solutions.
//!
//! # Domain Mappings
//!
//! | u-assign | Edge computing | Batch cluster | Logistics |
//! |----------|----------------|---------------|-----------|
//! | Task | Offloaded job | Batch job | Shipment |
//! | Resource | Edge/Cloud node | Worker host | Truck |
//! | CostTable | Latency/energy cost | Queue cost | Freight rate |
//! | AllocationOutcome | Offloading plan | Dispatch plan | Load plan |

mod allocation;
mod cost;
mod resource;
mod task;

pub use allocation::{AllocationEntry, AllocationOutcome, AllocationStatus, Placement, RoundReport};
pub use cost::{CostEntry, CostTable};
pub use resource::{Resource, ResourceClass, DEFAULT_CAPACITY};
pub use task::Task;
