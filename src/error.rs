//! Allocation error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while solving or running an allocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// A task offered to a round has no reachable resource.
    #[error("infeasible: task '{task}' has no reachable resource")]
    Infeasible { task: String },

    /// No tasks or no resources were supplied.
    #[error("empty instance: {tasks} tasks, {resources} resources")]
    EmptyInstance { tasks: usize, resources: usize },

    /// Negative capacity, or a resource missing from the capacity ledger.
    #[error("invalid capacity for resource '{resource}': {capacity:?}")]
    InvalidCapacity {
        resource: String,
        capacity: Option<i64>,
    },

    /// A slot was requested from a resource with no remaining capacity.
    #[error("capacity exhausted for resource '{0}'")]
    CapacityExhausted(String),

    /// The resource is not tracked by the capacity ledger.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// The MILP backend failed for a reason other than infeasibility.
    #[error("solver '{solver}' failed: {reason}")]
    SolverFailure { solver: &'static str, reason: String },

    /// A solver returned an assignment that contradicts its round.
    #[error("invalid solution from solver '{solver}': {reason}")]
    InvalidSolution { solver: &'static str, reason: String },

    /// Instance generation parameters are out of range.
    #[error("invalid instance config: {0}")]
    InvalidConfig(String),

    /// Structural input problems found by validation.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

impl From<Vec<ValidationError>> for AllocationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AllocationError::Validation(errors)
    }
}
