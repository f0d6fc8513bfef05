//! Input validation for allocation problems.
//!
//! Checks structural integrity of tasks, resources and the cost table
//! before allocation. Detects:
//! - Duplicate IDs
//! - Cost entries referring to unknown tasks or resources
//! - Zero costs
//! - Negative resource capacities
//!
//! Tasks without any cost entry are not an error here: they are a normal
//! input that ends up unallocated (or fails the run, depending on the
//! scheduler's infeasibility policy). Use [`unreachable_tasks`] to list
//! them up front.

use crate::models::{CostTable, Resource, Task};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A cost entry references a task that doesn't exist.
    UnknownTask,
    /// A cost entry references a resource that doesn't exist.
    UnknownResource,
    /// A cost entry has cost zero.
    NonPositiveCost,
    /// A resource has a negative capacity.
    NegativeCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for an allocation problem.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate resource IDs
/// 3. No negative resource capacities
/// 4. Every cost entry references an existing task and resource
/// 5. Every cost is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(tasks: &[Task], resources: &[Resource], costs: &CostTable) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if r.capacity < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeCapacity,
                format!("Resource '{}' has negative capacity {}", r.id, r.capacity),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for e in costs.iter() {
        if !task_ids.contains(e.task_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTask,
                format!("Cost entry references unknown task '{}'", e.task_id),
            ));
        }
        if !resource_ids.contains(e.resource_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownResource,
                format!("Cost entry references unknown resource '{}'", e.resource_id),
            ));
        }
        if e.cost == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveCost,
                format!("Cost of ({}, {}) must be positive", e.task_id, e.resource_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Tasks with no cost entry toward any of the given resources, in input
/// order. These can never be allocated.
pub fn unreachable_tasks<'a>(
    tasks: &'a [Task],
    resources: &[Resource],
    costs: &CostTable,
) -> Vec<&'a str> {
    let resource_ids: HashSet<&str> = resources.iter().map(|r| r.id.as_str()).collect();
    let reachable: HashSet<&str> = costs
        .iter()
        .filter(|e| resource_ids.contains(e.resource_id.as_str()))
        .map(|e| e.task_id.as_str())
        .collect();
    tasks
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| !reachable.contains(id))
        .collect()
}
