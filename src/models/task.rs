//! Task model.
//!
//! A task is an atomic unit of work that must be placed on exactly one
//! resource. Tasks are immutable once created; the scheduler only reads
//! their identifiers.

use serde::{Deserialize, Serialize};

/// A task to be allocated.
///
/// # Time Representation
/// The optional execution time is a hint in milliseconds carried for
/// downstream consumers (e.g. replaying the allocation over time). It does
/// not influence allocation decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Display name, passed through to consumers that render the
    /// allocation sequence. Empty when unset.
    pub name: String,
    /// Expected execution time (ms). `None` = unknown.
    pub execution_time_ms: Option<i64>,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            execution_time_ms: None,
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the expected execution time (ms).
    pub fn with_execution_time(mut self, execution_time_ms: i64) -> Self {
        self.execution_time_ms = Some(execution_time_ms);
        self
    }

}
