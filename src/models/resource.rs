//! Resource model.
//!
//! Resources are the compute targets tasks are placed on: edge nodes close
//! to the data source and cloud nodes in a data center. Each resource has a
//! class and a configured maximum capacity (number of task slots).

use serde::{Deserialize, Serialize};

/// Default number of task slots per resource.
pub const DEFAULT_CAPACITY: i32 = 5;

/// A compute resource that tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Resource classification.
    pub class: ResourceClass,
    /// Maximum number of tasks this resource accepts (default: 5).
    ///
    /// Signed so that malformed inputs can be represented and rejected
    /// by validation rather than silently wrapped.
    pub capacity: i32,
}

/// Resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceClass {
    /// Edge node (near the data source, usually cheaper to reach).
    Edge,
    /// Cloud node.
    Cloud,
}

impl Resource {
    /// Creates a new resource of the given class.
    pub fn new(id: impl Into<String>, class: ResourceClass) -> Self {
        Self {
            id: id.into(),
            class,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Creates an edge resource.
    pub fn edge(id: impl Into<String>) -> Self {
        Self::new(id, ResourceClass::Edge)
    }

    /// Creates a cloud resource.
    pub fn cloud(id: impl Into<String>) -> Self {
        Self::new(id, ResourceClass::Cloud)
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this is an edge resource.
    pub fn is_edge(&self) -> bool {
        self.class == ResourceClass::Edge
    }

    /// Whether this is a cloud resource.
    pub fn is_cloud(&self) -> bool {
        self.class == ResourceClass::Cloud
    }
}
