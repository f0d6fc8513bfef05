//! Cost table model.
//!
//! A partial mapping from (task, resource) pairs to positive integer costs.
//! A missing pair means the task cannot be placed on that resource, which
//! is how connectivity constraints are expressed.
//!
//! Entries keep their insertion order. Solvers iterate in that order, so
//! tie-breaking between equal-cost placements is reproducible.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single (task, resource, cost) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Task ID.
    pub task_id: String,
    /// Resource ID.
    pub resource_id: String,
    /// Placement cost (positive).
    pub cost: u32,
}

/// Insertion-ordered partial cost function over (task, resource) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CostEntry>", into = "Vec<CostEntry>")]
pub struct CostTable {
    entries: Vec<CostEntry>,
    index: HashMap<(String, String), usize>,
}

impl CostTable {
    /// Creates an empty cost table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates the cost of placing `task_id` on `resource_id`.
    ///
    /// Updating an existing pair keeps its original position.
    /// Returns the previous cost, if any.
    pub fn insert(
        &mut self,
        task_id: impl Into<String>,
        resource_id: impl Into<String>,
        cost: u32,
    ) -> Option<u32> {
        let key = (task_id.into(), resource_id.into());
        if let Some(&i) = self.index.get(&key) {
            let previous = self.entries[i].cost;
            self.entries[i].cost = cost;
            return Some(previous);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(CostEntry {
            task_id: key.0,
            resource_id: key.1,
            cost,
        });
        None
    }

    /// Builder-style insert.
    pub fn with_cost(
        mut self,
        task_id: impl Into<String>,
        resource_id: impl Into<String>,
        cost: u32,
    ) -> Self {
        self.insert(task_id, resource_id, cost);
        self
    }

    /// Cost of a pair, or `None` if the task cannot reach the resource.
    pub fn get(&self, task_id: &str, resource_id: &str) -> Option<u32> {
        self.index
            .get(&(task_id.to_string(), resource_id.to_string()))
            .map(|&i| self.entries[i].cost)
    }

    /// Whether the pair is present.
    pub fn contains(&self, task_id: &str, resource_id: &str) -> bool {
        self.get(task_id, resource_id).is_some()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CostEntry> {
        self.entries.iter()
    }

    /// Entries for one task, in insertion order.
    pub fn entries_for_task<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a CostEntry> {
        self.entries.iter().filter(move |e| e.task_id == task_id)
    }

    /// Whether the task reaches at least one resource.
    pub fn has_task(&self, task_id: &str) -> bool {
        self.entries.iter().any(|e| e.task_id == task_id)
    }

    /// Returns the sub-table of pairs accepted by `keep`, preserving order.
    pub fn restrict<F>(&self, mut keep: F) -> CostTable
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| keep(&e.task_id, &e.resource_id))
            .cloned()
            .collect()
    }
}

impl FromIterator<CostEntry> for CostTable {
    fn from_iter<I: IntoIterator<Item = CostEntry>>(iter: I) -> Self {
        let mut table = CostTable::new();
        for e in iter {
            table.insert(e.task_id, e.resource_id, e.cost);
        }
        table
    }
}

impl From<Vec<CostEntry>> for CostTable {
    fn from(entries: Vec<CostEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<CostTable> for Vec<CostEntry> {
    fn from(table: CostTable) -> Self {
        table.entries
    }
}
