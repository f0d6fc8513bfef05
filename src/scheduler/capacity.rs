//! Capacity bookkeeping.
//!
//! The ledger tracks remaining task slots per resource. The scheduler
//! borrows it mutably for the length of a run and applies one batch of
//! decrements per round. Callers keep ownership between runs and may
//! restore slots when tasks complete.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AllocationError, AllocationResult};
use crate::models::Resource;

/// Remaining capacity per resource.
///
/// # Invariants
/// - Remaining capacity never goes negative.
/// - Remaining capacity never exceeds the initial capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLedger {
    initial: BTreeMap<String, u32>,
    remaining: BTreeMap<String, u32>,
}

impl CapacityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes every resource to its configured capacity.
    ///
    /// Fails with `InvalidCapacity` on a negative capacity.
    pub fn from_resources(resources: &[Resource]) -> AllocationResult<Self> {
        Self::from_capacities(
            resources
                .iter()
                .map(|r| (r.id.clone(), i64::from(r.capacity))),
        )
    }

    /// Initializes from explicit (resource, capacity) pairs.
    ///
    /// Fails with `InvalidCapacity` on a negative or out-of-range capacity.
    pub fn from_capacities<I, K>(capacities: I) -> AllocationResult<Self>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        let mut ledger = Self::new();
        for (id, capacity) in capacities {
            let id = id.into();
            let slots = u32::try_from(capacity).map_err(|_| AllocationError::InvalidCapacity {
                resource: id.clone(),
                capacity: Some(capacity),
            })?;
            ledger.initial.insert(id.clone(), slots);
            ledger.remaining.insert(id, slots);
        }
        Ok(ledger)
    }

    /// Gives every resource the same capacity.
    pub fn uniform(resources: &[Resource], capacity: u32) -> Self {
        let initial: BTreeMap<String, u32> =
            resources.iter().map(|r| (r.id.clone(), capacity)).collect();
        Self {
            remaining: initial.clone(),
            initial,
        }
    }

    /// Remaining slots, or `None` for an untracked resource.
    pub fn remaining(&self, resource_id: &str) -> Option<u32> {
        self.remaining.get(resource_id).copied()
    }

    /// Initial slots, or `None` for an untracked resource.
    pub fn initial(&self, resource_id: &str) -> Option<u32> {
        self.initial.get(resource_id).copied()
    }

    /// Whether the resource has at least one free slot.
    pub fn has_capacity(&self, resource_id: &str) -> bool {
        self.remaining(resource_id).is_some_and(|c| c > 0)
    }

    /// Whether the resource is tracked.
    pub fn contains(&self, resource_id: &str) -> bool {
        self.remaining.contains_key(resource_id)
    }

    /// Total free slots across all resources.
    pub fn free_slots(&self) -> u64 {
        self.remaining.values().map(|&c| u64::from(c)).sum()
    }

    /// Takes one slot. Returns the remaining capacity afterwards.
    pub fn consume(&mut self, resource_id: &str) -> AllocationResult<u32> {
        let slots = self
            .remaining
            .get_mut(resource_id)
            .ok_or_else(|| AllocationError::UnknownResource(resource_id.to_string()))?;
        if *slots == 0 {
            return Err(AllocationError::CapacityExhausted(resource_id.to_string()));
        }
        *slots -= 1;
        Ok(*slots)
    }

    /// Returns one slot after a task completes.
    ///
    /// Saturates at the initial capacity. Returns the remaining capacity
    /// afterwards.
    pub fn release(&mut self, resource_id: &str) -> AllocationResult<u32> {
        let initial = self
            .initial(resource_id)
            .ok_or_else(|| AllocationError::UnknownResource(resource_id.to_string()))?;
        let slots = self
            .remaining
            .get_mut(resource_id)
            .ok_or_else(|| AllocationError::UnknownResource(resource_id.to_string()))?;
        *slots = (*slots + 1).min(initial);
        Ok(*slots)
    }

    /// Overrides the remaining capacity, raising the initial capacity if
    /// needed. Adds the resource if it is not tracked yet.
    pub fn set_remaining(&mut self, resource_id: impl Into<String>, slots: u32) {
        let id = resource_id.into();
        let initial = self.initial.entry(id.clone()).or_insert(slots);
        *initial = (*initial).max(slots);
        self.remaining.insert(id, slots);
    }

    /// Restores every resource to its initial capacity.
    pub fn reset(&mut self) {
        self.remaining = self.initial.clone();
    }

    /// Copy of the remaining capacities.
    pub fn snapshot(&self) -> BTreeMap<String, u32> {
        self.remaining.clone()
    }

    /// Copy of the initial capacities.
    pub fn initial_snapshot(&self) -> BTreeMap<String, u32> {
        self.initial.clone()
    }

    /// Fails with `InvalidCapacity` for the first resource the ledger does
    /// not track.
    pub fn ensure_covers(&self, resources: &[Resource]) -> AllocationResult<()> {
        match resources.iter().find(|r| !self.contains(&r.id)) {
            Some(r) => Err(AllocationError::InvalidCapacity {
                resource: r.id.clone(),
                capacity: None,
            }),
            None => Ok(()),
        }
    }

    /// Takes one slot per listed resource, all or nothing.
    ///
    /// Returns the remaining capacity after each individual decrement, in
    /// batch order. On error the ledger is unchanged.
    pub fn consume_batch(&mut self, resource_ids: &[&str]) -> AllocationResult<Vec<u32>> {
        let mut demand: BTreeMap<&str, u32> = BTreeMap::new();
        for &id in resource_ids {
            *demand.entry(id).or_insert(0) += 1;
        }
        for (&id, &need) in &demand {
            match self.remaining(id) {
                None => return Err(AllocationError::UnknownResource(id.to_string())),
                Some(free) if free < need => {
                    return Err(AllocationError::CapacityExhausted(id.to_string()))
                }
                Some(_) => {}
            }
        }
        resource_ids.iter().map(|id| self.consume(id)).collect()
    }
}
