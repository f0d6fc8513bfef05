//! Random problem instances.
//!
//! Produces tasks `Task_1..Task_N`, resources `Edge_1..Edge_E` followed by
//! `Cloud_1..Cloud_C`, and a cost table in which every (task, resource)
//! pair is present independently with the connection probability, with a
//! cost drawn uniformly from an inclusive range.
//!
//! The rest of the crate does not depend on this module; any source of
//! [`ProblemInstance`] values works.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};
use crate::models::{CostTable, Resource, Task, DEFAULT_CAPACITY};
use crate::scheduler::CapacityLedger;

/// Parameters for random instance generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Number of tasks.
    pub num_tasks: usize,
    /// Number of edge resources.
    pub num_edge: usize,
    /// Number of cloud resources.
    pub num_cloud: usize,
    /// Probability that a (task, resource) pair is connected, in (0, 1].
    pub connection_probability: f64,
    /// Inclusive cost range (min ≥ 1).
    pub cost_range: (u32, u32),
    /// Capacity given to every resource.
    pub capacity: i32,
    /// Inclusive execution time range (ms) for tasks. `None` = no hint.
    pub execution_time_range: Option<(i64, i64)>,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            num_tasks: 15,
            num_edge: 5,
            num_cloud: 5,
            connection_probability: 0.8,
            cost_range: (1, 10),
            capacity: DEFAULT_CAPACITY,
            execution_time_range: Some((2, 5)),
        }
    }
}

impl InstanceConfig {
    /// Creates a config with the given counts and default everything else.
    pub fn new(num_tasks: usize, num_edge: usize, num_cloud: usize) -> Self {
        Self {
            num_tasks,
            num_edge,
            num_cloud,
            ..Default::default()
        }
    }

    /// Sets the connection probability.
    pub fn with_connection_probability(mut self, p: f64) -> Self {
        self.connection_probability = p;
        self
    }

    /// Sets the inclusive cost range.
    pub fn with_cost_range(mut self, min: u32, max: u32) -> Self {
        self.cost_range = (min, max);
        self
    }

    /// Sets the per-resource capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets or clears the execution time range.
    pub fn with_execution_time_range(mut self, range: Option<(i64, i64)>) -> Self {
        self.execution_time_range = range;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> AllocationResult<()> {
        let p = self.connection_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(AllocationError::InvalidConfig(format!(
                "connection probability {p} not in (0, 1]"
            )));
        }
        let (lo, hi) = self.cost_range;
        if lo == 0 || lo > hi {
            return Err(AllocationError::InvalidConfig(format!(
                "cost range [{lo}, {hi}] must be non-empty and positive"
            )));
        }
        if self.capacity < 0 {
            return Err(AllocationError::InvalidConfig(format!(
                "negative capacity {}",
                self.capacity
            )));
        }
        if let Some((lo, hi)) = self.execution_time_range {
            if lo < 0 || lo > hi {
                return Err(AllocationError::InvalidConfig(format!(
                    "execution time range [{lo}, {hi}] is invalid"
                )));
            }
        }
        Ok(())
    }
}

/// Tasks, resources and costs describing one allocation problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Tasks to allocate.
    pub tasks: Vec<Task>,
    /// Edge and cloud resources.
    pub resources: Vec<Resource>,
    /// Placement costs.
    pub costs: CostTable,
}

impl ProblemInstance {
    /// Creates an instance from parts.
    pub fn new(tasks: Vec<Task>, resources: Vec<Resource>, costs: CostTable) -> Self {
        Self {
            tasks,
            resources,
            costs,
        }
    }

    /// Edge resources, in order.
    pub fn edge_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| r.is_edge())
    }

    /// Cloud resources, in order.
    pub fn cloud_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| r.is_cloud())
    }

    /// A fresh ledger at each resource's configured capacity.
    pub fn capacity_ledger(&self) -> AllocationResult<CapacityLedger> {
        CapacityLedger::from_resources(&self.resources)
    }
}

/// Generates a random instance.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_assign::generator::{generate, InstanceConfig};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let instance = generate(&InstanceConfig::new(4, 2, 1), &mut rng).unwrap();
/// assert_eq!(instance.tasks.len(), 4);
/// assert_eq!(instance.resources[2].id, "Cloud_1");
/// ```
pub fn generate<R: Rng>(
    config: &InstanceConfig,
    rng: &mut R,
) -> AllocationResult<ProblemInstance> {
    config.validate()?;

    let mut tasks: Vec<Task> = (1..=config.num_tasks)
        .map(|i| Task::new(format!("Task_{i}")))
        .collect();

    let resources: Vec<Resource> = (1..=config.num_edge)
        .map(|i| Resource::edge(format!("Edge_{i}")))
        .chain((1..=config.num_cloud).map(|i| Resource::cloud(format!("Cloud_{i}"))))
        .map(|r| r.with_capacity(config.capacity))
        .collect();

    let (lo, hi) = config.cost_range;
    let mut costs = CostTable::new();
    for task in &tasks {
        for resource in &resources {
            if rng.random::<f64>() < config.connection_probability {
                costs.insert(&task.id, &resource.id, rng.random_range(lo..=hi));
            }
        }
    }

    if let Some((lo, hi)) = config.execution_time_range {
        for task in &mut tasks {
            task.execution_time_ms = Some(rng.random_range(lo..=hi));
        }
    }

    Ok(ProblemInstance::new(tasks, resources, costs))
}
