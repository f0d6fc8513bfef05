//! Binary integer programming formulation of the round assignment.
//!
//! Builds a `good_lp` problem with one binary variable per offered (task,
//! resource) pair and one equality constraint per task, then solves it
//! with the pure-Rust `microlp` backend.

use std::collections::HashSet;

use good_lp::{
    constraint, default_solver, variable, variables, Constraint, Expression, ProblemVariables,
    ResolutionError, Solution, SolverModel, Variable,
};
use tracing::trace;

use super::{ensure_reachable, offered_costs, AssignmentSolver, RoundSolution};
use crate::error::{AllocationError, AllocationResult};
use crate::models::{CostEntry, CostTable, Placement};

/// A built assignment program, ready to hand to the MILP backend.
pub struct AssignmentProgram {
    variables: ProblemVariables,
    decisions: Vec<Variable>,
    objective: Expression,
    constraints: Vec<Constraint>,
}

impl AssignmentProgram {
    /// Number of binary decision variables.
    pub fn var_count(&self) -> usize {
        self.decisions.len()
    }

    /// Number of task constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

/// Builds the assignment program from a round's inputs.
///
/// Variables follow cost table order. Equal-cost alternatives for a task
/// are resolved in favor of the entry inserted first.
///
/// # Example
/// ```
/// use u_assign::models::CostTable;
/// use u_assign::solver::AssignmentProgramBuilder;
///
/// let costs = CostTable::new()
///     .with_cost("Task_1", "Edge_1", 3)
///     .with_cost("Task_2", "Edge_1", 5)
///     .with_cost("Task_2", "Cloud_1", 1);
/// let builder = AssignmentProgramBuilder::new(&["Task_1", "Task_2"], &["Edge_1", "Cloud_1"], &costs);
/// let program = builder.build();
/// assert_eq!(program.var_count(), 3);
/// assert_eq!(program.constraint_count(), 2);
/// ```
pub struct AssignmentProgramBuilder<'a> {
    tasks: Vec<&'a str>,
    offered: CostTable,
}

impl<'a> AssignmentProgramBuilder<'a> {
    /// Creates a builder. Duplicate task IDs are ignored after the first.
    pub fn new(tasks: &[&'a str], resources: &[&str], costs: &CostTable) -> Self {
        let mut seen = HashSet::new();
        let tasks: Vec<&'a str> = tasks.iter().copied().filter(|t| seen.insert(*t)).collect();
        let offered = offered_costs(&tasks, resources, costs);
        Self { tasks, offered }
    }

    /// Tasks in the formulation, in input order.
    pub fn tasks(&self) -> &[&'a str] {
        &self.tasks
    }

    /// Cost entries that became decision variables.
    pub fn offered(&self) -> &CostTable {
        &self.offered
    }

    /// Builds the program.
    ///
    /// Creates:
    /// - a binary variable `x[task,resource]` per offered cost entry
    ///   (variable `j` is the `j`-th entry of [`Self::offered`])
    /// - one constraint per task: Σ x[task,·] = 1
    /// - the objective Σ cost · x
    pub fn build(&self) -> AssignmentProgram {
        let mut variables = variables!();

        let decisions: Vec<Variable> = self
            .offered
            .iter()
            .map(|e| {
                variables.add(
                    variable()
                        .binary()
                        .name(format!("x[{},{}]", e.task_id, e.resource_id)),
                )
            })
            .collect();

        let objective = self
            .offered
            .iter()
            .zip(&decisions)
            .fold(Expression::from(0.0), |acc, (e, &x)| acc + x * f64::from(e.cost));

        let constraints = self
            .tasks
            .iter()
            .map(|&task| {
                let placed = self
                    .offered
                    .iter()
                    .zip(&decisions)
                    .filter(|(e, _)| e.task_id == task)
                    .fold(Expression::from(0.0), |acc, (_, &x)| acc + x);
                constraint!(placed == 1)
            })
            .collect();

        AssignmentProgram {
            variables,
            decisions,
            objective,
            constraints,
        }
    }

    /// Decodes variable values into placements, in task order.
    ///
    /// Each task takes the first offered entry whose cost equals the one the
    /// backend picked. Tasks only share the objective, so this keeps the
    /// solution optimal while making ties independent of the backend.
    fn decode(&self, values: &[f64]) -> Vec<Placement> {
        let selected: Vec<&CostEntry> = self
            .offered
            .iter()
            .zip(values)
            .filter(|(_, &v)| v > 0.5)
            .map(|(e, _)| e)
            .collect();

        self.tasks
            .iter()
            .filter_map(|&task| {
                let chosen = selected.iter().find(|e| e.task_id == task)?;
                self.offered
                    .entries_for_task(task)
                    .find(|e| e.cost == chosen.cost)
            })
            .map(|e| Placement {
                task_id: e.task_id.clone(),
                resource_id: e.resource_id.clone(),
                cost: e.cost,
            })
            .collect()
    }
}

/// Round solver backed by the binary integer program and the `microlp`
/// MILP backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct IlpAssignmentSolver;

impl IlpAssignmentSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl AssignmentSolver for IlpAssignmentSolver {
    fn name(&self) -> &'static str {
        "ilp"
    }

    fn solve(
        &self,
        tasks: &[&str],
        resources: &[&str],
        costs: &CostTable,
    ) -> AllocationResult<RoundSolution> {
        let builder = AssignmentProgramBuilder::new(tasks, resources, costs);
        ensure_reachable(builder.tasks(), builder.offered())?;
        if builder.tasks().is_empty() {
            return Ok(RoundSolution::default());
        }

        let AssignmentProgram {
            variables,
            decisions,
            objective,
            constraints,
        } = builder.build();
        let var_count = decisions.len();

        let mut model = variables.minimise(objective).using(default_solver);
        for c in constraints {
            model = model.with(c);
        }
        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => AllocationError::Infeasible {
                task: builder.tasks()[0].to_string(),
            },
            other => AllocationError::SolverFailure {
                solver: self.name(),
                reason: other.to_string(),
            },
        })?;

        let values: Vec<f64> = decisions.iter().map(|&x| solution.value(x)).collect();
        let placements = builder.decode(&values);
        if placements.len() != builder.tasks().len() {
            return Err(AllocationError::InvalidSolution {
                solver: self.name(),
                reason: format!(
                    "{} placements for {} tasks",
                    placements.len(),
                    builder.tasks().len()
                ),
            });
        }

        let solution = RoundSolution::from_placements(placements);
        trace!(
            vars = var_count,
            tasks = builder.tasks().len(),
            objective = solution.total_cost,
            "assignment program solved"
        );
        Ok(solution)
    }
}
