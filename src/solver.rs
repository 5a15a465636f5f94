use good_lp::{Expression, ResolutionError, Solution, SolverModel, default_solver};
use log::{info, warn};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::config::SolveOptions;
use crate::data::{DayIndex, ShiftKey, ShiftKind, WorkerIndex};
use crate::error::{Result, RosterError};
use crate::model::RosterModel;

/// Shifts switched on by the solver. Anything absent is off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    on: BTreeSet<ShiftKey>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn works(&self, worker: WorkerIndex, day: DayIndex, shift: ShiftKind) -> bool {
        self.on.contains(&ShiftKey::new(worker, day, shift))
    }

    pub fn len(&self) -> usize {
        self.on.len()
    }
}

impl FromIterator<ShiftKey> for Assignment {
    fn from_iter<I: IntoIterator<Item = ShiftKey>>(iter: I) -> Self {
        Self {
            on: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Assignment),
    Infeasible,
}

/// Any backend that can satisfy a [`RosterModel`].
pub trait ConstraintSolver {
    /// `solver_seed` breaks ties between feasible solutions.
    fn solve(&self, model: RosterModel, solver_seed: i32) -> Result<SolveOutcome>;
}

/// HiGHS through `good_lp`.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    options: SolveOptions,
}

impl HighsSolver {
    pub fn new(options: SolveOptions) -> Self {
        Self { options }
    }
}

impl ConstraintSolver for HighsSolver {
    fn solve(&self, model: RosterModel, solver_seed: i32) -> Result<SolveOutcome> {
        let start_time = Instant::now();
        let RosterModel {
            variables,
            shifts,
            constraints,
        } = model;

        // total shift count is pinned by the weekly quotas, so any feasible
        // point is optimal
        let objective: Expression = shifts.values().copied().sum();
        let mut problem = variables
            .minimise(objective)
            .using(default_solver)
            .set_option("threads", self.options.threads)
            .set_option("random_seed", solver_seed)
            .set_option("log_to_console", self.options.solver_log);
        if let Some(limit) = self.options.time_limit {
            problem = problem.set_option("time_limit", limit);
        }
        for c in constraints {
            problem.add_constraint(c.constraint);
        }

        info!("Starting ILP solver (seed {solver_seed})...");
        let solution = match problem.solve() {
            Ok(s) => s,
            Err(ResolutionError::Infeasible) => {
                warn!("Solver proved the model infeasible after {:.2?}", start_time.elapsed());
                return Ok(SolveOutcome::Infeasible);
            }
            Err(e) => return Err(RosterError::Solver(e.to_string())),
        };
        info!("Solution found in {:.2?}", start_time.elapsed());

        let assignment = shifts
            .into_iter()
            .filter(|(_, var)| solution.value(*var) > 0.5)
            .map(|(key, _)| key)
            .collect();
        Ok(SolveOutcome::Solved(assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_defaults_to_off() {
        let assignment: Assignment = [ShiftKey::new(0, 3, ShiftKind::Late)].into_iter().collect();
        assert!(assignment.works(0, 3, ShiftKind::Late));
        assert!(!assignment.works(0, 3, ShiftKind::Early));
        assert!(!assignment.works(1, 3, ShiftKind::Late));
        assert_eq!(assignment.len(), 1);
    }
}
