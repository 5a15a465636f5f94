//! End-to-end roster generation: policy decisions, model, solve, assembly,
//! validation. Runs synchronously on the calling thread.

use chrono::NaiveDate;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use crate::assemble::ScheduleAssembler;
use crate::config::{RosterConfig, SolveOptions};
use crate::data::{ExtraStaffingDay, Schedule, Weekday, Worker};
use crate::error::Result;
use crate::io::{check_weeks, save_schedule};
use crate::model::RosterModelBuilder;
use crate::patterns::PatternRotation;
use crate::solver::{ConstraintSolver, HighsSolver, SolveOutcome};
use crate::staffing::{ExtraStaffingSelector, previous_extra_day};
use crate::validate::{ValidationReport, Validator};

/// Everything fixed before the first random draw.
#[derive(Debug, Clone)]
pub struct RosterPlan {
    pub workers: Vec<Worker>,
    pub config: RosterConfig,
    pub rotation: PatternRotation,
    pub seed_day: Option<Weekday>,
    pub start_date: NaiveDate,
}

impl RosterPlan {
    pub fn new<S: AsRef<str>>(names: &[S], start_date: NaiveDate) -> Self {
        Self {
            workers: Worker::crew(names),
            config: RosterConfig::default(),
            rotation: PatternRotation::standard(),
            seed_day: None,
            start_date,
        }
    }

    pub fn with_config(mut self, config: RosterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rotation(mut self, rotation: PatternRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Keeps week 0's extra-staffing day away from the previous run's last.
    pub fn with_previous(mut self, previous: &Schedule) -> Self {
        self.seed_day = previous_extra_day(previous);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedRoster {
    pub schedule: Schedule,
    pub extra_days: Vec<ExtraStaffingDay>,
    pub report: ValidationReport,
}

#[derive(Debug, Clone)]
pub enum RosterOutcome {
    Generated(GeneratedRoster),
    Infeasible { extra_days: Vec<ExtraStaffingDay> },
}

pub fn generate<S, R>(plan: &RosterPlan, solver: &S, rng: &mut R) -> Result<RosterOutcome>
where
    S: ConstraintSolver + ?Sized,
    R: Rng,
{
    check_weeks(Path::new("plan"), plan.config.weeks)?;
    let extra_days = ExtraStaffingSelector::new(plan.config.weeks)
        .with_seed_day(plan.seed_day)
        .select(rng)?;

    let model = RosterModelBuilder::new(&plan.config).build(&plan.workers, &plan.rotation, &extra_days);
    let solver_seed: i32 = rng.random_range(1..=10_000);

    let assignment = match solver.solve(model, solver_seed)? {
        SolveOutcome::Solved(assignment) => assignment,
        SolveOutcome::Infeasible => {
            warn!("No feasible roster for {} workers", plan.workers.len());
            return Ok(RosterOutcome::Infeasible { extra_days });
        }
    };

    let roster = ScheduleAssembler::new(&plan.config, plan.start_date).assemble(&plan.workers, &assignment)?;
    let report = Validator::new(&plan.config, &plan.rotation).report(&plan.workers, &roster, &extra_days);
    if report.is_clean() {
        info!("Roster passed validation");
    } else {
        warn!("Roster failed validation");
    }

    Ok(RosterOutcome::Generated(GeneratedRoster {
        schedule: roster.schedule,
        extra_days,
        report,
    }))
}

/// Writes the schedule to `path` only when the report is clean. Returns
/// whether it was written.
pub fn save_if_clean<P: AsRef<Path>>(roster: &GeneratedRoster, path: P) -> Result<bool> {
    if !roster.report.is_clean() {
        warn!("Not saving {}: roster failed validation", path.as_ref().display());
        return Ok(false);
    }
    save_schedule(path, &roster.schedule)?;
    Ok(true)
}

/// Seeds the RNG from `options` and solves with HiGHS.
pub fn run(plan: &RosterPlan, options: &SolveOptions) -> Result<RosterOutcome> {
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    generate(plan, &HighsSolver::new(options.clone()), &mut rng)
}
