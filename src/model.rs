//! Translates the staffing policy into a binary model.
//!
//! One variable per (worker, day, shift); every rule becomes a linear
//! (in)equality over those variables. Nothing here solves anything.

use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use itertools::iproduct;
use log::{info, trace};
use std::collections::{BTreeMap, HashMap};

use crate::config::RosterConfig;
use crate::data::{DAYS_PER_WEEK, ExtraStaffingDay, ShiftKey, ShiftKind, Worker};
use crate::patterns::PatternRotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintGroup {
    WeeklyQuota,
    DaysOff,
    NoEarlyAfterLate,
    LateHeadcount,
    EarlyHeadcount,
    OneShiftPerDay,
}

pub struct GroupedConstraint {
    pub group: ConstraintGroup,
    pub constraint: Constraint,
}

pub struct RosterModel {
    pub variables: ProblemVariables,
    pub shifts: HashMap<ShiftKey, Variable>,
    pub constraints: Vec<GroupedConstraint>,
}

impl RosterModel {
    pub fn shift(&self, key: ShiftKey) -> Option<Variable> {
        self.shifts.get(&key).copied()
    }

    pub fn variable_count(&self) -> usize {
        self.shifts.len()
    }

    pub fn group_counts(&self) -> BTreeMap<ConstraintGroup, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.constraints {
            *counts.entry(c.group).or_insert(0) += 1;
        }
        counts
    }
}

pub struct RosterModelBuilder<'a> {
    config: &'a RosterConfig,
}

impl<'a> RosterModelBuilder<'a> {
    pub fn new(config: &'a RosterConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        workers: &[Worker],
        rotation: &PatternRotation,
        extra_days: &[ExtraStaffingDay],
    ) -> RosterModel {
        let config = self.config;
        let total_days = config.total_days();
        info!(
            "Setting up roster model with {} workers, {} weeks and {} days...",
            workers.len(),
            config.weeks,
            total_days
        );

        // x_wds = 1 if worker w works shift s on day d
        let mut variables = ProblemVariables::new();
        let mut shifts = HashMap::with_capacity(workers.len() * total_days * 2);
        for (w, d, s) in iproduct!(0..workers.len(), 0..total_days, ShiftKind::ALL) {
            let var = variables.add(variable().binary().name(format!("shift_w{w}_d{d}_{s:?}")));
            shifts.insert(ShiftKey::new(w, d, s), var);
        }
        trace!("Declared {} shift variables.", shifts.len());

        let x = |w: usize, d: usize, s: ShiftKind| shifts[&ShiftKey::new(w, d, s)];
        let mut constraints = Vec::new();
        let mut push = |group: ConstraintGroup, constraint: Constraint| {
            constraints.push(GroupedConstraint { group, constraint });
        };

        info!("Adding 'weekly quota' constraints...");
        let quota = f64::from(config.shifts_per_week);
        for (w, week) in iproduct!(0..workers.len(), 0..config.weeks) {
            let total: Expression = iproduct!(0..DAYS_PER_WEEK, ShiftKind::ALL)
                .map(|(day, s)| x(w, week * DAYS_PER_WEEK + day, s))
                .sum();
            push(ConstraintGroup::WeeklyQuota, constraint!(total == quota));
        }

        info!("Adding 'days off' constraints...");
        for (worker, week) in iproduct!(workers, 0..config.weeks) {
            let pattern = rotation.for_week(worker, week);
            for (&day_off, s) in iproduct!(&pattern.days_off, ShiftKind::ALL) {
                let var = x(worker.index, week * DAYS_PER_WEEK + day_off, s);
                push(ConstraintGroup::DaysOff, constraint!(var == 0));
            }
        }

        info!("Adding 'no early after late' constraints...");
        for (w, d) in iproduct!(0..workers.len(), 0..total_days.saturating_sub(1)) {
            let early_next = x(w, d + 1, ShiftKind::Early);
            let late = x(w, d, ShiftKind::Late);
            push(
                ConstraintGroup::NoEarlyAfterLate,
                constraint!(early_next + late <= 1),
            );
        }

        info!("Adding 'late headcount' constraints...");
        for week in 0..config.weeks {
            let extra_day = extra_days.iter().find(|e| e.week == week).map(|e| e.day);
            for day in 0..DAYS_PER_WEEK {
                let d = week * DAYS_PER_WEEK + day;
                let required = match extra_day {
                    Some(extra) => config.late_headcount(day, extra),
                    None => config.late_base,
                };
                let late: Expression = (0..workers.len()).map(|w| x(w, d, ShiftKind::Late)).sum();
                push(
                    ConstraintGroup::LateHeadcount,
                    constraint!(late == f64::from(required)),
                );
            }
        }

        info!("Adding 'early headcount' constraints...");
        let (early_min, early_max) = (f64::from(config.early_min), f64::from(config.early_max));
        for d in 0..total_days {
            let early: Expression = (0..workers.len()).map(|w| x(w, d, ShiftKind::Early)).sum();
            push(
                ConstraintGroup::EarlyHeadcount,
                constraint!(early.clone() >= early_min),
            );
            push(ConstraintGroup::EarlyHeadcount, constraint!(early <= early_max));
        }

        info!("Adding 'one shift per day' constraints...");
        for (w, d) in iproduct!(0..workers.len(), 0..total_days) {
            let early = x(w, d, ShiftKind::Early);
            let late = x(w, d, ShiftKind::Late);
            push(ConstraintGroup::OneShiftPerDay, constraint!(early + late <= 1));
        }

        trace!("Emitted {} constraints.", constraints.len());
        RosterModel {
            variables,
            shifts,
            constraints,
        }
    }
}
