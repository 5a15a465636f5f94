//! Projects a solved assignment onto the persisted schedule layout.

use chrono::{Days, NaiveDate};
use itertools::iproduct;

use crate::config::RosterConfig;
use crate::data::{DAYS_PER_WEEK, DayEntry, DayShifts, Schedule, ShiftKind, Weekday, Worker};
use crate::error::{Result, RosterError};
use crate::solver::Assignment;

/// Hours and days off of one worker, per week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTally {
    pub hours: Vec<u32>,
    pub days_off: Vec<Vec<Weekday>>,
}

impl WorkerTally {
    fn new(weeks: usize) -> Self {
        Self {
            hours: vec![0; weeks],
            days_off: vec![Vec::new(); weeks],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssembledRoster {
    pub schedule: Schedule,
    /// Indexed like the worker list.
    pub tallies: Vec<WorkerTally>,
}

pub struct ScheduleAssembler<'a> {
    config: &'a RosterConfig,
    start_date: NaiveDate,
}

impl<'a> ScheduleAssembler<'a> {
    /// `start_date` is the calendar date of day 0.
    pub fn new(config: &'a RosterConfig, start_date: NaiveDate) -> Self {
        Self { config, start_date }
    }

    pub fn assemble(&self, workers: &[Worker], assignment: &Assignment) -> Result<AssembledRoster> {
        let weeks = self.config.weeks;
        let mut schedule = Schedule::new();
        let mut tallies = vec![WorkerTally::new(weeks); workers.len()];

        for (week, day) in iproduct!(0..weeks, 0..DAYS_PER_WEEK) {
            let d = week * DAYS_PER_WEEK + day;
            let date = self
                .start_date
                .checked_add_days(Days::new(d as u64))
                .ok_or_else(|| RosterError::Date(format!("{} + {d} days", self.start_date)))?;
            let mut shifts = DayShifts::default();

            for worker in workers {
                let tally = &mut tallies[worker.index];
                let mut assigned = false;
                for s in ShiftKind::ALL {
                    if assignment.works(worker.index, d, s) {
                        shifts.roster_mut(s).push(worker.name.clone());
                        tally.hours[week] += self.config.shift_hours;
                        assigned = true;
                    }
                }
                if !assigned {
                    tally.days_off[week].push(day);
                }
            }

            schedule.insert_day(week, day, DayEntry { date, shifts });
        }

        Ok(AssembledRoster { schedule, tallies })
    }
}
