//! Cross-checks an assembled roster against the policy it was built from.
//!
//! The days-off check only requires the mandated days to be among the actual
//! days off. Additional days off are not flagged.

use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::assemble::AssembledRoster;
use crate::config::RosterConfig;
use crate::data::{DAYS_PER_WEEK, ExtraStaffingDay, Schedule, Weekday, Worker, day_name};
use crate::patterns::PatternRotation;
use crate::staffing::cyclic_distance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCheck {
    pub week: usize,
    pub hours: u32,
    pub expected_hours: u32,
    pub expected_days_off: Vec<Weekday>,
    pub actual_days_off: Vec<Weekday>,
}

impl WeekCheck {
    pub fn hours_ok(&self) -> bool {
        self.hours == self.expected_hours
    }

    pub fn days_off_ok(&self) -> bool {
        let actual: HashSet<_> = self.actual_days_off.iter().collect();
        self.expected_days_off.iter().all(|d| actual.contains(d))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerReport {
    pub name: String,
    pub pattern: String,
    pub weeks: Vec<WeekCheck>,
}

/// A staffing rule broken by an assembled schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    DoubleShift { name: String, week: usize, day: Weekday },
    EarlyAfterLate { name: String, week: usize, day: Weekday },
    EarlyHeadcount { week: usize, day: Weekday, count: usize },
    LateHeadcount { week: usize, day: Weekday, count: usize, expected: u32 },
    AdjacentExtraDays { week: usize, day: Weekday, previous: Weekday },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DoubleShift { name, week, day } => write!(
                f,
                "{name} works both shifts on week {} {}",
                week + 1,
                day_name(*day)
            ),
            Violation::EarlyAfterLate { name, week, day } => write!(
                f,
                "{name} works the early shift on week {} {} right after a late shift",
                week + 1,
                day_name(*day)
            ),
            Violation::EarlyHeadcount { week, day, count } => write!(
                f,
                "week {} {}: {count} worker(s) on the early shift",
                week + 1,
                day_name(*day)
            ),
            Violation::LateHeadcount {
                week,
                day,
                count,
                expected,
            } => write!(
                f,
                "week {} {}: {count} worker(s) on the late shift, expected {expected}",
                week + 1,
                day_name(*day)
            ),
            Violation::AdjacentExtraDays {
                week,
                day,
                previous,
            } => write!(
                f,
                "week {} extra staffing on {} is adjacent to the previous {}",
                week + 1,
                day_name(*day),
                day_name(*previous)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub workers: Vec<WorkerReport>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
            && self
                .workers
                .iter()
                .flat_map(|w| &w.weeks)
                .all(|c| c.hours_ok() && c.days_off_ok())
    }
}

fn names_or_none(days: &[Weekday]) -> String {
    if days.is_empty() {
        "None".to_string()
    } else {
        days.iter().map(|&d| day_name(d)).join(", ")
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report:")?;
        for worker in &self.workers {
            writeln!(f, "\nWorker: {}", worker.name)?;
            writeln!(f, "  Days Off Pattern: {}", worker.pattern)?;
            for check in &worker.weeks {
                writeln!(f, "  Week {}:", check.week + 1)?;
                writeln!(f, "    Total Hours Worked: {} hours", check.hours)?;
                if check.hours_ok() {
                    writeln!(f, "    Total hours are correct.")?;
                } else {
                    writeln!(
                        f,
                        "    ERROR: Total hours not equal to {}!",
                        check.expected_hours
                    )?;
                }
                writeln!(
                    f,
                    "    Expected Days Off: {}",
                    names_or_none(&check.expected_days_off)
                )?;
                writeln!(
                    f,
                    "    Actual Days Off: {}",
                    names_or_none(&check.actual_days_off)
                )?;
                if check.days_off_ok() {
                    writeln!(f, "    Days off are correct.")?;
                } else {
                    writeln!(f, "    ERROR: Days off do not match the expected pattern!")?;
                }
            }
        }
        if self.violations.is_empty() {
            writeln!(f, "\nStaffing rules: all satisfied.")
        } else {
            writeln!(f, "\nStaffing rules:")?;
            for v in &self.violations {
                writeln!(f, "  ERROR: {v}")?;
            }
            Ok(())
        }
    }
}

pub struct Validator<'a> {
    config: &'a RosterConfig,
    rotation: &'a PatternRotation,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a RosterConfig, rotation: &'a PatternRotation) -> Self {
        Self { config, rotation }
    }

    pub fn report(
        &self,
        workers: &[Worker],
        roster: &AssembledRoster,
        extra_days: &[ExtraStaffingDay],
    ) -> ValidationReport {
        let workers = workers
            .iter()
            .map(|worker| {
                let tally = &roster.tallies[worker.index];
                let weeks = (0..self.config.weeks)
                    .map(|week| WeekCheck {
                        week,
                        hours: tally.hours[week],
                        expected_hours: self.config.weekly_hours(),
                        expected_days_off: self.rotation.for_week(worker, week).days_off.clone(),
                        actual_days_off: tally.days_off[week].clone(),
                    })
                    .collect();
                WorkerReport {
                    name: worker.name.clone(),
                    pattern: self.rotation.assigned(worker).description.clone(),
                    weeks,
                }
            })
            .collect();

        ValidationReport {
            workers,
            violations: audit(self.config, &roster.schedule, extra_days),
        }
    }
}

/// Extra-staffing days as a schedule records them: per week, the first day
/// whose late shift is over the base headcount.
pub fn recorded_extra_days(config: &RosterConfig, schedule: &Schedule) -> Vec<ExtraStaffingDay> {
    schedule
        .weeks()
        .filter_map(|(week, days)| {
            days.iter()
                .find(|(_, entry)| entry.shifts.late.len() as u32 > config.late_base)
                .map(|(&day, _)| ExtraStaffingDay { week, day })
        })
        .collect()
}

/// Checks the staffing rules that span workers or days: one shift per day,
/// no early after late, headcounts and extra-day spacing.
pub fn audit(
    config: &RosterConfig,
    schedule: &Schedule,
    extra_days: &[ExtraStaffingDay],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let days: Vec<_> = schedule
        .weeks()
        .flat_map(|(week, days)| days.iter().map(move |(&day, entry)| (week, day, entry)))
        .collect();

    for &(week, day, entry) in &days {
        let early: HashSet<&String> = entry.shifts.early.iter().collect();
        for name in entry.shifts.late.iter().filter(|n| early.contains(n)) {
            violations.push(Violation::DoubleShift {
                name: name.clone(),
                week,
                day,
            });
        }

        let count = entry.shifts.early.len();
        if !config.early_headcount().contains(&(count as u32)) {
            violations.push(Violation::EarlyHeadcount { week, day, count });
        }

        let expected = match extra_days.iter().find(|e| e.week == week) {
            Some(extra) => config.late_headcount(day, extra.day),
            None => config.late_base,
        };
        let count = entry.shifts.late.len();
        if count as u32 != expected {
            violations.push(Violation::LateHeadcount {
                week,
                day,
                count,
                expected,
            });
        }
    }

    for (&(w0, d0, today), &(w1, d1, tomorrow)) in days.iter().tuple_windows() {
        if w1 * DAYS_PER_WEEK + d1 != w0 * DAYS_PER_WEEK + d0 + 1 {
            continue;
        }
        let late: HashSet<&String> = today.shifts.late.iter().collect();
        for name in tomorrow.shifts.early.iter().filter(|n| late.contains(n)) {
            violations.push(Violation::EarlyAfterLate {
                name: name.clone(),
                week: w1,
                day: d1,
            });
        }
    }

    for (prev, next) in extra_days.iter().tuple_windows() {
        if next.week == prev.week + 1 && cyclic_distance(prev.day, next.day) < 2 {
            violations.push(Violation::AdjacentExtraDays {
                week: next.week,
                day: next.day,
                previous: prev.day,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::WorkerTally;
    use crate::data::{DayEntry, DayShifts};
    use chrono::NaiveDate;

    fn entry(early: &[&str], late: &[&str]) -> DayEntry {
        DayEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            shifts: DayShifts {
                early: early.iter().map(|s| s.to_string()).collect(),
                late: late.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn one_week(days: Vec<DayEntry>) -> Schedule {
        let mut schedule = Schedule::new();
        for (day, e) in days.into_iter().enumerate() {
            schedule.insert_day(0, day, e);
        }
        schedule
    }

    fn clean_week() -> Vec<DayEntry> {
        (0..7)
            .map(|day| {
                if day == 2 {
                    entry(&["A", "B"], &["C", "D"])
                } else {
                    entry(&["A", "B"], &["C"])
                }
            })
            .collect()
    }

    #[test]
    fn clean_schedule_has_no_violations() {
        let config = RosterConfig::default().with_weeks(1);
        let extra = [ExtraStaffingDay { week: 0, day: 2 }];
        assert!(audit(&config, &one_week(clean_week()), &extra).is_empty());
    }

    #[test]
    fn flags_double_shift_and_headcounts() {
        let config = RosterConfig::default().with_weeks(1);
        let mut days = clean_week();
        days[4] = entry(&["A"], &["A", "B"]);
        let violations = audit(&config, &one_week(days), &[ExtraStaffingDay { week: 0, day: 2 }]);
        assert!(violations.contains(&Violation::DoubleShift {
            name: "A".into(),
            week: 0,
            day: 4
        }));
        assert!(violations.contains(&Violation::EarlyHeadcount {
            week: 0,
            day: 4,
            count: 1
        }));
        assert!(violations.contains(&Violation::LateHeadcount {
            week: 0,
            day: 4,
            count: 2,
            expected: 1
        }));
    }

    #[test]
    fn flags_early_after_late_across_weeks() {
        let config = RosterConfig::default().with_weeks(2);
        let mut schedule = one_week(clean_week());
        for day in 0..7 {
            let e = if day == 0 {
                entry(&["C", "B"], &["A"])
            } else {
                entry(&["A", "B"], &["D"])
            };
            schedule.insert_day(1, day, e);
        }
        let extra = recorded_extra_days(&config, &schedule);
        assert_eq!(extra, vec![ExtraStaffingDay { week: 0, day: 2 }]);
        let violations = audit(&config, &schedule, &extra);
        // Friday late "C" -> Saturday early "C"
        assert!(violations.contains(&Violation::EarlyAfterLate {
            name: "C".into(),
            week: 1,
            day: 0
        }));
    }

    #[test]
    fn flags_adjacent_extra_days() {
        let config = RosterConfig::default().with_weeks(2);
        let extra = [
            ExtraStaffingDay { week: 0, day: 6 },
            ExtraStaffingDay { week: 1, day: 0 },
        ];
        let violations = audit(&config, &Schedule::new(), &extra);
        assert_eq!(
            violations,
            vec![Violation::AdjacentExtraDays {
                week: 1,
                day: 0,
                previous: 6
            }]
        );
    }

    #[test]
    fn extra_days_off_are_tolerated() {
        let config = RosterConfig::default().with_weeks(1);
        let rotation = PatternRotation::standard();
        let crew = Worker::crew(&["A"]);
        let roster = AssembledRoster {
            schedule: Schedule::new(),
            tallies: vec![WorkerTally {
                hours: vec![40],
                days_off: vec![vec![0, 3, 5]],
            }],
        };
        let report = Validator::new(&config, &rotation).report(&crew, &roster, &[]);
        let check = &report.workers[0].weeks[0];
        assert_eq!(check.expected_days_off, vec![0]);
        assert!(check.days_off_ok());
        assert!(check.hours_ok());
        assert!(report.is_clean());
    }

    #[test]
    fn narrative_marks_errors() {
        let config = RosterConfig::default().with_weeks(1);
        let rotation = PatternRotation::standard();
        let crew = Worker::crew(&["A"]);
        let roster = AssembledRoster {
            schedule: Schedule::new(),
            tallies: vec![WorkerTally {
                hours: vec![30],
                days_off: vec![vec![1, 2, 3]],
            }],
        };
        let report = Validator::new(&config, &rotation).report(&crew, &roster, &[]);
        assert!(!report.is_clean());
        let text = report.to_string();
        assert!(text.contains("Days Off Pattern: Saturday off"));
        assert!(text.contains("ERROR: Total hours not equal to 40!"));
        assert!(text.contains("ERROR: Days off do not match the expected pattern!"));
        assert!(text.contains("Actual Days Off: Sunday, Monday, Tuesday"));
    }
}
