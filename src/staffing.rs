//! Picks the weekly day that gets a second worker on the late shift.

use itertools::Itertools;
use log::{debug, info};
use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::data::{DAYS_PER_WEEK, ExtraStaffingDay, Schedule, Weekday};
use crate::error::{Result, RosterError};

/// Days too close to `prev` to be picked next: the day itself and its
/// neighbours, wrapping around the week.
pub fn excluded_days(prev: Weekday) -> [Weekday; 3] {
    [
        prev,
        (prev + DAYS_PER_WEEK - 1) % DAYS_PER_WEEK,
        (prev + 1) % DAYS_PER_WEEK,
    ]
}

/// Distance between two weekdays going the short way round.
pub fn cyclic_distance(a: Weekday, b: Weekday) -> usize {
    let d = a.abs_diff(b) % DAYS_PER_WEEK;
    d.min(DAYS_PER_WEEK - d)
}

/// Previous run's last extra-staffing day: the first day of its last week
/// whose late shift has exactly two names.
pub fn previous_extra_day(previous: &Schedule) -> Option<Weekday> {
    let (week, days) = previous.last_week()?;
    let found = days
        .iter()
        .find(|(_, entry)| entry.shifts.late.len() == 2)
        .map(|(day, _)| *day);
    debug!("previous schedule week {week}: extra staffing day {found:?}");
    found
}

pub struct ExtraStaffingSelector {
    weeks: usize,
    seed_day: Option<Weekday>,
}

impl ExtraStaffingSelector {
    pub fn new(weeks: usize) -> Self {
        Self {
            weeks,
            seed_day: None,
        }
    }

    /// Week 0 must also keep its distance from this day.
    pub fn with_seed_day(mut self, seed_day: Option<Weekday>) -> Self {
        self.seed_day = seed_day;
        self
    }

    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<ExtraStaffingDay>> {
        let mut picks = Vec::with_capacity(self.weeks);
        let mut prev = self.seed_day;

        for week in 0..self.weeks {
            let candidates: Vec<Weekday> = match prev {
                Some(p) => {
                    let excluded = excluded_days(p);
                    (0..DAYS_PER_WEEK).filter(|d| !excluded.contains(d)).collect()
                }
                None => (0..DAYS_PER_WEEK).collect(),
            };
            let day = *candidates
                .choose(rng)
                .ok_or(RosterError::SelectorExhausted { week })?;
            debug!(
                "week {week}: extra staffing day {day} picked from [{}]",
                candidates.iter().join(", ")
            );
            picks.push(ExtraStaffingDay { week, day });
            prev = Some(day);
        }

        info!(
            "Extra staffing days: {}",
            picks.iter().map(|p| p.day).join(", ")
        );
        Ok(picks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayEntry, DayShifts};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn day_with_late(late: &[&str]) -> DayEntry {
        DayEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            shifts: DayShifts {
                early: vec!["A".into(), "B".into()],
                late: late.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn exclusion_wraps_around_the_week() {
        assert_eq!(excluded_days(0), [0, 6, 1]);
        assert_eq!(excluded_days(6), [6, 5, 0]);
    }

    #[test]
    fn cyclic_distance_is_symmetric() {
        assert_eq!(cyclic_distance(0, 6), 1);
        assert_eq!(cyclic_distance(6, 0), 1);
        assert_eq!(cyclic_distance(1, 4), 3);
        assert_eq!(cyclic_distance(2, 2), 0);
    }

    #[test]
    fn consecutive_weeks_keep_their_distance() {
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let picks = ExtraStaffingSelector::new(4).select(&mut rng).unwrap();
            assert_eq!(picks.len(), 4);
            for (a, b) in picks.iter().tuple_windows() {
                assert_eq!(b.week, a.week + 1);
                assert!(cyclic_distance(a.day, b.day) >= 2, "{a:?} -> {b:?}");
            }
        }
    }

    #[test]
    fn seed_day_constrains_week_zero() {
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let picks = ExtraStaffingSelector::new(1)
                .with_seed_day(Some(3))
                .select(&mut rng)
                .unwrap();
            assert!(![2, 3, 4].contains(&picks[0].day));
        }
    }

    #[test]
    fn same_seed_same_picks() {
        let a = ExtraStaffingSelector::new(4)
            .select(&mut SmallRng::seed_from_u64(7))
            .unwrap();
        let b = ExtraStaffingSelector::new(4)
            .select(&mut SmallRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn extracts_seed_from_last_week() {
        let mut previous = Schedule::new();
        previous.insert_day(0, 5, day_with_late(&["A", "B"]));
        for day in 0..7 {
            let late: &[&str] = if day == 3 { &["C", "D"] } else { &["C"] };
            previous.insert_day(1, day, day_with_late(late));
        }
        assert_eq!(previous_extra_day(&previous), Some(3));
    }

    #[test]
    fn no_double_late_means_no_seed() {
        let mut previous = Schedule::new();
        previous.insert_day(0, 0, day_with_late(&["A"]));
        assert_eq!(previous_extra_day(&previous), None);
        assert_eq!(previous_extra_day(&Schedule::new()), None);
    }
}
