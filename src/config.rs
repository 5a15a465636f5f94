use std::ops::RangeInclusive;

use crate::data::DAYS_PER_WEEK;

/// Longest run accepted from the CLI or HTTP surface.
pub const MAX_WEEKS: usize = 52;

/// Staffing policy. Defaults are the four-week, 40-hour rota.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterConfig {
    pub weeks: usize,
    pub shift_hours: u32,
    pub shifts_per_week: u32,
    pub early_min: u32,
    pub early_max: u32,
    pub late_base: u32,
    pub late_extra: u32,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            weeks: 4,
            shift_hours: 10,
            shifts_per_week: 4,
            early_min: 2,
            early_max: 5,
            late_base: 1,
            late_extra: 2,
        }
    }
}

impl RosterConfig {
    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn total_days(&self) -> usize {
        self.weeks * DAYS_PER_WEEK
    }

    pub fn weekly_hours(&self) -> u32 {
        self.shift_hours * self.shifts_per_week
    }

    pub fn early_headcount(&self) -> RangeInclusive<u32> {
        self.early_min..=self.early_max
    }

    /// Late-shift headcount for a weekday given the week's extra-staffing day.
    pub fn late_headcount(&self, weekday: usize, extra_day: usize) -> u32 {
        if weekday == extra_day {
            self.late_extra
        } else {
            self.late_base
        }
    }
}

/// Knobs handed to the constraint solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Seeds the run RNG; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Wall-clock limit in seconds.
    pub time_limit: Option<f64>,
    pub threads: i32,
    pub solver_log: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            seed: None,
            time_limit: None,
            threads: 1, // reproducible runs
            solver_log: false,
        }
    }
}

impl SolveOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_forty_hours() {
        let config = RosterConfig::default();
        assert_eq!(config.weekly_hours(), 40);
        assert_eq!(config.total_days(), 28);
        assert_eq!(config.early_headcount(), 2..=5);
    }

    #[test]
    fn late_headcount_doubles_on_extra_day() {
        let config = RosterConfig::default();
        assert_eq!(config.late_headcount(3, 3), 2);
        assert_eq!(config.late_headcount(4, 3), 1);
    }
}
