use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::validate::ValidationReport;

// Type aliases for clarity
pub type WorkerIndex = usize;
/// Absolute day in the horizon, `week * DAYS_PER_WEEK + weekday`.
pub type DayIndex = usize;
/// Day within a week, 0 = Saturday.
pub type Weekday = usize;

pub const DAYS_PER_WEEK: usize = 7;

/// Crew size when no worker list is given.
pub const DEFAULT_CREW_SIZE: usize = 8;

pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Saturday",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday % DAYS_PER_WEEK]
}

/// A crew member. The index fixes the rotation pattern for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub index: WorkerIndex,
    pub name: String,
}

impl Worker {
    pub fn crew<S: AsRef<str>>(names: &[S]) -> Vec<Worker> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Worker {
                index,
                name: name.as_ref().to_owned(),
            })
            .collect()
    }

    /// `Worker1`..`WorkerN`, used when no worker list is supplied.
    pub fn default_names(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("Worker{i}")).collect()
    }
}

pub const EARLY_LABEL: &str = "7am-5pm";
pub const LATE_LABEL: &str = "12pm-10pm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftKind {
    Early,
    Late,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Early, ShiftKind::Late];

    pub fn label(self) -> &'static str {
        match self {
            ShiftKind::Early => EARLY_LABEL,
            ShiftKind::Late => LATE_LABEL,
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key of one boolean decision: does `worker` work `shift` on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShiftKey {
    pub worker: WorkerIndex,
    pub day: DayIndex,
    pub shift: ShiftKind,
}

impl ShiftKey {
    pub fn new(worker: WorkerIndex, day: DayIndex, shift: ShiftKind) -> Self {
        Self { worker, day, shift }
    }
}

/// The week's day that gets two workers on the late shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtraStaffingDay {
    pub week: usize,
    pub day: Weekday,
}

impl fmt::Display for ExtraStaffingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Week {}: {} (Day {})", self.week + 1, day_name(self.day), self.day)
    }
}

/// Rosters of both shifts on one day, in worker order. Keys must stay in
/// step with [`EARLY_LABEL`] and [`LATE_LABEL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShifts {
    #[serde(rename = "7am-5pm", default)]
    pub early: Vec<String>,
    #[serde(rename = "12pm-10pm", default)]
    pub late: Vec<String>,
}

impl DayShifts {
    pub fn roster(&self, shift: ShiftKind) -> &[String] {
        match shift {
            ShiftKind::Early => &self.early,
            ShiftKind::Late => &self.late,
        }
    }

    pub fn roster_mut(&mut self, shift: ShiftKind) -> &mut Vec<String> {
        match shift {
            ShiftKind::Early => &mut self.early,
            ShiftKind::Late => &mut self.late,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub shifts: DayShifts,
}

pub type WeekSchedule = BTreeMap<Weekday, DayEntry>;

/// week -> weekday -> day entry. Serialized with stringified integer keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(pub BTreeMap<usize, WeekSchedule>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_day(&mut self, week: usize, day: Weekday, entry: DayEntry) {
        self.0.entry(week).or_default().insert(day, entry);
    }

    pub fn day(&self, week: usize, day: Weekday) -> Option<&DayEntry> {
        self.0.get(&week).and_then(|w| w.get(&day))
    }

    pub fn weeks(&self) -> impl Iterator<Item = (usize, &WeekSchedule)> {
        self.0.iter().map(|(week, days)| (*week, days))
    }

    /// Highest-numbered week present, with its days.
    pub fn last_week(&self) -> Option<(usize, &WeekSchedule)> {
        self.0.iter().next_back().map(|(week, days)| (*week, days))
    }
}

/// Body of `POST /v1/roster/generate`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRequest {
    #[serde(default)]
    pub workers: Option<Vec<String>>,
    #[serde(default)]
    pub previous: Option<Schedule>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub weeks: Option<usize>,
    #[serde(default)]
    pub time_limit: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub schedule: Schedule,
    pub extra_staffing_days: Vec<ExtraStaffingDay>,
    pub report: ValidationReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_keys_match_shift_labels() {
        let raw = serde_json::to_value(DayShifts::default()).unwrap();
        let mut keys: Vec<&str> = raw.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        let mut labels: Vec<&str> = ShiftKind::ALL.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        assert_eq!(keys, labels);
    }
}
