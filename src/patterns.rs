//! Rotating days-off patterns.
//!
//! Four patterns form a cycle. A worker starts on the pattern picked by its
//! index and advances one pattern per week, so across four weeks every worker
//! sees every pattern once.

use crate::data::{DAYS_PER_WEEK, Weekday, Worker, day_name};
use crate::error::{Result, RosterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Offset into the cycle for workers that start on this pattern.
    pub base_week: usize,
    pub days_off: Vec<Weekday>,
    pub description: String,
}

impl Pattern {
    pub fn new<S: Into<String>>(base_week: usize, days_off: &[Weekday], description: S) -> Self {
        Self {
            base_week,
            days_off: days_off.to_vec(),
            description: description.into(),
        }
    }

    pub fn day_names(&self) -> Vec<&'static str> {
        self.days_off.iter().map(|&d| day_name(d)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRotation {
    patterns: Vec<Pattern>,
}

impl Default for PatternRotation {
    fn default() -> Self {
        Self::standard()
    }
}

impl PatternRotation {
    pub fn standard() -> Self {
        Self {
            patterns: vec![
                Pattern::new(0, &[0], "Saturday off"),
                Pattern::new(1, &[1], "Sunday off"),
                Pattern::new(2, &[], "Work both weekend days"),
                Pattern::new(3, &[6, 0, 1], "Friday-Sunday off"),
            ],
        }
    }

    /// Custom table; rejects an empty table and out-of-week day indices.
    pub fn new(patterns: Vec<Pattern>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(RosterError::InvalidPatterns("no patterns".into()));
        }
        if let Some(bad) = patterns
            .iter()
            .find(|p| p.days_off.iter().any(|&d| d >= DAYS_PER_WEEK))
        {
            return Err(RosterError::InvalidPatterns(format!(
                "pattern '{}' lists a day outside 0..{DAYS_PER_WEEK}",
                bad.description
            )));
        }
        Ok(Self { patterns })
    }

    /// The pattern a worker is assigned for the whole run.
    pub fn assigned(&self, worker: &Worker) -> &Pattern {
        &self.patterns[worker.index % self.patterns.len()]
    }

    /// The pattern a worker observes in `week`.
    pub fn for_week(&self, worker: &Worker, week: usize) -> &Pattern {
        let base = self.assigned(worker).base_week;
        &self.patterns[(base + week) % self.patterns.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crew() -> Vec<Worker> {
        Worker::crew(&Worker::default_names(8))
    }

    #[test]
    fn rotation_advances_one_pattern_per_week() {
        let rotation = PatternRotation::standard();
        let crew = crew();
        let worker = &crew[1];
        let seen: Vec<&str> = (0..4)
            .map(|w| rotation.for_week(worker, w).description.as_str())
            .collect();
        assert_eq!(
            seen,
            ["Sunday off", "Work both weekend days", "Friday-Sunday off", "Saturday off"]
        );
    }

    #[test]
    fn workers_wrap_around_the_table() {
        let rotation = PatternRotation::standard();
        let crew = crew();
        assert_eq!(rotation.assigned(&crew[5]), rotation.assigned(&crew[1]));
        assert_eq!(rotation.for_week(&crew[7], 0).days_off, vec![6, 0, 1]);
    }

    #[test]
    fn lookup_is_stable() {
        let rotation = PatternRotation::standard();
        let crew = crew();
        let first = rotation.for_week(&crew[3], 2).clone();
        let second = rotation.for_week(&crew[3], 2).clone();
        assert_eq!(first, second);
        assert_eq!(rotation, PatternRotation::standard());
    }

    #[test]
    fn day_names_follow_saturday_first_week() {
        let rotation = PatternRotation::standard();
        let crew = crew();
        assert_eq!(
            rotation.assigned(&crew[3]).day_names(),
            ["Friday", "Saturday", "Sunday"]
        );
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(
            PatternRotation::new(vec![]),
            Err(RosterError::InvalidPatterns(_))
        ));
        assert!(PatternRotation::new(vec![Pattern::new(0, &[7], "bad")]).is_err());
    }
}
