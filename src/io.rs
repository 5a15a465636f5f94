use log::debug;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::MAX_WEEKS;
use crate::data::{DAYS_PER_WEEK, Schedule};
use crate::error::{Result, RosterError};

/// Input files sorted by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFiles {
    pub workers: Option<PathBuf>,
    pub previous: Option<PathBuf>,
}

/// `*workers.json` is the worker list, any other `*.json` a previous schedule.
pub fn classify_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<InputFiles> {
    let mut files = InputFiles::default();
    for path in paths {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        if name.ends_with("workers.json") {
            files.workers = Some(path.to_path_buf());
        } else if name.ends_with(".json") {
            files.previous = Some(path.to_path_buf());
        } else {
            return Err(RosterError::input(path, "expected a .json file"));
        }
    }
    Ok(files)
}

/// Names must be non-blank and unique.
pub fn check_worker_names(source: &Path, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(RosterError::input(source, "worker list is empty"));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(RosterError::input(source, "blank worker name"));
        }
        if !seen.insert(name.as_str()) {
            return Err(RosterError::input(source, format!("duplicate worker name {name:?}")));
        }
    }
    Ok(())
}

/// Run length must be between one week and [`MAX_WEEKS`].
pub fn check_weeks(source: &Path, weeks: usize) -> Result<()> {
    if weeks == 0 || weeks > MAX_WEEKS {
        return Err(RosterError::input(
            source,
            format!("weeks must be within 1..={MAX_WEEKS}, got {weeks}"),
        ));
    }
    Ok(())
}

/// Day keys must fall within the week.
pub fn check_schedule_shape(source: &Path, schedule: &Schedule) -> Result<()> {
    for (week, days) in schedule.weeks() {
        if let Some(day) = days.keys().find(|&&d| d >= DAYS_PER_WEEK) {
            return Err(RosterError::input(
                source,
                format!("week {week} has day {day} outside 0..{DAYS_PER_WEEK}"),
            ));
        }
    }
    Ok(())
}

pub fn load_workers<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let names: Vec<String> = serde_json::from_slice(&data)
        .map_err(|e| RosterError::input(path, format!("not a list of names: {e}")))?;
    check_worker_names(path, &names)?;
    debug!("Loaded {} workers from {}", names.len(), path.display());
    Ok(names)
}

pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let schedule: Schedule = serde_json::from_slice(&data)
        .map_err(|e| RosterError::input(path, format!("not a schedule: {e}")))?;
    check_schedule_shape(path, &schedule)?;
    debug!("Loaded {} weeks from {}", schedule.weeks().count(), path.display());
    Ok(schedule)
}

/// Writes through a temp file in the target directory, then renames.
pub fn save_schedule<P: AsRef<Path>>(path: P, schedule: &Schedule) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(schedule)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| RosterError::Io(e.error))?;
    Ok(())
}
