#![forbid(unsafe_code)]
//! Four-week, two-shift roster generation.
//!
//! Staffing policy (weekly hours, rotating days off, shift adjacency and
//! headcounts) is encoded as a binary model, solved with HiGHS, then
//! assembled into a per-day schedule and validated.

pub mod assemble;
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod patterns;
pub mod pipeline;
pub mod server;
pub mod solver;
pub mod staffing;
pub mod validate;

pub use config::{RosterConfig, SolveOptions};
pub use data::{DayEntry, DayShifts, ExtraStaffingDay, Schedule, ShiftKind, Worker};
pub use error::RosterError;
pub use pipeline::{GeneratedRoster, RosterOutcome, RosterPlan, generate, run};
pub use solver::{Assignment, ConstraintSolver, HighsSolver, SolveOutcome};
