use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid input {path}: {reason}")]
    Input { path: PathBuf, reason: String },
    #[error("invalid pattern table: {0}")]
    InvalidPatterns(String),
    #[error("no candidate day left for extra staffing in week {week}")]
    SelectorExhausted { week: usize },
    #[error("solver failure: {0}")]
    Solver(String),
    #[error("date out of range: {0}")]
    Date(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    pub fn input<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's data rather than the run itself.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::InvalidPatterns(_))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
