//! Error taxonomy for the scoring engine.
//!
//! Whole-call failures ([`AnalyzeError`]) abort before any scoring work.
//! Per-task problems ([`ValidationError`]) exclude a single task and are
//! reported alongside the results of the rest of the batch.

use thiserror::Error;

use crate::task::TaskId;

/// Failures that deny results for the whole call.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("unknown strategy '{0}' (expected one of: balanced, deadline, impact, fastest)")]
    InvalidStrategy(String),

    #[error("task batch is empty")]
    EmptyBatch,

    #[error("task store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// A malformed task. Several of these may be reported for the same task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("importance {0} is outside 1..=10")]
    ImportanceOutOfRange(i64),

    #[error("estimated_hours must be a positive number (got {0})")]
    NonPositiveHours(f64),

    #[error("due_date '{0}' is not a YYYY-MM-DD date")]
    InvalidDueDate(String),

    #[error("task {0} lists itself as a dependency")]
    SelfDependency(TaskId),

    #[error("malformed task: {0}")]
    Malformed(String),
}

/// Errors surfaced by a [`crate::graph::TaskResolver`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store data: {0}")]
    Corrupt(String),
}
