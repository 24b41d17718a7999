//! taskrank-core: dependency-aware task prioritization engine.
//!
//! Given a batch of tasks and a strategy name, [`Ranker::analyze`] returns a
//! ranked list with per-factor subscores, explanations and warnings. The
//! engine is pure: the only outside input is the read-only [`TaskResolver`]
//! and the explicit `today` date.

pub mod error;
pub mod explain;
pub mod graph;
pub mod ranker;
pub mod strategy;
pub mod subscores;
pub mod task;
pub mod time;
pub mod warnings;

pub use error::{AnalyzeError, StoreError, ValidationError};
pub use explain::{explain, Explanation, Reason};
pub use graph::{DependencyFacts, NoStore, NodeOrigin, TaskGraph, TaskResolver};
pub use ranker::{analyze, AnalyzeRequest, AnalyzeResponse, Ranker, Rejection, ScoreResult};
pub use strategy::{Strategy, Weights};
pub use subscores::{
    DependencyScore, EffortBand, EffortScore, Factor, FactorBreakdown, ImportanceScore, Subscores,
    UrgencyScore,
};
pub use task::{Task, TaskId, TaskInput};
pub use time::{days_until, local_today, parse_due_date};
pub use warnings::{Warning, WarningCode};
