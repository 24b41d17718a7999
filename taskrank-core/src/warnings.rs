//! Per-task warning codes attached to a score result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningCode {
    CircularDependency,
    UnresolvedDependency,
    DuplicateId,
    Overdue,
    MissingDueDate,
}

impl WarningCode {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::CircularDependency => "circular-dependency",
            WarningCode::UnresolvedDependency => "unresolved-dependency",
            WarningCode::DuplicateId => "duplicate-id",
            WarningCode::Overdue => "overdue",
            WarningCode::MissingDueDate => "missing-due-date",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
}

impl Warning {
    pub fn circular(peers: &[TaskId]) -> Self {
        let message = if peers.is_empty() {
            "part of a dependency cycle; cycle edges ignored for scoring".to_string()
        } else {
            format!(
                "part of a dependency cycle with task(s) {}; cycle edges ignored for scoring",
                join_ids(peers)
            )
        };
        Self {
            code: WarningCode::CircularDependency,
            message,
        }
    }

    pub fn unresolved(dependency: TaskId) -> Self {
        Self {
            code: WarningCode::UnresolvedDependency,
            message: format!("dependency {dependency} was not found in the batch or the task store"),
        }
    }

    pub fn duplicate(id: TaskId) -> Self {
        Self {
            code: WarningCode::DuplicateId,
            message: format!("id {id} appears earlier in the batch; dependents resolve to the first occurrence"),
        }
    }

    pub fn overdue(days: i64) -> Self {
        Self {
            code: WarningCode::Overdue,
            message: format!("overdue by {} day(s)", days.abs()),
        }
    }

    pub fn missing_due_date() -> Self {
        Self {
            code: WarningCode::MissingDueDate,
            message: "no due date; urgency uses a low fixed value".to_string(),
        }
    }
}

pub(crate) fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
