//! Task model: the lenient wire shape callers submit and the validated form
//! the engine scores.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::time::parse_due_date;

/// Stable identifier of a stored task.
pub type TaskId = u64;

pub const DEFAULT_IMPORTANCE: i64 = 5;
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

/// A task as submitted by a caller.
///
/// Every field except `dependencies` is optional on the wire, and each entry
/// decodes on its own: a wrong-typed field marks just that entry as
/// `malformed` instead of failing to decode the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskInput {
    pub id: Option<TaskId>,
    pub title: Option<String>,
    /// `YYYY-MM-DD`; empty string means no due date.
    pub due_date: Option<String>,
    pub importance: Option<i64>,
    pub estimated_hours: Option<f64>,
    pub dependencies: Vec<TaskId>,
    pub completed: Option<bool>,
    /// Decode failure for this entry; validation rejects it with this reason.
    #[serde(skip)]
    pub malformed: Option<String>,
}

/// Strict field layout, tried against each submitted entry.
#[derive(Deserialize)]
#[serde(expecting = "a task object")]
struct WireTask {
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    importance: Option<i64>,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default)]
    dependencies: Vec<TaskId>,
    #[serde(default)]
    completed: Option<bool>,
}

impl From<WireTask> for TaskInput {
    fn from(w: WireTask) -> Self {
        Self {
            id: w.id,
            title: w.title,
            due_date: w.due_date,
            importance: w.importance,
            estimated_hours: w.estimated_hours,
            dependencies: w.dependencies,
            completed: w.completed,
            malformed: None,
        }
    }
}

impl<'de> Deserialize<'de> for TaskInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl TaskInput {
    /// Decode one submitted entry. Never fails: an entry that does not fit
    /// the task layout keeps whatever `id`/`title` it had and is marked
    /// malformed.
    pub fn from_value(value: Value) -> Self {
        let id = value.get("id").and_then(Value::as_u64);
        let title = value.get("title").and_then(Value::as_str).map(str::to_string);
        match serde_json::from_value::<WireTask>(value) {
            Ok(wire) => wire.into(),
            Err(e) => Self {
                id,
                title,
                malformed: Some(e.to_string()),
                ..Self::default()
            },
        }
    }

    /// Check required fields and bounds, collecting every problem found.
    pub fn validate(&self) -> Result<Task, Vec<ValidationError>> {
        if let Some(reason) = &self.malformed {
            return Err(vec![ValidationError::Malformed(reason.clone())]);
        }

        let mut errors = Vec::new();

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if title.is_none() {
            errors.push(ValidationError::MissingTitle);
        }

        let importance = self.importance.unwrap_or(DEFAULT_IMPORTANCE);
        if !(1..=10).contains(&importance) {
            errors.push(ValidationError::ImportanceOutOfRange(importance));
        }

        let hours = self.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS);
        if !hours.is_finite() || hours <= 0.0 {
            errors.push(ValidationError::NonPositiveHours(hours));
        }

        let due_date = match self.due_date.as_deref() {
            None => None,
            Some(raw) => match parse_due_date(raw) {
                Ok(d) => d,
                Err(_) => {
                    errors.push(ValidationError::InvalidDueDate(raw.to_string()));
                    None
                }
            },
        };

        if let Some(id) = self.id {
            if self.dependencies.contains(&id) {
                errors.push(ValidationError::SelfDependency(id));
            }
        }

        match title {
            Some(title) if errors.is_empty() => Ok(Task {
                id: self.id,
                title: title.to_string(),
                due_date,
                estimated_hours: hours,
                importance: importance as u8,
                dependencies: self.dependencies.iter().copied().collect(),
                completed: self.completed.unwrap_or(false),
            }),
            _ => Err(errors),
        }
    }
}

/// A validated task.
///
/// Invariants: `importance` in 1..=10, `estimated_hours` > 0, and
/// `dependencies` never contains `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: f64,
    pub importance: u8,
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
    /// Done tasks no longer hold back their dependents.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::unsaved(title)
        }
    }

    /// A task that has not been stored yet and so has no id.
    pub fn unsaved(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            due_date: None,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            importance: DEFAULT_IMPORTANCE as u8,
            dependencies: BTreeSet::new(),
            completed: false,
        }
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: Some(task.title.clone()),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            importance: Some(i64::from(task.importance)),
            estimated_hours: Some(task.estimated_hours),
            dependencies: task.dependencies.iter().copied().collect(),
            completed: Some(task.completed),
            malformed: None,
        }
    }
}
