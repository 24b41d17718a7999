//! Per-factor subscore calculators.
//!
//! Each calculator is a pure function returning a 0-100 score together with
//! the raw facts it used, so the explainer can quote the same numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyFacts;
use crate::task::Task;
use crate::time::days_until;

pub const URGENCY_OVERDUE: f64 = 100.0;
pub const URGENCY_IMMINENT: f64 = 95.0;
pub const URGENCY_NO_DUE_DATE: f64 = 10.0;
pub const URGENCY_FLOOR: f64 = 5.0;
/// Days for the urgency score to halve.
pub const URGENCY_HALF_LIFE_DAYS: f64 = 7.0;

pub const EFFORT_BASE: f64 = 50.0;
pub const QUICK_WIN_HOURS: f64 = 2.0;
pub const QUICK_WIN_BONUS: f64 = 40.0;
pub const LARGE_TASK_HOURS: f64 = 8.0;
pub const LARGE_TASK_PENALTY: f64 = 20.0;

pub const DEPENDENCY_BASE: f64 = 50.0;
pub const BLOCKING_WEIGHT: f64 = 10.0;
pub const UNRESOLVED_WEIGHT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Urgency,
    Importance,
    Effort,
    Dependency,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::Urgency,
        Factor::Importance,
        Factor::Effort,
        Factor::Dependency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Factor::Urgency => "urgency",
            Factor::Importance => "importance",
            Factor::Effort => "effort",
            Factor::Dependency => "dependency",
        }
    }
}

/// The four normalized subscores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Subscores {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Subscores {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Urgency => self.urgency,
            Factor::Importance => self.importance,
            Factor::Effort => self.effort,
            Factor::Dependency => self.dependency,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            urgency: round2(self.urgency),
            importance: round2(self.importance),
            effort: round2(self.effort),
            dependency: round2(self.dependency),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyScore {
    pub score: f64,
    /// Signed days until due; `None` when the task has no due date.
    pub days_until_due: Option<i64>,
}

impl UrgencyScore {
    pub fn is_overdue(&self) -> bool {
        matches!(self.days_until_due, Some(d) if d < 0)
    }
}

pub fn urgency(due: Option<NaiveDate>, today: NaiveDate) -> UrgencyScore {
    let Some(due) = due else {
        return UrgencyScore {
            score: URGENCY_NO_DUE_DATE,
            days_until_due: None,
        };
    };

    let days = days_until(due, today);
    let score = match days {
        d if d < 0 => URGENCY_OVERDUE,
        0 | 1 => URGENCY_IMMINENT,
        d => (100.0 * 2f64.powf(-(d as f64) / URGENCY_HALF_LIFE_DAYS)).max(URGENCY_FLOOR),
    };

    UrgencyScore {
        score,
        days_until_due: Some(days),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceScore {
    pub score: f64,
    pub importance: u8,
}

pub fn importance(rating: u8) -> ImportanceScore {
    ImportanceScore {
        score: (f64::from(rating) * 10.0).clamp(0.0, 100.0),
        importance: rating,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortBand {
    /// At most two hours.
    QuickWin,
    Standard,
    /// More than eight hours.
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortScore {
    pub score: f64,
    pub hours: f64,
    pub band: EffortBand,
}

pub fn effort(hours: f64) -> EffortScore {
    let band = if hours <= QUICK_WIN_HOURS {
        EffortBand::QuickWin
    } else if hours > LARGE_TASK_HOURS {
        EffortBand::Large
    } else {
        EffortBand::Standard
    };

    let adjustment = match band {
        EffortBand::QuickWin => QUICK_WIN_BONUS,
        EffortBand::Standard => 0.0,
        EffortBand::Large => -LARGE_TASK_PENALTY,
    };

    EffortScore {
        score: (EFFORT_BASE + adjustment).clamp(0.0, 100.0),
        hours,
        band,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyScore {
    pub score: f64,
    pub facts: DependencyFacts,
}

pub fn dependency(facts: &DependencyFacts) -> DependencyScore {
    let raw = DEPENDENCY_BASE + BLOCKING_WEIGHT * facts.blocking_factor as f64
        - UNRESOLVED_WEIGHT * facts.unresolved_count as f64;
    DependencyScore {
        score: raw.clamp(0.0, 100.0),
        facts: facts.clone(),
    }
}

/// All four calculators applied to one task.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorBreakdown {
    pub urgency: UrgencyScore,
    pub importance: ImportanceScore,
    pub effort: EffortScore,
    pub dependency: DependencyScore,
}

impl FactorBreakdown {
    pub fn compute(task: &Task, facts: &DependencyFacts, today: NaiveDate) -> Self {
        Self {
            urgency: urgency(task.due_date, today),
            importance: importance(task.importance),
            effort: effort(task.estimated_hours),
            dependency: dependency(facts),
        }
    }

    pub fn subscores(&self) -> Subscores {
        Subscores {
            urgency: self.urgency.score,
            importance: self.importance.score,
            effort: self.effort.score,
            dependency: self.dependency.score,
        }
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
