//! Explainer: deterministic text built only from numbers already computed.

use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;
use crate::subscores::{round2, EffortBand, Factor, FactorBreakdown};
use crate::warnings::join_ids;

/// Contributions closer than this are treated as a tie.
const TIE_EPSILON: f64 = 1e-9;

const HIGH_IMPORTANCE: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub summary: String,
    pub urgency_reason: String,
    pub importance_reason: String,
    pub effort_reason: String,
    pub dependency_reason: String,
    pub final_priority_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    /// One-line digest of notable factors.
    pub score_explanation: String,
    pub reason: Reason,
}

/// Build the explanation bundle. Every score quoted is rounded to two
/// decimals the same way the response fields are.
pub fn explain(breakdown: &FactorBreakdown, strategy: Strategy, priority: f64) -> Explanation {
    let priority = round2(priority);
    let leaders = dominant_factors(breakdown, strategy);

    Explanation {
        score_explanation: highlights(breakdown).join(", "),
        reason: Reason {
            summary: summary(&leaders, strategy, priority),
            urgency_reason: urgency_reason(breakdown),
            importance_reason: importance_reason(breakdown),
            effort_reason: effort_reason(breakdown),
            dependency_reason: dependency_reason(breakdown),
            final_priority_reason: final_reason(breakdown, &leaders, strategy, priority),
        },
    }
}

/// Factors with the largest weight x subscore contribution (several on a tie).
pub fn dominant_factors(breakdown: &FactorBreakdown, strategy: Strategy) -> Vec<(Factor, f64)> {
    let contributions = strategy.weights().contributions(&breakdown.subscores());
    let best = contributions
        .iter()
        .map(|(_, c)| *c)
        .fold(f64::NEG_INFINITY, f64::max);
    contributions
        .into_iter()
        .filter(|(_, c)| (best - c).abs() <= TIE_EPSILON)
        .collect()
}

fn highlights(b: &FactorBreakdown) -> Vec<String> {
    let mut parts = Vec::new();

    match b.urgency.days_until_due {
        None => parts.push("No due date".to_string()),
        Some(d) if d < 0 => parts.push("Overdue".to_string()),
        Some(d) if d <= 1 => parts.push("Due very soon".to_string()),
        Some(d) if d <= 3 => parts.push("Approaching deadline".to_string()),
        Some(_) => {}
    }

    if b.importance.importance >= HIGH_IMPORTANCE {
        parts.push("High importance".to_string());
    }

    match b.effort.band {
        EffortBand::QuickWin => parts.push("Quick task".to_string()),
        EffortBand::Large => parts.push("Large task".to_string()),
        EffortBand::Standard => {}
    }

    let facts = &b.dependency.facts;
    if facts.blocking_factor > 0 {
        parts.push(format!("Blocks {} task(s)", facts.blocking_factor));
    }
    if facts.unresolved_count > 0 {
        parts.push(format!("Waiting on {} dependency(ies)", facts.unresolved_count));
    }
    if facts.in_cycle {
        parts.push("Circular dependency".to_string());
    }

    if parts.is_empty() {
        parts.push("No special factors".to_string());
    }
    parts
}

fn urgency_reason(b: &FactorBreakdown) -> String {
    let score = round2(b.urgency.score);
    match b.urgency.days_until_due {
        None => format!("No due date set, so urgency stays at a low {score:.2}."),
        Some(d) if d < 0 => format!(
            "Overdue by {} day(s); urgency is pinned at {score:.2}.",
            d.abs()
        ),
        Some(0) => format!("Due today; urgency is {score:.2}."),
        Some(1) => format!("Due tomorrow; urgency is {score:.2}."),
        Some(d) => format!(
            "Due in {d} days; urgency decays to {score:.2} (halving every 7 days)."
        ),
    }
}

fn importance_reason(b: &FactorBreakdown) -> String {
    format!(
        "Importance rated {}/10, which scales to {:.2}.",
        b.importance.importance,
        round2(b.importance.score)
    )
}

fn effort_reason(b: &FactorBreakdown) -> String {
    let hours = b.effort.hours;
    let score = round2(b.effort.score);
    match b.effort.band {
        EffortBand::QuickWin => {
            format!("Estimated at {hours} hour(s): a quick win, effort score {score:.2}.")
        }
        EffortBand::Standard => {
            format!("Estimated at {hours} hour(s): no size adjustment, effort score {score:.2}.")
        }
        EffortBand::Large => {
            format!("Estimated at {hours} hour(s): large task penalty, effort score {score:.2}.")
        }
    }
}

fn dependency_reason(b: &FactorBreakdown) -> String {
    let facts = &b.dependency.facts;
    let mut text = format!(
        "Blocks {} downstream task(s) and waits on {} unresolved dependency(ies) \
         (prerequisite chain depth {}); dependency score {:.2}.",
        facts.blocking_factor,
        facts.unresolved_count,
        facts.depth,
        round2(b.dependency.score)
    );
    if !facts.missing.is_empty() {
        text.push_str(&format!(" Unknown dependency id(s): {}.", join_ids(&facts.missing)));
    }
    if facts.in_cycle {
        text.push_str(" Part of a circular dependency; edges inside the cycle are ignored.");
    }
    text
}

fn leader_names(leaders: &[(Factor, f64)]) -> String {
    let names: Vec<&str> = leaders.iter().map(|(f, _)| f.label()).collect();
    match names.as_slice() {
        [] => "no factor".to_string(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn summary(leaders: &[(Factor, f64)], strategy: Strategy, priority: f64) -> String {
    let names = leader_names(leaders);
    let verb = if leaders.len() > 1 { "lead" } else { "leads" };
    format!("{} {verb} with a priority score of {priority:.2} under the {strategy} strategy.", capitalize(&names))
}

fn final_reason(
    b: &FactorBreakdown,
    leaders: &[(Factor, f64)],
    strategy: Strategy,
    priority: f64,
) -> String {
    let w = strategy.weights();
    let s = b.subscores().rounded();
    let share = leaders.first().map(|(_, c)| *c).unwrap_or(0.0);
    let tie = if leaders.len() > 1 { " each" } else { "" };
    format!(
        "The {strategy} strategy weighs urgency {:.2} x {:.2}, importance {:.2} x {:.2}, \
         effort {:.2} x {:.2} and dependency {:.2} x {:.2} for a total of {priority:.2}; \
         {} contributed the most ({share:.2}{tie}).",
        w.urgency,
        s.urgency,
        w.importance,
        s.importance,
        w.effort,
        s.effort,
        w.dependency,
        s.dependency,
        leader_names(leaders),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyFacts;
    use crate::task::Task;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn breakdown(task: &Task, facts: DependencyFacts) -> FactorBreakdown {
        FactorBreakdown::compute(task, &facts, today())
    }

    #[test]
    fn quick_important_task_due_today() {
        let task = Task::new(1, "Ship fix").with_importance(9).with_hours(1.0).with_due_date(today());
        let b = breakdown(&task, DependencyFacts::default());
        let priority = Strategy::Fastest.weights().combine(&b.subscores());
        let e = explain(&b, Strategy::Fastest, priority);

        assert_eq!(e.score_explanation, "Due very soon, High importance, Quick task");
        assert_eq!(e.reason.urgency_reason, "Due today; urgency is 95.00.");
        assert!(e.reason.effort_reason.contains("quick win"));
        assert!(e.reason.final_priority_reason.contains("fastest"));
        assert!(e.reason.final_priority_reason.contains("effort contributed the most (54.00)"));
        assert_eq!(
            e.reason.summary,
            "Effort leads with a priority score of 84.50 under the fastest strategy."
        );
    }

    #[test]
    fn overdue_and_dependency_details_are_quoted() {
        let task = Task::new(2, "Late").with_due_date(today() - chrono::Duration::days(4));
        let facts = DependencyFacts {
            unresolved_count: 1,
            blocking_factor: 2,
            depth: 1,
            missing: vec![9999],
            ..DependencyFacts::default()
        };
        let b = breakdown(&task, facts);
        let e = explain(&b, Strategy::Balanced, 60.0);

        assert_eq!(e.reason.urgency_reason, "Overdue by 4 day(s); urgency is pinned at 100.00.");
        assert!(e.reason.dependency_reason.starts_with("Blocks 2 downstream task(s) and waits on 1"));
        assert!(e.reason.dependency_reason.contains("Unknown dependency id(s): 9999."));
        assert!(e.score_explanation.starts_with("Overdue"));
        assert!(e.score_explanation.contains("Blocks 2 task(s)"));
    }

    #[test]
    fn ties_name_every_leader() {
        // importance 10 (100) and urgency overdue (100) tie under balanced.
        let task = Task::new(3, "Tie")
            .with_importance(10)
            .with_hours(4.0)
            .with_due_date(today() - chrono::Duration::days(1));
        let b = breakdown(&task, DependencyFacts::default());
        let leaders = dominant_factors(&b, Strategy::Balanced);
        assert_eq!(
            leaders.iter().map(|(f, _)| *f).collect::<Vec<_>>(),
            vec![Factor::Urgency, Factor::Importance]
        );
        let e = explain(&b, Strategy::Balanced, 80.0);
        assert!(e.reason.summary.starts_with("Urgency and importance lead"));
    }

    #[test]
    fn plain_task_has_no_special_factors() {
        let task = Task::new(4, "Plain").with_hours(4.0).with_due_date(today() + chrono::Duration::days(20));
        let b = breakdown(&task, DependencyFacts::default());
        let e = explain(&b, Strategy::Balanced, 40.0);
        assert_eq!(e.score_explanation, "No special factors");
        assert!(e.reason.urgency_reason.starts_with("Due in 20 days"));
    }
}
