//! Plain-text rendering for terminal output.

use taskrank_core::{AnalyzeResponse, ScoreResult, Task, TaskId};

fn id_cell(id: Option<TaskId>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn warning_codes(r: &ScoreResult) -> String {
    r.warnings
        .iter()
        .map(|w| w.code.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render_ranking(resp: &AnalyzeResponse) -> String {
    let mut out = format!("Strategy: {}\n\n", resp.strategy);
    out.push_str(&format!(
        "{:>4} {:>7} {:>6}  {:<32} {:>6} {:>6} {:>6} {:>6}  {}\n",
        "#", "score", "id", "title", "urg", "imp", "eff", "dep", "warnings"
    ));
    for (rank, r) in resp.tasks.iter().enumerate() {
        out.push_str(&format!(
            "{:>4} {:>7.2} {:>6}  {:<32} {:>6.1} {:>6.1} {:>6.1} {:>6.1}  {}\n",
            rank + 1,
            r.priority_score,
            id_cell(r.id),
            truncate(&r.title, 32),
            r.subscores.urgency,
            r.subscores.importance,
            r.subscores.effort,
            r.subscores.dependency,
            warning_codes(r),
        ));
        out.push_str(&format!("{:>20}{}\n", "", r.score_explanation));
    }
    if !resp.batch_warnings.is_empty() {
        out.push_str("\nBatch warnings:\n");
        for w in &resp.batch_warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }
    out
}

pub fn render_tasks(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.\n".to_string();
    }
    let mut out = format!(
        "{:>6}  {:<10} {:>3} {:>6}  {:<4} {:<12} {}\n",
        "id", "due", "imp", "hours", "done", "deps", "title"
    );
    for t in tasks {
        let deps = t
            .dependencies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "{:>6}  {:<10} {:>3} {:>6.2}  {:<4} {:<12} {}\n",
            id_cell(t.id),
            t.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            t.importance,
            t.estimated_hours,
            if t.completed { "yes" } else { "" },
            truncate(&deps, 12),
            t.title,
        ));
    }
    out
}
