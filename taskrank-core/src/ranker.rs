//! Ranker: validates a batch, builds the task graph, scores every task under
//! a strategy, and returns results in a deterministic order.
//!
//! Stages: validating -> graph-building -> scoring -> sorting -> done.
//! Whole-call errors (unknown strategy, empty batch, store down) fail before
//! any scoring work; per-task problems only ever touch that task.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AnalyzeError;
use crate::explain::{explain, Reason};
use crate::graph::{TaskGraph, TaskResolver};
use crate::strategy::Strategy;
use crate::subscores::{round2, FactorBreakdown, Subscores};
use crate::task::{Task, TaskId, TaskInput};
use crate::warnings::Warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    GraphBuilding,
    Scoring,
    Sorting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Validating => "validating",
            Stage::GraphBuilding => "graph-building",
            Stage::Scoring => "scoring",
            Stage::Sorting => "sorting",
            Stage::Done => "done",
        })
    }
}

/// Request body: an optional strategy name plus the ordered batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub strategy: Option<String>,
    pub tasks: Vec<TaskInput>,
}

/// Scored task, echoing the identifying fields of its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: Option<TaskId>,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub importance: u8,
    pub estimated_hours: f64,
    pub dependencies: Vec<TaskId>,
    pub priority_score: f64,
    pub subscores: Subscores,
    pub score_explanation: String,
    pub reason: Reason,
    pub warnings: Vec<Warning>,
}

/// A task excluded by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Position in the submitted batch.
    pub index: usize,
    pub id: Option<TaskId>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub strategy: Strategy,
    pub tasks: Vec<ScoreResult>,
    pub batch_warnings: Vec<String>,
    pub rejected: Vec<Rejection>,
}

/// Scoring engine bound to a store lookup and an explicit "today".
#[derive(Debug, Clone)]
pub struct Ranker<R: TaskResolver> {
    resolver: R,
    today: NaiveDate,
}

struct Scored {
    index: usize,
    result: ScoreResult,
}

impl<R: TaskResolver> Ranker<R> {
    pub fn new(resolver: R, today: NaiveDate) -> Self {
        Self { resolver, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn analyze_request(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        self.analyze(request.strategy.as_deref(), &request.tasks)
    }

    /// Score and rank `tasks`. `strategy` of `None` selects `balanced`.
    pub fn analyze(
        &self,
        strategy: Option<&str>,
        tasks: &[TaskInput],
    ) -> Result<AnalyzeResponse, AnalyzeError> {
        let mut stage = Stage::Validating;
        debug!(%stage, batch = tasks.len(), "analyze");

        let strategy = Strategy::from_optional(strategy)?;
        if tasks.is_empty() {
            return Err(AnalyzeError::EmptyBatch);
        }

        let mut batch_warnings = Vec::new();
        let mut rejected = Vec::new();
        let mut indices = Vec::with_capacity(tasks.len());
        let mut valid: Vec<Task> = Vec::with_capacity(tasks.len());

        for (index, input) in tasks.iter().enumerate() {
            match input.validate() {
                Ok(task) => {
                    indices.push(index);
                    valid.push(task);
                }
                Err(errors) => {
                    let errors: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    warn!(index, id = ?input.id, ?errors, "task rejected");
                    batch_warnings.push(format!("task[{index}] rejected: {}", errors.join("; ")));
                    rejected.push(Rejection {
                        index,
                        id: input.id,
                        errors,
                    });
                }
            }
        }

        stage = Stage::GraphBuilding;
        debug!(%stage, valid = valid.len(), rejected = rejected.len());
        let graph = TaskGraph::build(&valid, &self.resolver)?;

        for (node, task) in valid.iter().enumerate() {
            if let (true, Some(id)) = (graph.facts(node).duplicate_id, task.id) {
                batch_warnings.push(format!(
                    "task[{}] reuses id {id}; dependencies on {id} resolve to its first occurrence",
                    indices[node]
                ));
            }
        }

        stage = Stage::Scoring;
        debug!(%stage);
        let mut scored = self.score_all(&valid, &indices, &graph, strategy);

        stage = Stage::Sorting;
        debug!(%stage);
        scored.sort_by(compare_ranked);

        stage = Stage::Done;
        info!(
            %stage,
            %strategy,
            scored = scored.len(),
            rejected = rejected.len(),
            "analyzed task batch"
        );

        Ok(AnalyzeResponse {
            strategy,
            tasks: scored.into_iter().map(|s| s.result).collect(),
            batch_warnings,
            rejected,
        })
    }

    /// Same as [`Ranker::analyze`], keeping only the top `limit` results.
    pub fn suggest(
        &self,
        strategy: Option<&str>,
        tasks: &[TaskInput],
        limit: usize,
    ) -> Result<AnalyzeResponse, AnalyzeError> {
        let mut response = self.analyze(strategy, tasks)?;
        response.tasks.truncate(limit);
        Ok(response)
    }

    #[cfg(feature = "parallel")]
    fn score_all(&self, valid: &[Task], indices: &[usize], graph: &TaskGraph, strategy: Strategy) -> Vec<Scored> {
        use rayon::prelude::*;

        let today = self.today;
        valid
            .par_iter()
            .enumerate()
            .map(|(node, task)| Scored {
                index: indices[node],
                result: score_task(task, node, graph, strategy, today),
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, valid: &[Task], indices: &[usize], graph: &TaskGraph, strategy: Strategy) -> Vec<Scored> {
        valid
            .iter()
            .enumerate()
            .map(|(node, task)| Scored {
                index: indices[node],
                result: score_task(task, node, graph, strategy, self.today),
            })
            .collect()
    }
}

/// Convenience wrapper for one-shot calls.
pub fn analyze<R: TaskResolver>(
    strategy: Option<&str>,
    tasks: &[TaskInput],
    resolver: R,
    today: NaiveDate,
) -> Result<AnalyzeResponse, AnalyzeError> {
    Ranker::new(resolver, today).analyze(strategy, tasks)
}

fn score_task(task: &Task, node: usize, graph: &TaskGraph, strategy: Strategy, today: NaiveDate) -> ScoreResult {
    let facts = graph.facts(node);
    let breakdown = FactorBreakdown::compute(task, facts, today);
    let subscores = breakdown.subscores();
    // Round once; the explanation must quote the same number the result carries.
    let priority = round2(strategy.weights().combine(&subscores));
    let explanation = explain(&breakdown, strategy, priority);

    let mut warnings = Vec::new();
    if facts.in_cycle {
        warnings.push(Warning::circular(&facts.cycle_peers));
    }
    for id in &facts.missing {
        warnings.push(Warning::unresolved(*id));
    }
    if let (true, Some(id)) = (facts.duplicate_id, task.id) {
        warnings.push(Warning::duplicate(id));
    }
    match breakdown.urgency.days_until_due {
        Some(days) if days < 0 => warnings.push(Warning::overdue(days)),
        None => warnings.push(Warning::missing_due_date()),
        Some(_) => {}
    }

    ScoreResult {
        id: task.id,
        title: task.title.clone(),
        due_date: task.due_date,
        importance: task.importance,
        estimated_hours: task.estimated_hours,
        dependencies: task.dependencies.iter().copied().collect(),
        priority_score: priority,
        subscores: subscores.rounded(),
        score_explanation: explanation.score_explanation,
        reason: explanation.reason,
        warnings,
    }
}

/// Priority descending, then earlier due date (none last), then lower id
/// (tasks without an id after those with one), then earlier submission.
fn compare_ranked(a: &Scored, b: &Scored) -> Ordering {
    b.result
        .priority_score
        .total_cmp(&a.result.priority_score)
        .then_with(|| match (a.result.due_date, b.result.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| match (a.result.id, b.result.id) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.index.cmp(&b.index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::graph::NoStore;
    use crate::warnings::WarningCode;
    use chrono::Duration;
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn date_in(days: i64) -> String {
        (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    fn input(id: TaskId, importance: i64, hours: f64, due: Option<i64>, deps: &[TaskId]) -> TaskInput {
        TaskInput {
            id: Some(id),
            title: Some(format!("task {id}")),
            due_date: due.map(date_in),
            importance: Some(importance),
            estimated_hours: Some(hours),
            dependencies: deps.to_vec(),
            ..TaskInput::default()
        }
    }

    fn ranker() -> Ranker<NoStore> {
        Ranker::new(NoStore, today())
    }

    fn codes(r: &ScoreResult) -> Vec<WarningCode> {
        r.warnings.iter().map(|w| w.code).collect()
    }

    fn ids(resp: &AnalyzeResponse) -> Vec<Option<TaskId>> {
        resp.tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn fastest_prefers_quick_important_task() {
        let tasks = vec![input(1, 9, 1.0, Some(0), &[]), input(2, 2, 10.0, Some(30), &[])];
        let resp = ranker().analyze(Some("fastest"), &tasks).unwrap();
        assert_eq!(ids(&resp), vec![Some(1), Some(2)]);
        assert_eq!(resp.tasks[0].priority_score, 84.5);
        assert_eq!(resp.strategy, Strategy::Fastest);
    }

    #[test]
    fn overdue_task_gets_full_urgency_and_warning() {
        let tasks = vec![input(1, 5, 3.0, Some(-1), &[])];
        let resp = ranker().analyze(None, &tasks).unwrap();
        let r = &resp.tasks[0];
        assert_eq!(r.subscores.urgency, 100.0);
        assert_eq!(codes(r), vec![WarningCode::Overdue]);
        assert_eq!(resp.strategy, Strategy::Balanced);
    }

    #[test]
    fn cycle_members_are_warned_and_still_ranked() {
        let tasks = vec![
            input(1, 5, 3.0, Some(5), &[3]),
            input(2, 5, 3.0, Some(5), &[1]),
            input(3, 5, 3.0, Some(5), &[2]),
        ];
        let resp = ranker().analyze(Some("balanced"), &tasks).unwrap();
        assert_eq!(resp.tasks.len(), 3);
        for r in &resp.tasks {
            assert_eq!(codes(r), vec![WarningCode::CircularDependency]);
            assert_eq!(r.subscores.dependency, 50.0);
        }
    }

    #[test]
    fn missing_dependency_is_warned_and_ranked() {
        let tasks = vec![input(1, 5, 3.0, Some(5), &[9999]), input(2, 5, 3.0, Some(5), &[])];
        let resp = ranker().analyze(None, &tasks).unwrap();
        let r = resp.tasks.iter().find(|t| t.id == Some(1)).unwrap();
        assert_eq!(codes(r), vec![WarningCode::UnresolvedDependency]);
        assert_eq!(r.subscores.dependency, 35.0);
        // Waiting on a missing task ranks it below an otherwise identical one.
        assert_eq!(ids(&resp), vec![Some(2), Some(1)]);
    }

    #[test]
    fn blocking_task_outranks_its_dependent() {
        let tasks = vec![input(2, 5, 3.0, Some(5), &[1]), input(1, 5, 3.0, Some(5), &[])];
        let resp = ranker().analyze(None, &tasks).unwrap();
        assert_eq!(ids(&resp), vec![Some(1), Some(2)]);
        assert_eq!(resp.tasks[0].subscores.dependency, 60.0);
        assert_eq!(resp.tasks[1].subscores.dependency, 35.0);
    }

    #[test]
    fn invalid_tasks_are_rejected_without_aborting_batch() {
        let mut bad = input(2, 11, 3.0, Some(5), &[]);
        bad.title = None;
        let tasks = vec![input(1, 5, 3.0, Some(5), &[]), bad, input(3, 5, -1.0, None, &[])];
        let resp = ranker().analyze(None, &tasks).unwrap();

        assert_eq!(ids(&resp), vec![Some(1)]);
        assert_eq!(
            resp.rejected.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(resp.rejected[0].errors.len(), 2);
        assert_eq!(resp.batch_warnings.len(), 2);
        assert!(resp.batch_warnings[0].starts_with("task[1] rejected"));
    }

    #[test]
    fn all_rejected_still_succeeds() {
        let mut bad = TaskInput::default();
        bad.importance = Some(0);
        let resp = ranker().analyze(None, &[bad]).unwrap();
        assert!(resp.tasks.is_empty());
        assert_eq!(resp.rejected.len(), 1);
    }

    #[test]
    fn whole_call_errors() {
        let tasks = vec![input(1, 5, 3.0, None, &[])];
        assert!(matches!(
            ranker().analyze(Some("random"), &tasks),
            Err(AnalyzeError::InvalidStrategy(_))
        ));
        assert!(matches!(ranker().analyze(None, &[]), Err(AnalyzeError::EmptyBatch)));
        // Strategy is checked before the batch.
        assert!(matches!(
            ranker().analyze(Some("random"), &[]),
            Err(AnalyzeError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn store_outage_denies_the_whole_call() {
        struct Down;
        impl TaskResolver for Down {
            fn resolve(&self, _ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError> {
                Err(StoreError::Unavailable("timed out".into()))
            }
        }
        let tasks = vec![input(1, 5, 3.0, None, &[42])];
        let err = Ranker::new(Down, today()).analyze(None, &tasks).unwrap_err();
        assert!(matches!(err, AnalyzeError::StoreUnavailable(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn ties_break_on_due_date_then_id_then_submission() {
        let mut no_id = input(0, 5, 3.0, None, &[]);
        no_id.id = None;
        let tasks = vec![
            input(7, 5, 3.0, None, &[]),
            no_id.clone(),
            input(5, 5, 3.0, None, &[]),
            no_id,
        ];
        let resp = ranker().analyze(None, &tasks).unwrap();
        assert_eq!(ids(&resp), vec![Some(5), Some(7), None, None]);

        // Equal score and due date: lower id wins over submission order.
        let a = input(1, 5, 3.0, Some(10), &[]);
        let b = input(2, 5, 3.0, Some(10), &[]);
        let resp = ranker().analyze(None, &[b, a]).unwrap();
        assert_eq!(ids(&resp), vec![Some(1), Some(2)]);
    }

    #[test]
    fn earlier_due_date_breaks_equal_scores() {
        // Both far enough out that urgency sits at the floor.
        let late = input(1, 5, 3.0, Some(300), &[]);
        let early = input(2, 5, 3.0, Some(200), &[]);
        let resp = ranker().analyze(None, &[late, early]).unwrap();
        assert_eq!(resp.tasks[0].priority_score, resp.tasks[1].priority_score);
        assert_eq!(ids(&resp), vec![Some(2), Some(1)]);
    }

    #[test]
    fn missing_due_date_is_warned() {
        let resp = ranker().analyze(None, &[input(1, 5, 3.0, None, &[])]).unwrap();
        let r = &resp.tasks[0];
        assert_eq!(r.subscores.urgency, 10.0);
        assert_eq!(codes(r), vec![WarningCode::MissingDueDate]);
    }

    #[test]
    fn duplicate_ids_produce_batch_and_task_warnings() {
        let tasks = vec![input(1, 5, 3.0, Some(2), &[]), input(1, 6, 3.0, Some(2), &[])];
        let resp = ranker().analyze(None, &tasks).unwrap();
        assert_eq!(resp.tasks.len(), 2);
        assert_eq!(resp.batch_warnings.len(), 1);
        assert!(resp.batch_warnings[0].contains("task[1] reuses id 1"));
        let dup = resp.tasks.iter().find(|t| t.importance == 6).unwrap();
        assert_eq!(codes(dup), vec![WarningCode::DuplicateId]);
    }

    #[test]
    fn suggest_keeps_top_n() {
        let tasks: Vec<TaskInput> = (0..5).map(|i| input(i, 5 + i as i64, 2.0, Some(i as i64), &[])).collect();
        let resp = ranker().suggest(None, &tasks, 3).unwrap();
        assert_eq!(resp.tasks.len(), 3);
        assert!(resp.tasks[0].priority_score >= resp.tasks[1].priority_score);
        assert!(resp.tasks[1].priority_score >= resp.tasks[2].priority_score);
    }

    #[test]
    fn echoes_input_fields() {
        let tasks = vec![input(4, 7, 2.5, Some(3), &[9, 8])];
        let resp = ranker().analyze(None, &tasks).unwrap();
        let r = &resp.tasks[0];
        assert_eq!(r.title, "task 4");
        assert_eq!(r.importance, 7);
        assert_eq!(r.estimated_hours, 2.5);
        assert_eq!(r.dependencies, vec![8, 9]);
        assert_eq!(r.due_date, Some(today() + Duration::days(3)));
    }

    #[test]
    fn response_json_shape() {
        let resp = ranker().analyze(Some("impact"), &[input(1, 5, 3.0, None, &[])]).unwrap();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["strategy"], "impact");
        let task = &json["tasks"][0];
        for key in ["urgency", "importance", "effort", "dependency"] {
            assert!(task["subscores"][key].is_number(), "missing subscore {key}");
        }
        for key in [
            "summary",
            "urgency_reason",
            "importance_reason",
            "effort_reason",
            "dependency_reason",
            "final_priority_reason",
        ] {
            assert!(task["reason"][key].is_string(), "missing reason {key}");
        }
        assert_eq!(task["warnings"][0]["code"], "missing-due-date");
        assert!(json["batch_warnings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn scoring_matches_sequential_reference() {
        let tasks: Vec<Task> = (0..64u64)
            .map(|i| {
                let deps: Vec<TaskId> = if i > 0 { vec![i / 2] } else { vec![] };
                Task::new(i, format!("t{i}"))
                    .with_importance((i % 10 + 1) as u8)
                    .with_hours(0.5 + (i % 12) as f64)
                    .with_due_date(today() + Duration::days(i as i64 - 5))
                    .with_dependencies(deps)
            })
            .collect();
        let indices: Vec<usize> = (0..tasks.len()).collect();
        let graph = TaskGraph::build(&tasks, &NoStore).unwrap();

        let scored = ranker().score_all(&tasks, &indices, &graph, Strategy::Impact);
        let reference: Vec<ScoreResult> = tasks
            .iter()
            .enumerate()
            .map(|(node, t)| score_task(t, node, &graph, Strategy::Impact, today()))
            .collect();

        assert_eq!(scored.len(), reference.len());
        for (s, r) in scored.iter().zip(&reference) {
            assert_eq!(&s.result, r);
        }
    }

    #[test]
    fn request_body_parses_with_or_without_strategy() {
        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"tasks":[{"id":1,"title":"a","importance":3}]}"#).unwrap();
        assert_eq!(req.strategy, None);
        let resp = ranker().analyze_request(&req).unwrap();
        assert_eq!(resp.strategy, Strategy::Balanced);
    }

    #[test]
    fn mistyped_task_is_rejected_alone() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"tasks":[
                {"id":1,"title":"ok","importance":5},
                {"id":2,"title":"bad","importance":"high"},
                {"id":3,"title":"neg","dependencies":[-1]}
            ]}"#,
        )
        .unwrap();
        let resp = ranker().analyze_request(&req).unwrap();

        assert_eq!(ids(&resp), vec![Some(1)]);
        let rejected: Vec<(usize, Option<TaskId>)> =
            resp.rejected.iter().map(|r| (r.index, r.id)).collect();
        assert_eq!(rejected, vec![(1, Some(2)), (2, Some(3))]);
        assert!(resp.rejected[0].errors[0].starts_with("malformed task"));
        assert!(resp.batch_warnings[0].starts_with("task[1] rejected: malformed task"));
    }

    #[test]
    fn warnings_follow_graph_then_urgency_order() {
        // Task 1 sits in a cycle with task 2, names two unknown ids and is overdue.
        let tasks = vec![
            input(1, 5, 1.0, Some(-3), &[2, 9999, 42]),
            input(2, 5, 1.0, Some(4), &[1]),
        ];
        let resp = ranker().analyze(None, &tasks).unwrap();
        let r = resp.tasks.iter().find(|t| t.id == Some(1)).unwrap();
        assert_eq!(
            codes(r),
            vec![
                WarningCode::CircularDependency,
                WarningCode::UnresolvedDependency,
                WarningCode::UnresolvedDependency,
                WarningCode::Overdue,
            ]
        );
        assert!(r.warnings[1].message.contains(" 42 "));
        assert!(r.warnings[2].message.contains(" 9999 "));
    }

    #[test]
    fn duplicate_warning_sits_between_unresolved_and_urgency() {
        let copy = TaskInput {
            id: Some(5),
            title: Some("copy".into()),
            dependencies: vec![77],
            ..TaskInput::default()
        };
        let tasks = vec![input(5, 5, 1.0, Some(2), &[]), copy];
        let resp = ranker().analyze(None, &tasks).unwrap();
        let r = resp.tasks.iter().find(|t| t.title == "copy").unwrap();
        assert_eq!(
            codes(r),
            vec![
                WarningCode::UnresolvedDependency,
                WarningCode::DuplicateId,
                WarningCode::MissingDueDate,
            ]
        );
    }

    #[test]
    fn explanation_quotes_the_reported_numbers() {
        let mut tasks = Vec::new();
        let mut id = 0;
        for importance in 1..=10 {
            for hours in [0.5, 1.0, 2.5, 9.0] {
                for due in [None, Some(-2), Some(0), Some(1), Some(3), Some(5), Some(9), Some(13), Some(28), Some(40)] {
                    id += 1;
                    tasks.push(input(id, importance, hours, due, &[]));
                }
            }
        }

        for strategy in Strategy::ALL {
            let resp = ranker().analyze(Some(strategy.name()), &tasks).unwrap();
            for r in &resp.tasks {
                let priority = format!("{:.2}", r.priority_score);
                assert!(r.reason.summary.contains(&priority), "{} / {}", r.reason.summary, priority);
                assert!(r.reason.final_priority_reason.contains(&priority));
                assert!(r.reason.urgency_reason.contains(&format!("{:.2}", r.subscores.urgency)));
                assert!(r.reason.effort_reason.contains(&format!("{:.2}", r.subscores.effort)));
                assert!(r.reason.dependency_reason.contains(&format!("{:.2}", r.subscores.dependency)));
            }
        }

        // A halfway case: 63.625 rounds up in the result and must read the same.
        let resp = ranker()
            .analyze(Some("fastest"), &[input(1, 1, 1.0, Some(28), &[])])
            .unwrap();
        assert_eq!(resp.tasks[0].priority_score, 63.63);
        assert!(resp.tasks[0].reason.summary.contains("63.63"));
    }
}
