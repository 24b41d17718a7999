//! MemoryStore: deterministic in-memory task storage.
//!
//! - canonical Task copies in an ordered map (id -> Task)
//! - a due-date bucket index so "what is due on day X" never scans the map
//! - id assignment for tasks saved without one
//!
//! Serves as the engine's read-only dependency resolver and as the backing
//! state of [`crate::JsonFileStore`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskrank_core::{StoreError, Task, TaskId, TaskResolver};

#[derive(Debug, Clone)]
pub struct MemoryStore {
    tasks: BTreeMap<TaskId, Task>,

    // idx[due_date] = set(task_id); `None` buckets undated tasks
    by_due: HashMap<Option<NaiveDate>, BTreeSet<TaskId>>,

    next_id: TaskId,
}

/// Serialized form of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub next_id: TaskId,
    pub tasks: Vec<Task>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            by_due: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Id the next id-less insert will receive.
    pub fn next_id(&self) -> TaskId {
        self.next_id
    }

    /// Insert or replace a task that already carries an id.
    pub fn upsert(&mut self, task: Task) -> Result<TaskId> {
        let Some(id) = task.id else {
            bail!("cannot upsert task '{}' without an id", task.title);
        };
        if let Some(old) = self.tasks.remove(&id) {
            self.deindex(&old);
        }
        self.index(&task);
        self.tasks.insert(id, task);
        // Saturates at the top of the id space; `insert_new` then refuses.
        self.next_id = self.next_id.max(id.saturating_add(1));
        Ok(id)
    }

    /// Store a task, assigning the next free id when it has none.
    pub fn insert_new(&mut self, mut task: Task) -> Result<TaskId> {
        if task.id.is_none() {
            if self.tasks.contains_key(&self.next_id) {
                bail!("no task ids left to assign (next id {} is taken)", self.next_id);
            }
            task.id = Some(self.next_id);
        }
        self.upsert(task)
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let t = self.tasks.remove(&id);
        if let Some(ref task) = t {
            self.deindex(task);
        }
        t
    }

    /// Every stored task, ascending by id.
    pub fn all(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks due on `day`, ascending by id.
    pub fn due_on(&self, day: NaiveDate) -> Vec<&Task> {
        self.by_due
            .get(&Some(day))
            .map(|ids| ids.iter().filter_map(|id| self.tasks.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            tasks: self.tasks.values().cloned().collect(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();
        for task in snapshot.tasks {
            store.upsert(task)?;
        }
        store.next_id = store.next_id.max(snapshot.next_id);
        Ok(store)
    }

    fn index(&mut self, task: &Task) {
        if let Some(id) = task.id {
            self.by_due.entry(task.due_date).or_default().insert(id);
        }
    }

    fn deindex(&mut self, task: &Task) {
        let Some(id) = task.id else { return };
        if let Some(set) = self.by_due.get_mut(&task.due_date) {
            set.remove(&id);
            if set.is_empty() {
                self.by_due.remove(&task.due_date);
            }
        }
    }
}

impl TaskResolver for MemoryStore {
    fn resolve(&self, ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.tasks.get(id).map(|t| (*id, t.clone())))
            .collect())
    }
}
