//! JSON-file backed task store.
//!
//! File layout: `{ "next_id": 7, "tasks": [ ...Task... ] }`. A missing file
//! is an empty store. Every mutation is written through with a
//! write-then-rename so a crash never leaves a half-written file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use taskrank_core::{StoreError, Task, TaskId, TaskInput, TaskResolver};
use tracing::{debug, info};

use crate::memory::{MemoryStore, Snapshot};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, reading it synchronously.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no store file yet; starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                inner: MemoryStore::new(),
            });
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_contents(path, &contents)
    }

    /// Build a store from file contents already read by the caller.
    pub fn from_contents(path: impl AsRef<Path>, contents: &str) -> Result<Self> {
        let path = path.as_ref();
        let inner = if contents.trim().is_empty() {
            MemoryStore::new()
        } else {
            let snapshot: Snapshot = serde_json::from_str(contents)
                .with_context(|| format!("parse {}", path.display()))?;
            MemoryStore::from_snapshot(snapshot)?
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.inner.get(id)
    }

    /// Validate and persist a batch. Tasks without an id get one assigned;
    /// tasks carrying a stored id replace that task.
    ///
    /// The whole batch is refused if any entry is invalid, and the store is
    /// left untouched unless the file write succeeds.
    pub fn save_batch(&mut self, inputs: &[TaskInput]) -> Result<Vec<TaskId>> {
        let mut tasks = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            match input.validate() {
                Ok(task) => tasks.push(task),
                Err(errors) => {
                    let msgs: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    bail!("task[{i}] is invalid: {}", msgs.join("; "));
                }
            }
        }

        let mut next = self.inner.clone();
        let mut ids = Vec::with_capacity(tasks.len());
        for task in tasks {
            if let Some(id) = task.id.filter(|id| next.get(*id).is_some()) {
                debug!(id, "replacing stored task");
            }
            ids.push(next.insert_new(task)?);
        }
        self.commit(next)?;
        info!(count = ids.len(), path = %self.path.display(), "saved tasks");
        Ok(ids)
    }

    /// Delete a task by id. Unknown ids are an error.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let mut next = self.inner.clone();
        let Some(task) = next.remove(id) else {
            bail!("task {id} not found");
        };
        self.commit(next)?;
        info!(id, "deleted task");
        Ok(task)
    }

    /// Every stored task, ascending by id.
    pub fn list_all(&self) -> Vec<&Task> {
        self.inner.all().collect()
    }

    /// Tasks due on `today`, ascending by id.
    pub fn list_due_on(&self, today: NaiveDate) -> Vec<&Task> {
        self.inner.due_on(today)
    }

    pub fn save(&self) -> Result<()> {
        write_snapshot(&self.path, &self.inner)
    }

    /// Persist `next`, and adopt it only once it is on disk.
    fn commit(&mut self, next: MemoryStore) -> Result<()> {
        write_snapshot(&self.path, &next)?;
        self.inner = next;
        Ok(())
    }
}

fn write_snapshot(path: &Path, store: &MemoryStore) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&store.snapshot()).context("serialize store")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

impl TaskResolver for JsonFileStore {
    fn resolve(&self, ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError> {
        self.inner.resolve(ids)
    }
}
