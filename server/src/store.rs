// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::{HashMap, HashSet};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use common::{NewTask, Task, TaskCounts};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::categories::CategoryRegistry;
use crate::database;
use crate::filter;

/// Slot holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";
/// Prefix of the slots where unreadable `tasks` values are kept when the seed
/// list replaces them. Each recovery writes its own `tasks.discarded.<time>` key.
pub const DISCARDED_PREFIX: &str = "tasks.discarded.";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
    #[error("invalid order: {0}")]
    InvalidOrder(String),
}

/// How the task list was initialized when the store was opened.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The persisted list was read back.
    Restored,
    /// Nothing was persisted yet; the seed list is in use.
    Seeded,
    /// The persisted value could not be read. It was copied to a
    /// [`DISCARDED_PREFIX`] slot and the seed list is in use.
    Recovered,
}

/// The ordered task collection, mirrored to the `tasks` slot.
///
/// Every mutation writes the whole collection to the slot before it returns.
/// The in-memory list is only replaced once that write has succeeded, so a
/// failed write leaves both sides as they were.
pub struct TaskStore {
    pool: SqlitePool,
    tasks: Vec<Task>,
    load_outcome: LoadOutcome,
    discarded_key: Option<String>,
}

impl TaskStore {
    /// Loads the task list from the `tasks` slot, falling back to the seed list.
    pub async fn open(pool: SqlitePool) -> Result<Self, StoreError> {
        let mut discarded_key = None;
        let (tasks, load_outcome) = match database::read_slot(&pool, TASKS_KEY).await? {
            None => {
                info!("No persisted task list, starting from the seed list.");
                (seed_tasks(Utc::now()), LoadOutcome::Seeded)
            }
            Some(raw) => match parse_snapshot(&raw) {
                Ok(tasks) => {
                    info!("Restored {} tasks.", tasks.len());
                    (tasks, LoadOutcome::Restored)
                }
                Err(e) => {
                    let key = format!(
                        "{DISCARDED_PREFIX}{}",
                        Utc::now().format("%Y%m%dT%H%M%S%.9fZ")
                    );
                    warn!(
                        "Persisted task list is unreadable ({:#}); keeping it under '{}' and starting from the seed list.",
                        e, key
                    );
                    database::write_slot(&pool, &key, &raw).await?;
                    discarded_key = Some(key);
                    (seed_tasks(Utc::now()), LoadOutcome::Recovered)
                }
            },
        };

        Ok(Self {
            pool,
            tasks,
            load_outcome,
            discarded_key,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> TaskCounts {
        filter::counts(&self.tasks)
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Slot holding the value set aside by [`LoadOutcome::Recovered`].
    pub fn discarded_key(&self) -> Option<&str> {
        self.discarded_key.as_deref()
    }

    /// Creates a task from `draft` and puts it at the top of the list.
    ///
    /// The title is not checked here; the entry form is responsible for it.
    pub async fn add(&mut self, draft: NewTask) -> Result<Task, StoreError> {
        let id = self.fresh_id();
        let task = Task::from_draft(id, draft);
        debug!("Adding task {} ({:?})", task.id, task.title);

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task.clone());
        next.extend(self.tasks.iter().cloned());
        self.commit(next).await?;

        Ok(task)
    }

    /// Flips `completed` on the task with `id`. Returns `None`, without
    /// touching the slot, when no such task exists.
    pub async fn toggle_complete(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.position(id) else {
            debug!("Toggle ignored, no task with ID {}", id);
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[index].completed = !next[index].completed;
        let toggled = next[index].clone();
        self.commit(next).await?;

        debug!("Task {} completed={}", id, toggled.completed);
        Ok(Some(toggled))
    }

    /// Deletes the task with `id`. Returns `None`, without touching the slot,
    /// when no such task exists.
    pub async fn remove(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.position(id) else {
            debug!("Remove ignored, no task with ID {}", id);
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next).await?;

        debug!("Task {} removed", id);
        Ok(Some(removed))
    }

    /// Replaces the order of the list with `ids`.
    ///
    /// `ids` must name every task exactly once. Anything else is rejected
    /// with [`StoreError::InvalidOrder`] and the list keeps its order.
    pub async fn reorder(&mut self, ids: &[String]) -> Result<(), StoreError> {
        let mut by_id: HashMap<&str, &Task> =
            self.tasks.iter().map(|task| (task.id.as_str(), task)).collect();

        let mut next = Vec::with_capacity(self.tasks.len());
        for id in ids {
            match by_id.remove(id.as_str()) {
                Some(task) => next.push(task.clone()),
                None if self.get(id).is_some() => {
                    return Err(StoreError::InvalidOrder(format!("task {id} is listed twice")));
                }
                None => {
                    return Err(StoreError::InvalidOrder(format!("unknown task {id}")));
                }
            }
        }
        if !by_id.is_empty() {
            let mut missing: Vec<&str> = by_id.into_keys().collect();
            missing.sort_unstable();
            return Err(StoreError::InvalidOrder(format!(
                "missing tasks {}",
                missing.join(", ")
            )));
        }

        self.commit(next).await?;
        debug!("Reordered {} tasks", self.tasks.len());
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    async fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&next).context("Failed to serialize task list")?;
        database::write_slot(&self.pool, TASKS_KEY, &raw).await?;
        self.tasks = next;
        Ok(())
    }
}

/// Parses a persisted task list and checks the invariants a live list keeps:
/// non-empty titles and unique ids.
fn parse_snapshot(raw: &str) -> anyhow::Result<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw).context("not a JSON task list")?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if task.title.trim().is_empty() {
            anyhow::bail!("task {} has an empty title", task.id);
        }
        if !seen.insert(task.id.as_str()) {
            anyhow::bail!("task id {} appears more than once", task.id);
        }
    }
    Ok(tasks)
}

/// The three sample tasks shown on first start.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let registry = CategoryRegistry::default();
    let category = |id: &str| registry.get(id).cloned();

    vec![
        Task {
            id: "task1".to_string(),
            title: "Meditate for 10 minutes".to_string(),
            description: Some("Focus on breathing and clear the mind".to_string()),
            completed: false,
            category: category("cat1"),
            due_date: None,
            created_at: now,
        },
        Task {
            id: "task2".to_string(),
            title: "Finish project proposal".to_string(),
            description: Some("Complete the draft and send to the team for review".to_string()),
            completed: false,
            category: category("cat2"),
            due_date: Some(now + Duration::days(2)),
            created_at: now,
        },
        Task {
            id: "task3".to_string(),
            title: "Go for a 30-minute walk".to_string(),
            description: None,
            completed: false,
            category: category("cat3"),
            due_date: None,
            created_at: now,
        },
    ]
}
