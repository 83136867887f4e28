// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Palette tag of a category.
///
/// Any value outside the known set deserializes to `Default`, so a stored
/// category with an unexpected color still loads and renders with the
/// fallback palette entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Indigo,
    Vermilion,
    Moss,
    Gray,
    #[default]
    #[serde(other)]
    Default,
}

/// A named, colored tag attached to tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: CategoryColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single to-do item.
///
/// Field names are serialized in camelCase; this is also the layout of the
/// persisted `tasks` slot, so a snapshot written by an older build of the
/// web client loads unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,

    // Held by value, not by reference into the registry.
    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from a draft and the identifier assigned by the store.
    pub fn from_draft(id: String, draft: NewTask) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            category: draft.category,
            due_date: draft.due_date,
            created_at: draft.created_at,
        }
    }
}

/// A task that has not been given an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub category: Option<Category>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Which tasks a list shows.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

/// Number of tasks per filter mode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

/// Structure used to receive the entry form from the API.
/// The category is referenced by its registry id; the server resolves it.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    // A missing title is treated like a blank one.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// New order of the task list, as task ids.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReorderPayload {
    pub ids: Vec<String>,
}
