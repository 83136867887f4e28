// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Utc};
use common::{CreateTaskPayload, NewTask, Task};
use tracing::debug;

use crate::categories::CategoryRegistry;
use crate::store::{StoreError, TaskStore};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of submitting the form.
#[derive(Debug)]
pub enum Submission {
    Created(Task),
    /// The title was blank; nothing was created.
    Rejected,
}

/// Entry form for new tasks.
///
/// Holds the fields being edited. A successful submit hands a draft to the
/// store and resets every field; a rejected one keeps them.
#[derive(Debug, Default, Clone)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    expanded: bool,
}

impl From<CreateTaskPayload> for TaskForm {
    fn from(payload: CreateTaskPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            category_id: payload.category_id,
            due_date: payload.due_date,
            expanded: false,
        }
    }
}

impl TaskForm {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Clears every field and collapses the form.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Builds the draft for the current fields.
    ///
    /// Returns `Ok(None)` when the title is blank.
    pub fn draft(
        &self,
        registry: &CategoryRegistry,
        now: DateTime<Utc>,
    ) -> Result<Option<NewTask>, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let category = match self.category_id.as_deref() {
            None => None,
            Some(id) => Some(
                registry
                    .get(id)
                    .cloned()
                    .ok_or_else(|| FormError::UnknownCategory(id.to_string()))?,
            ),
        };

        let description = Some(self.description.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(Some(NewTask {
            title: title.to_string(),
            description,
            completed: false,
            category,
            due_date: self.due_date,
            created_at: now,
        }))
    }

    pub async fn submit(
        &mut self,
        store: &mut TaskStore,
        registry: &CategoryRegistry,
        now: DateTime<Utc>,
    ) -> Result<Submission, FormError> {
        let Some(draft) = self.draft(registry, now)? else {
            debug!("Blank title, form submission ignored.");
            return Ok(Submission::Rejected);
        };

        let task = store.add(draft).await?;
        self.cancel();
        Ok(Submission::Created(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{connect_in_memory, read_slot};
    use crate::store::TASKS_KEY;
    use chrono::Duration;
    use common::CategoryColor;

    fn form(title: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            ..TaskForm::default()
        }
    }

    #[test]
    fn whitespace_title_produces_no_draft() {
        let registry = CategoryRegistry::default();
        assert!(form("   ").draft(&registry, Utc::now()).unwrap().is_none());
        assert!(form("").draft(&registry, Utc::now()).unwrap().is_none());
    }

    #[test]
    fn draft_trims_and_fills_defaults() {
        let registry = CategoryRegistry::default();
        let now = Utc::now();
        let due = now + Duration::days(1);
        let mut entry = form("  Buy milk ");
        entry.description = "  ".to_string();
        entry.category_id = Some("cat3".to_string());
        entry.due_date = Some(due);

        let draft = entry.draft(&registry, now).unwrap().unwrap();

        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, None);
        assert!(!draft.completed);
        assert_eq!(draft.category.map(|c| c.color), Some(CategoryColor::Moss));
        assert_eq!(draft.due_date, Some(due));
        assert_eq!(draft.created_at, now);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let registry = CategoryRegistry::default();
        let mut entry = form("Buy milk");
        entry.category_id = Some("cat42".to_string());

        let result = entry.draft(&registry, Utc::now());

        assert!(matches!(result, Err(FormError::UnknownCategory(id)) if id == "cat42"));
    }

    #[test]
    fn cancel_clears_and_collapses() {
        let mut entry = form("Buy milk");
        entry.description = "2 litres".to_string();
        entry.toggle_expanded();
        assert!(entry.is_expanded());

        entry.cancel();

        assert!(entry.title.is_empty());
        assert!(entry.description.is_empty());
        assert!(!entry.is_expanded());
    }

    #[tokio::test]
    async fn test_blank_submission_leaves_store_untouched() {
        let pool = connect_in_memory().await.unwrap();
        let mut store = TaskStore::open(pool.clone()).await.unwrap();
        let registry = CategoryRegistry::default();
        let mut entry = form("   ");

        let outcome = entry.submit(&mut store, &registry, Utc::now()).await.unwrap();

        assert!(matches!(outcome, Submission::Rejected));
        assert_eq!(store.len(), 3);
        assert_eq!(read_slot(&pool, TASKS_KEY).await.unwrap(), None);
        assert_eq!(entry.title, "   ");
    }

    #[tokio::test]
    async fn test_successful_submission_adds_and_resets() {
        let pool = connect_in_memory().await.unwrap();
        let mut store = TaskStore::open(pool).await.unwrap();
        let registry = CategoryRegistry::default();
        let mut entry = form("Buy milk");
        entry.category_id = Some("cat1".to_string());
        entry.toggle_expanded();

        let outcome = entry.submit(&mut store, &registry, Utc::now()).await.unwrap();

        let Submission::Created(task) = outcome else {
            panic!("expected a created task");
        };
        assert_eq!(store.tasks()[0].id, task.id);
        assert_eq!(store.len(), 4);
        assert!(entry.title.is_empty());
        assert!(entry.category_id.is_none());
        assert!(!entry.is_expanded());
    }
}
