// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use common::{Category, CreateTaskPayload, FilterMode, ReorderPayload, Task, TaskCounts};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::categories::CategoryRegistry;
use crate::form::{FormError, Submission, TaskForm};
use crate::list_view;
use crate::store::{StoreError, TaskStore};

/// Shared application state.
///
/// The store is owned here and handed to every handler; the mutex makes each
/// store operation, including its slot write, run to completion before the
/// next one starts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TaskStore>>,
    pub categories: Arc<CategoryRegistry>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            categories: Arc::new(CategoryRegistry::default()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: FilterMode,
}

/// Handler for listing the tasks visible under a filter.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = state.store.lock().await;
    let rows = list_view::rows(store.tasks(), query.filter);
    info!("Listing {} tasks ({:?}).", rows.len(), query.filter);
    let body = serde_json::to_value(rows).context("Failed to serialize task rows")?;
    Ok(Json(body))
}

/// Handler for the entry form.
///
/// A blank title is not an error: nothing is created and the response is
/// `204 No Content`.
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskPayload>, // Extracting the request body as JSON
) -> Result<Response, AppError> {
    debug!("Received entry form with title {:?}", payload.title);
    let mut form = TaskForm::from(payload);

    let mut store = state.store.lock().await;
    match form.submit(&mut store, &state.categories, Utc::now()).await? {
        Submission::Created(task) => {
            info!("Task added: \"{}\" ({})", task.title, task.id);
            Ok((StatusCode::CREATED, Json(task)).into_response())
        }
        Submission::Rejected => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Handler for flipping a task's completion.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, AppError> {
    let mut store = state.store.lock().await;
    match store.toggle_complete(&task_id).await? {
        Some(task) => {
            info!("Task {} completed={}.", task.id, task.completed);
            Ok(Json(task).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Handler for deleting a task by ID. Deleting an unknown ID is a no-op.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    if store.remove(&task_id).await?.is_some() {
        info!("Task with ID {} deleted successfully.", task_id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for a drag-reorder drop.
///
/// With a `filter` other than `all`, `ids` is the order of the visible rows
/// only and is merged into the full list first.
pub async fn reorder_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Json(payload): Json<ReorderPayload>,
) -> Result<Json<Vec<Task>>, AppError> {
    let mut store = state.store.lock().await;

    let ids = match query.filter {
        FilterMode::All => payload.ids,
        mode => list_view::merge_visible_order(store.tasks(), mode, &payload.ids).ok_or_else(
            || {
                AppError::new(
                    StatusCode::BAD_REQUEST,
                    "The order must list every visible task exactly once.",
                )
            },
        )?,
    };

    store.reorder(&ids).await?;
    info!("Reordered {} tasks.", store.len());
    Ok(Json(store.tasks().to_vec()))
}

pub async fn task_counts(State(state): State<AppState>) -> Json<TaskCounts> {
    Json(state.store.lock().await.counts())
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.all().to_vec())
}

/// Reports whether the task list had to be rebuilt from the seed list.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.lock().await;
    Json(serde_json::json!({
        "status": "ok",
        "loadOutcome": store.load_outcome(),
        "discardedKey": store.discarded_key(),
    }))
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// Allows converting an `anyhow::Error` (coming from `database.rs`)
/// into our `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Log the internal error for debugging.
        error!("Internal server error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred.")
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Storage(e) => e.into(),
            StoreError::InvalidOrder(reason) => Self::new(
                StatusCode::BAD_REQUEST,
                &format!("Invalid task order: {reason}."),
            ),
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::UnknownCategory(_) => Self::new(StatusCode::BAD_REQUEST, &err.to_string()),
            FormError::Store(e) => e.into(),
        }
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;

    async fn test_state() -> AppState {
        let pool = connect_in_memory().await.unwrap();
        AppState::new(TaskStore::open(pool).await.unwrap())
    }

    fn payload(title: &str, category_id: Option<&str>) -> Json<CreateTaskPayload> {
        Json(CreateTaskPayload {
            title: title.to_string(),
            category_id: category_id.map(str::to_string),
            ..CreateTaskPayload::default()
        })
    }

    #[tokio::test]
    async fn test_create_task_blank_title_is_no_content() {
        // Arrange
        let state = test_state().await;

        // Act
        let response = create_task(State(state.clone()), payload("  ", None))
            .await
            .unwrap();

        // Assert: nothing was created
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.store.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_task_unknown_category_is_bad_request() {
        // Arrange
        let state = test_state().await;

        // Act
        let err = create_task(State(state), payload("Buy milk", Some("cat9")))
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "unknown category 'cat9'");
    }

    #[tokio::test]
    async fn test_reorder_with_wrong_visible_count() {
        // Arrange
        let state = test_state().await;

        // Act: one id for a view that shows no task
        let err = reorder_tasks(
            State(state),
            Query(ListQuery {
                filter: FilterMode::Completed,
            }),
            Json(ReorderPayload {
                ids: vec!["task1".to_string()],
            }),
        )
        .await
        .unwrap_err();

        // Assert
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_seeded_start() {
        // Arrange
        let state = test_state().await;

        // Act
        let Json(body) = health(State(state)).await;

        // Assert
        assert_eq!(body["loadOutcome"], "seeded");
        assert!(body["discardedKey"].is_null());
    }

    #[test]
    fn test_invalid_order_maps_to_bad_request() {
        let err = AppError::from(StoreError::InvalidOrder("unknown task x".to_string()));
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid task order: unknown task x.");
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let err = AppError::from(StoreError::Storage(anyhow::anyhow!("disk on fire")));
        assert_eq!(err.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred.");
    }
}
