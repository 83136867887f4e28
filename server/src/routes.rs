// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers::{self, AppState};
use axum::{
    Router,
    routing::{delete, get, patch, put},
};

/// Creates and configures the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // `GET /api/tasks?filter=..` lists rows, `POST /api/tasks` submits the entry form
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/counts", get(handlers::task_counts))
        // Drag-reorder drop
        .route("/api/tasks/order", put(handlers::reorder_tasks))
        .route("/api/tasks/{id}", delete(handlers::delete_task))
        .route("/api/tasks/{id}/toggle", patch(handlers::toggle_task))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/health", get(handlers::health))
        // Adds the shared store to the application state
        .with_state(state)
}
