use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{handler::*, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/categories", get(get_categories))
        .route("/stats", get(get_stats))
        .route("/health", get(health_checker_handler))
        .fallback(route_not_found)
        .with_state(app_state)
}
