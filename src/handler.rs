use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::ApiError,
    schema::{CreateTodoSchema, FilterOptions, UpdateTodoSchema},
    stats, AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    let json_response = json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": "Pomodoro Todo API"
    });

    Json(json_response)
}

// Handler for getting all Todo items, with optional filters
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Query(filter): Query<FilterOptions>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = data.store.list(&filter).await?;

    let json_response = json!({
        "success": true,
        "count": todos.len(),
        "data": todos
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for creating a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Json(body): Json<CreateTodoSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let new = body
        .into_new_todo()
        .map_err(|msg| ApiError::Validation(msg.to_string()))?;

    let todo = data.store.create(new).await?;

    let json_response = json!({
        "success": true,
        "data": todo,
        "message": "Todo created successfully"
    });
    Ok((StatusCode::CREATED, Json(json_response)))
}

// Handler for getting a specific Todo by ID
pub async fn get_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = data.store.get(id).await?.ok_or(ApiError::NotFound)?;

    let json_response = json!({
        "success": true,
        "data": todo
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for updating a Todo by ID. Only fields present in the body
// are touched.
pub async fn update_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Json(body): Json<UpdateTodoSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = data
        .store
        .update(id, &body)
        .await?
        .ok_or(ApiError::NotFound)?;

    let json_response = json!({
        "success": true,
        "data": todo,
        "message": "Todo updated successfully"
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for deleting a Todo by ID. The deleted record is echoed back.
pub async fn delete_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = data.store.delete(id).await?.ok_or(ApiError::NotFound)?;

    let json_response = json!({
        "success": true,
        "data": todo,
        "message": "Todo deleted successfully"
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for listing the distinct categories in use
pub async fn get_categories(
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = data.store.categories().await?;

    let json_response = json!({
        "success": true,
        "data": categories
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for aggregate statistics, recomputed over all records each call
pub async fn get_stats(State(data): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let todos = data.store.list(&FilterOptions::default()).await?;
    let stats = stats::compute(&todos);

    let json_response = json!({
        "success": true,
        "data": stats
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// Fallback for unmatched routes
pub async fn route_not_found() -> impl IntoResponse {
    let json_response = json!({
        "success": false,
        "message": "Route not found"
    });
    (StatusCode::NOT_FOUND, Json(json_response))
}
