use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use employee_directory_core::Department;

use crate::problem::ProblemResponse;
use crate::router::AppState;
use crate::telemetry::record_outcome;

const RESOURCE: &str = "departments";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>, ProblemResponse> {
    let started = Instant::now();
    let result = state.departments().find_all_departments().await;
    record_outcome(RESOURCE, "list", &result, started);
    Ok(Json(result?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Department>, ProblemResponse> {
    info!(stage = "app", department_id = %id, "get department");
    let started = Instant::now();
    let result = state.departments().find_department(&id).await;
    record_outcome(RESOURCE, "get", &result, started);
    Ok(Json(result?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Department>, JsonRejection>,
) -> Result<(StatusCode, Json<Department>), ProblemResponse> {
    let Json(department) = payload?;
    info!(stage = "app", %department, "create department");
    let started = Instant::now();
    let result = state.departments().save_department(department).await;
    record_outcome(RESOURCE, "create", &result, started);
    Ok((StatusCode::CREATED, Json(result?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    info!(stage = "app", department_id = %id, "delete department");
    let started = Instant::now();
    let result = state.departments().delete_department(&id).await;
    record_outcome(RESOURCE, "delete", &result, started);
    result?;
    Ok(StatusCode::NO_CONTENT)
}
