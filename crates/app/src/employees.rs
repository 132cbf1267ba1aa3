use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use employee_directory_core::Employee;

use crate::problem::ProblemResponse;
use crate::router::AppState;
use crate::telemetry::record_outcome;

const RESOURCE: &str = "employees";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ProblemResponse> {
    let started = Instant::now();
    let result = state.employees().find_all_employees().await;
    record_outcome(RESOURCE, "list", &result, started);
    Ok(Json(result?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ProblemResponse> {
    info!(stage = "app", employee_id = %id, "get employee");
    let started = Instant::now();
    let result = state.employees().find_employee(&id).await;
    record_outcome(RESOURCE, "get", &result, started);
    Ok(Json(result?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ProblemResponse> {
    let Json(employee) = payload?;
    info!(stage = "app", %employee, "create employee");
    let started = Instant::now();
    let result = state.employees().save_employee(employee).await;
    record_outcome(RESOURCE, "create", &result, started);
    Ok((StatusCode::CREATED, Json(result?)))
}

/// Replaces the employee addressed by the path. The path id wins over any id in the body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Result<Json<Employee>, ProblemResponse> {
    let Json(mut employee) = payload?;
    employee.id = Some(id);
    info!(stage = "app", %employee, "update employee");
    let started = Instant::now();
    let result = state.employees().update_employee(employee).await;
    record_outcome(RESOURCE, "update", &result, started);
    Ok(Json(result?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    info!(stage = "app", employee_id = %id, "delete employee");
    let started = Instant::now();
    let result = state.employees().delete_employee(&id).await;
    record_outcome(RESOURCE, "delete", &result, started);
    result?;
    Ok(StatusCode::NO_CONTENT)
}
