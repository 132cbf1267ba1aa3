use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use employee_directory_core::{DepartmentService, EmployeeService, FieldValidator};
use employee_directory_storage::{Database, DepartmentRepository, EmployeeRepository};

use crate::{departments, employees, telemetry};

pub type Employees = EmployeeService<EmployeeRepository, DepartmentRepository>;
pub type Departments = DepartmentService<DepartmentRepository>;

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    employees: Employees,
    departments: Departments,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, storage: &Database) -> Self {
        let employees = EmployeeService::new(
            storage.employees(),
            storage.departments(),
            FieldValidator::new(),
        );
        let departments = DepartmentService::new(storage.departments());
        Self {
            metrics,
            employees,
            departments,
        }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn employees(&self) -> &Employees {
        &self.employees
    }

    pub fn departments(&self) -> &Departments {
        &self.departments
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route(
            "/departments/",
            get(departments::list).post(departments::create),
        )
        .route(
            "/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/departments/:id",
            get(departments::get).delete(departments::delete),
        )
        .route("/employees/", get(employees::list).post(employees::create))
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/:id",
            get(employees::get)
                .put(employees::update)
                .delete(employees::delete),
        )
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        Body::from(body),
    )
}
