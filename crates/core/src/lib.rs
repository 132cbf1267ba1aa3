//! Domain types, repository ports and services for the employee directory.

pub mod error;
pub mod ports;
pub mod service;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, ServiceError, ServiceResult, StoreError};
pub use ports::{DepartmentStore, EmployeeStore};
pub use service::{DepartmentService, EmployeeService};
pub use types::{Department, Employee, Task};
pub use validation::FieldValidator;
