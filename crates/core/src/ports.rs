//! Persistence ports consumed by the services.
//!
//! Implementations live in the storage crate; the services only see these
//! traits and receive them through their constructors.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Department, Employee};

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Inserts or fully replaces the employee, assigning an id when absent.
    async fn save(&self, employee: Employee) -> Result<Employee, StoreError>;

    /// Fails with [`StoreError::UnknownId`] when no row matches.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Department>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Department>, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Inserts or fully replaces the department, assigning an id when absent.
    async fn save(&self, department: Department) -> Result<Department, StoreError>;

    /// Fails with [`StoreError::UnknownId`] when no row matches.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}
