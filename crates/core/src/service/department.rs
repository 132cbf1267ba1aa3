use tracing::info;

use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::ports::DepartmentStore;
use crate::types::Department;

/// Department lifecycle operations. No field validation is applied.
#[derive(Clone)]
pub struct DepartmentService<D> {
    departments: D,
}

impl<D: DepartmentStore> DepartmentService<D> {
    pub fn new(departments: D) -> Self {
        Self { departments }
    }

    pub async fn find_all_departments(&self) -> ServiceResult<Vec<Department>> {
        Ok(self.departments.find_all().await?)
    }

    pub async fn find_department(&self, id: &str) -> ServiceResult<Department> {
        let department = self
            .departments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::DepartmentNotFound(id.to_string()))?;

        info!(stage = "service", %department, "found department");
        Ok(department)
    }

    pub async fn save_department(&self, department: Department) -> ServiceResult<Department> {
        info!(stage = "service", %department, "saving department");
        Ok(self.departments.save(department).await?)
    }

    pub async fn delete_department(&self, id: &str) -> ServiceResult<()> {
        match self.departments.delete_by_id(id).await {
            Ok(()) => {
                info!(stage = "service", department_id = id, "deleted department");
                Ok(())
            }
            Err(StoreError::UnknownId(_)) => Err(ServiceError::DepartmentNotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}
