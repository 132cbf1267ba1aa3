use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::ports::{DepartmentStore, EmployeeStore};
use crate::types::Employee;
use crate::validation::FieldValidator;

/// Employee lifecycle operations.
///
/// Every write checks that the referenced department exists and that the full
/// name is present. Updates are full replacements and go through the same
/// checks as a create.
#[derive(Clone)]
pub struct EmployeeService<E, D> {
    employees: E,
    departments: D,
    validator: FieldValidator,
}

impl<E, D> EmployeeService<E, D>
where
    E: EmployeeStore,
    D: DepartmentStore,
{
    pub fn new(employees: E, departments: D, validator: FieldValidator) -> Self {
        Self {
            employees,
            departments,
            validator,
        }
    }

    pub async fn find_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.find_all().await?)
    }

    pub async fn find_employee(&self, id: &str) -> ServiceResult<Employee> {
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::EmployeeNotFound(id.to_string()))?;

        info!(stage = "service", %employee, "found employee");
        Ok(employee)
    }

    /// Creates or replaces an employee.
    ///
    /// The department is checked before the name, so a candidate failing both
    /// reports the missing department.
    pub async fn save_employee(&self, employee: Employee) -> ServiceResult<Employee> {
        let department_known = match employee.department_id.as_deref() {
            Some(department_id) => self.departments.exists_by_id(department_id).await?,
            None => false,
        };
        if !department_known {
            let department_id = employee.department_id.clone().unwrap_or_default();
            warn!(stage = "service", %employee, "rejected employee with unknown department");
            return Err(ServiceError::DepartmentNotFound(department_id));
        }

        if !self
            .validator
            .validate_full_name(employee.full_name.as_deref())
        {
            warn!(stage = "service", %employee, "rejected employee with invalid name");
            return Err(ServiceError::InvalidField {
                field: "name",
                value: employee.full_name.clone().unwrap_or_default(),
            });
        }

        info!(stage = "service", %employee, "saving employee");
        Ok(self.employees.save(employee).await?)
    }

    /// Replaces an existing employee. Unknown ids fail before any other check.
    pub async fn update_employee(&self, employee: Employee) -> ServiceResult<Employee> {
        let exists = match employee.id.as_deref() {
            Some(id) => self.employees.exists_by_id(id).await?,
            None => false,
        };
        if !exists {
            return Err(ServiceError::EmployeeNotFound(
                employee.id.clone().unwrap_or_default(),
            ));
        }

        self.save_employee(employee).await
    }

    pub async fn delete_employee(&self, id: &str) -> ServiceResult<()> {
        match self.employees.delete_by_id(id).await {
            Ok(()) => {
                info!(stage = "service", employee_id = id, "deleted employee");
                Ok(())
            }
            Err(StoreError::UnknownId(_)) => Err(ServiceError::EmployeeNotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}
