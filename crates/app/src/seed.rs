use tracing::info;

use employee_directory_core::{Department, DepartmentStore, DepartmentService, ServiceResult};

const SAMPLE_DEPARTMENTS: [&str; 3] = ["The Testers", "Engineering", "Human Resources"];

/// Creates the sample departments when the store holds none yet.
///
/// Returns the number of departments created.
pub async fn seed_departments<D: DepartmentStore>(
    departments: &DepartmentService<D>,
) -> ServiceResult<usize> {
    if !departments.find_all_departments().await?.is_empty() {
        info!(stage = "seed", "departments already present, skipping seed data");
        return Ok(0);
    }

    for name in SAMPLE_DEPARTMENTS {
        let department = departments
            .save_department(Department::new(name))
            .await?;
        info!(stage = "seed", %department, "seeded department");
    }
    Ok(SAMPLE_DEPARTMENTS.len())
}
