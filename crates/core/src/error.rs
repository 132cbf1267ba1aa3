use thiserror::Error;

/// Boxed backend error carried through the repository ports.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by repository port implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record with id {0}")]
    UnknownId(String),
    #[error("store backend error: {0}")]
    Backend(#[source] BackendError),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Errors returned by the employee and department services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid employee id: {0}")]
    EmployeeNotFound(String),
    #[error("Invalid department id: {0}")]
    DepartmentNotFound(String),
    #[error("Invalid employee {field}: {value}")]
    InvalidField { field: &'static str, value: String },
    /// Reserved for department name uniqueness; nothing raises it yet.
    #[error("The given department name already exists: {0}")]
    DuplicateDepartment(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidField,
    DuplicateDepartment,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound(_) | Self::DepartmentNotFound(_) => ErrorKind::NotFound,
            Self::InvalidField { .. } => ErrorKind::InvalidField,
            Self::DuplicateDepartment(_) => ErrorKind::DuplicateDepartment,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine readable identifier for the error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound(_) => "employee_not_found",
            Self::DepartmentNotFound(_) => "department_not_found",
            Self::InvalidField { .. } => "invalid_field",
            Self::DuplicateDepartment(_) => "duplicate_department",
            Self::Store(_) => "storage_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_share_a_kind() {
        assert_eq!(
            ServiceError::EmployeeNotFound("e".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::DepartmentNotFound("d".into()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = ServiceError::DepartmentNotFound("unknown-id".into());
        assert_eq!(err.to_string(), "Invalid department id: unknown-id");

        let err = ServiceError::InvalidField {
            field: "name",
            value: String::new(),
        };
        assert_eq!(err.to_string(), "Invalid employee name: ");
    }

    #[test]
    fn store_errors_are_internal() {
        let err: ServiceError = StoreError::backend(std::io::Error::other("disk gone")).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), "storage_error");
    }
}
