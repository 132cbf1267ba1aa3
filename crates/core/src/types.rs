use std::fmt;

use serde::{Deserialize, Serialize};

/// Employee record as exchanged over the API and persisted by the store.
///
/// Every field is optional on input so that missing values can be reported by
/// the service layer instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub current_task: Option<Task>,
}

impl Employee {
    /// Builds a new, not yet persisted employee.
    pub fn new(full_name: impl Into<String>, department_id: impl Into<String>) -> Self {
        Self {
            id: None,
            full_name: Some(full_name.into()),
            department_id: Some(department_id.into()),
            current_task: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.current_task = Some(task);
        self
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee(id={}, full_name={}, department_id={})",
            self.id.as_deref().unwrap_or("-"),
            self.full_name.as_deref().unwrap_or("-"),
            self.department_id.as_deref().unwrap_or("-"),
        )
    }
}

/// Work item embedded in an employee. Has no identity of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// Department record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Department(id={}, name={})",
            self.id.as_deref().unwrap_or("-"),
            self.name.as_deref().unwrap_or("-"),
        )
    }
}
