use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use employee_directory_core::{
    Department, DepartmentStore, Employee, EmployeeStore, StoreError, Task,
};

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = connect_options(database_url)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Opens a private in-memory database backed by a single long-lived connection.
    pub async fn connect_in_memory() -> Result<Self, StorageError> {
        let options = connect_options("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Returns a handle to the employees table.
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle to the departments table.
    pub fn departments(&self) -> DepartmentRepository {
        DepartmentRepository {
            pool: self.pool.clone(),
        }
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(StorageError::Connect)?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000));
    Ok(options)
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
}

/// Repository backed by the `employees` table.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, full_name, department_id, has_task, task_title, task_description \
             FROM employees ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(EmployeeRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, full_name, department_id, has_task, task_title, task_description \
             FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(EmployeeRow::into_domain))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        exists(&self.pool, "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?)", id).await
    }

    async fn save(&self, employee: Employee) -> Result<Employee, StoreError> {
        let id = employee.id.unwrap_or_else(generate_id);
        let has_task = employee.current_task.is_some();
        let (task_title, task_description) = match employee.current_task {
            Some(task) => (task.title, task.description),
            None => (None, None),
        };
        let now = to_rfc3339(Utc::now());

        let row = sqlx::query_as::<_, EmployeeRow>(
            "INSERT INTO employees \
             (id, full_name, department_id, has_task, task_title, task_description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE \
             SET full_name = excluded.full_name, \
                 department_id = excluded.department_id, \
                 has_task = excluded.has_task, \
                 task_title = excluded.task_title, \
                 task_description = excluded.task_description, \
                 updated_at = excluded.updated_at \
             RETURNING id, full_name, department_id, has_task, task_title, task_description",
        )
        .bind(&id)
        .bind(employee.full_name.unwrap_or_default())
        .bind(employee.department_id.unwrap_or_default())
        .bind(has_task)
        .bind(task_title)
        .bind(task_description)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        debug!(stage = "storage", employee_id = %id, "employee row written");
        Ok(row.into_domain())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        delete(&self.pool, "DELETE FROM employees WHERE id = ?", id).await
    }
}

/// Row shape of the `employees` table.
#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    full_name: String,
    department_id: String,
    has_task: bool,
    task_title: Option<String>,
    task_description: Option<String>,
}

impl EmployeeRow {
    fn into_domain(self) -> Employee {
        let current_task = self.has_task.then(|| Task {
            title: self.task_title,
            description: self.task_description,
        });
        Employee {
            id: Some(self.id),
            full_name: Some(self.full_name),
            department_id: Some(self.department_id),
            current_task,
        }
    }
}

/// Repository backed by the `departments` table.
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

#[async_trait]
impl DepartmentStore for DepartmentRepository {
    async fn find_all(&self) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, name FROM departments ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(DepartmentRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Department>, StoreError> {
        let row = sqlx::query_as::<_, DepartmentRow>("SELECT id, name FROM departments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(row.map(DepartmentRow::into_domain))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        exists(&self.pool, "SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)", id).await
    }

    async fn save(&self, department: Department) -> Result<Department, StoreError> {
        let id = department.id.unwrap_or_else(generate_id);
        let now = to_rfc3339(Utc::now());

        let row = sqlx::query_as::<_, DepartmentRow>(
            "INSERT INTO departments (id, name, created_at, updated_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE \
             SET name = excluded.name, updated_at = excluded.updated_at \
             RETURNING id, name",
        )
        .bind(&id)
        .bind(&department.name)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        debug!(stage = "storage", department_id = %id, "department row written");
        Ok(row.into_domain())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        delete(&self.pool, "DELETE FROM departments WHERE id = ?", id).await
    }
}

/// Row shape of the `departments` table.
#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: String,
    name: Option<String>,
}

impl DepartmentRow {
    fn into_domain(self) -> Department {
        Department {
            id: Some(self.id),
            name: self.name,
        }
    }
}

async fn exists(pool: &SqlitePool, sql: &str, id: &str) -> Result<bool, StoreError> {
    let found: i64 = sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(StoreError::backend)?;
    Ok(found != 0)
}

async fn delete(pool: &SqlitePool, sql: &str, id: &str) -> Result<(), StoreError> {
    let result = sqlx::query(sql)
        .bind(id)
        .execute(pool)
        .await
        .map_err(StoreError::backend)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::UnknownId(id.to_string()));
    }
    Ok(())
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

fn to_rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> Database {
        let db = Database::connect_in_memory().await.expect("connect");
        db.run_migrations().await.expect("migrations");
        sqlx::query(
            "INSERT INTO departments (id, name, created_at, updated_at) \
             VALUES ('1A2B3C4D', 'The Testers', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .expect("insert department");
        db
    }

    #[tokio::test]
    async fn migrations_apply() {
        let db = Database::connect_in_memory().await.expect("connect");
        db.run_migrations().await.expect("migrations");

        let tables: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('employees', 'departments')",
        )
        .fetch_one(db.pool())
        .await
        .expect("fetch tables");
        assert_eq!(tables.0, 2);
    }

    #[tokio::test]
    async fn department_save_assigns_uuid() {
        let db = setup_db().await;
        let saved = db
            .departments()
            .save(Department::new("Accounts"))
            .await
            .expect("save");

        let id = saved.id.expect("id assigned");
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(saved.name.as_deref(), Some("Accounts"));
        assert!(db.departments().exists_by_id(&id).await.expect("exists"));
    }

    #[tokio::test]
    async fn department_find_all_lists_rows() {
        let db = setup_db().await;
        db.departments()
            .save(Department::new("Accounts"))
            .await
            .expect("save");

        let all = db.departments().find_all().await.expect("list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id.as_deref(), Some("1A2B3C4D"));
    }

    #[tokio::test]
    async fn department_find_by_id_misses_unknown() {
        let db = setup_db().await;
        let found = db.departments().find_by_id("missing").await.expect("query");
        assert!(found.is_none());
        assert!(!db.departments().exists_by_id("missing").await.expect("exists"));
    }

    #[tokio::test]
    async fn delete_unknown_reports_unknown_id() {
        let db = setup_db().await;
        let err = db
            .employees()
            .delete_by_id("missing")
            .await
            .expect_err("nothing to delete");
        assert!(matches!(err, StoreError::UnknownId(id) if id == "missing"));

        db.departments()
            .delete_by_id("1A2B3C4D")
            .await
            .expect("department delete");
        assert!(db
            .departments()
            .find_by_id("1A2B3C4D")
            .await
            .expect("query")
            .is_none());
    }

    #[tokio::test]
    async fn employee_task_round_trips() {
        let db = setup_db().await;
        let repo = db.employees();
        let saved = repo
            .save(
                Employee::new("Bob", "1A2B3C4D")
                    .with_task(Task::new("Testing Task", "Keep on testing.")),
            )
            .await
            .expect("save");

        let id = saved.id.clone().expect("id assigned");
        let fetched = repo.find_by_id(&id).await.expect("query").expect("row");
        assert_eq!(fetched, saved);
        assert_eq!(
            fetched.current_task,
            Some(Task::new("Testing Task", "Keep on testing."))
        );
    }

    #[tokio::test]
    async fn partial_task_keeps_absent_fields() {
        let db = setup_db().await;
        let repo = db.employees();
        let task = Task {
            title: Some("only".to_string()),
            description: None,
        };
        let saved = repo
            .save(Employee::new("Bob", "1A2B3C4D").with_task(task.clone()))
            .await
            .expect("save");
        let id = saved.id.expect("id assigned");

        let fetched = repo.find_by_id(&id).await.expect("query").expect("row");
        assert_eq!(fetched.current_task, Some(task));

        let empty = repo
            .save(Employee::new("Ann", "1A2B3C4D").with_task(Task::default()))
            .await
            .expect("save");
        assert_eq!(empty.current_task, Some(Task::default()));
    }

    #[tokio::test]
    async fn department_without_name_is_stored() {
        let db = setup_db().await;
        let saved = db
            .departments()
            .save(Department::default())
            .await
            .expect("save");
        let id = saved.id.expect("id assigned");

        let found = db
            .departments()
            .find_by_id(&id)
            .await
            .expect("query")
            .expect("row");
        assert_eq!(found.name, None);
    }

    #[tokio::test]
    async fn employee_save_with_existing_id_replaces_row() {
        let db = setup_db().await;
        let repo = db.employees();
        let saved = repo
            .save(
                Employee::new("Bob", "1A2B3C4D").with_task(Task::new("Old", "Old task")),
            )
            .await
            .expect("insert");
        let id = saved.id.clone().expect("id");

        let replaced = repo
            .save(Employee::new("Robert", "1A2B3C4D").with_id(id.clone()))
            .await
            .expect("replace");
        assert_eq!(replaced.id.as_deref(), Some(id.as_str()));
        assert_eq!(replaced.full_name.as_deref(), Some("Robert"));
        assert!(replaced.current_task.is_none());

        let all = repo.find_all().await.expect("list");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn records_survive_reconnect() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("directory.db").display()
        );

        let id = {
            let db = Database::connect(&url).await.expect("connect");
            db.run_migrations().await.expect("migrations");
            let saved = db
                .departments()
                .save(Department::new("The Testers"))
                .await
                .expect("save");
            db.pool().close().await;
            saved.id.expect("id")
        };

        let db = Database::connect(&url).await.expect("reconnect");
        db.run_migrations().await.expect("migrations are idempotent");
        let found = db.departments().find_by_id(&id).await.expect("query");
        assert_eq!(found.and_then(|d| d.name).as_deref(), Some("The Testers"));
    }
}
