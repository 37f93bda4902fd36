use anyhow::{Context, Result};
use chrono::NaiveDate;
use shared::{AttendanceRecord, AttendanceStatus, Employee};
use sqlx::sqlite::{SqlitePoolOptions, SqliteQueryResult, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

const EMPLOYEE_COLUMNS: &str = "id, employee_id, full_name, email, department, created_at";

const ATTENDANCE_SELECT: &str = r#"
    SELECT a.id, a.employee_id, a.date, a.status, a.created_at,
           e.full_name AS employee_name, e.department AS employee_department
    FROM attendance a
    LEFT JOIN employees e ON e.employee_id = a.employee_id
"#;

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url`
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database, gone when the connection drops
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id TEXT PRIMARY KEY,
                employee_id TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id TEXT PRIMARY KEY,
                employee_id TEXT NOT NULL REFERENCES employees(employee_id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (employee_id, date)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance (date)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All employees, newest first
    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM employees ORDER BY created_at DESC, rowid DESC",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    pub async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM employees WHERE employee_id = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(employee_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM employees WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.is_some())
    }

    /// Returns false if the employee id or email is already taken
    pub async fn insert_employee(&self, employee: &Employee) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO employees (id, employee_id, full_name, email, department, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(employee.id.as_deref())
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.department)
        .bind(employee.created_at.as_deref())
        .execute(self.pool())
        .await;
        inserted(result)
    }

    /// Delete an employee and all of their attendance in one transaction.
    /// Returns false if no such employee exists.
    pub async fn delete_employee(&self, employee_id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::debug!(employee_id, attendance_removed = removed, "employee deleted");
        Ok(true)
    }

    /// All attendance with employee details, most recent date first
    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY a.date DESC, a.created_at DESC, a.rowid DESC",
            ATTENDANCE_SELECT
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(attendance_from_row).collect()
    }

    pub async fn list_attendance_for(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE a.employee_id = ? ORDER BY a.date DESC, a.created_at DESC, a.rowid DESC",
            ATTENDANCE_SELECT
        ))
        .bind(employee_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(attendance_from_row).collect()
    }

    pub async fn attendance_exists(&self, employee_id: &str, date: NaiveDate) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM attendance WHERE employee_id = ? AND date = ?")
            .bind(employee_id)
            .bind(date.format("%Y-%m-%d").to_string())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.is_some())
    }

    /// Returns false if the employee already has a mark on that date
    pub async fn insert_attendance(&self, record: &AttendanceRecord) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO attendance (id, employee_id, date, status, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.employee_id)
        .bind(record.date.format("%Y-%m-%d").to_string())
        .bind(record.status.as_str())
        .bind(record.created_at.as_deref())
        .execute(self.pool())
        .await;
        inserted(result)
    }
}

fn inserted(result: sqlx::Result<SqliteQueryResult>) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn employee_from_row(row: &SqliteRow) -> Employee {
    Employee {
        id: Some(row.get("id")),
        employee_id: row.get("employee_id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        department: row.get("department"),
        created_at: Some(row.get("created_at")),
    }
}

fn attendance_from_row(row: &SqliteRow) -> Result<AttendanceRecord> {
    let date: String = row.get("date");
    let status: String = row.get("status");

    Ok(AttendanceRecord {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("invalid attendance date '{}'", date))?,
        status: AttendanceStatus::from_wire(&status),
        created_at: Some(row.get("created_at")),
        employee_name: row.get("employee_name"),
        employee_department: row.get("employee_department"),
    })
}
