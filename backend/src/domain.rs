use crate::db::DbConnection;
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use shared::validation::{validate_attendance, validate_employee};
use shared::{
    AttendanceRecord, CreateEmployeeRequest, Employee, FieldError, MarkAttendanceRequest,
};
use tracing::info;

/// Failure of a service operation, mapped to an HTTP status by the REST layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{}", first_message(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn first_message(errors: &[FieldError]) -> &str {
    errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("Invalid request")
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn employee_not_found(employee_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Employee with ID '{}' not found", employee_id))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct EmployeeService {
    db: DbConnection,
}

impl EmployeeService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.db.list_employees().await?)
    }

    /// Create an employee. Both `employee_id` and `email` must be unused.
    pub async fn create(&self, request: CreateEmployeeRequest) -> ServiceResult<Employee> {
        let request = request.trimmed();
        let errors = validate_employee(&request);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        if self.db.find_employee(&request.employee_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Employee with ID '{}' already exists",
                request.employee_id
            )));
        }

        if self.db.email_exists(&request.email).await? {
            return Err(ServiceError::Conflict(format!(
                "Employee with email '{}' already exists",
                request.email
            )));
        }

        let employee = Employee {
            id: Some(uuid::Uuid::new_v4().to_string()),
            employee_id: request.employee_id,
            full_name: request.full_name,
            email: request.email,
            department: request.department,
            created_at: Some(timestamp()),
        };
        // A concurrent create can take the id or email after the checks above
        if !self.db.insert_employee(&employee).await? {
            return Err(ServiceError::Conflict(
                "Employee with this ID or email already exists".to_string(),
            ));
        }

        info!(employee_id = %employee.employee_id, "Created employee");
        Ok(employee)
    }

    /// Delete an employee together with their attendance records
    pub async fn delete(&self, employee_id: &str) -> ServiceResult<()> {
        if !self.db.delete_employee(employee_id).await? {
            return Err(employee_not_found(employee_id));
        }

        info!(employee_id, "Deleted employee and their attendance");
        Ok(())
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    db: DbConnection,
}

impl AttendanceService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<AttendanceRecord>> {
        Ok(self.db.list_attendance().await?)
    }

    pub async fn list_for_employee(
        &self,
        employee_id: &str,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        if self.db.find_employee(employee_id).await?.is_none() {
            return Err(employee_not_found(employee_id));
        }
        Ok(self.db.list_attendance_for(employee_id).await?)
    }

    /// Mark attendance as of the server's local date
    pub async fn mark(&self, request: MarkAttendanceRequest) -> ServiceResult<AttendanceRecord> {
        self.mark_as_of(request, Local::now().date_naive()).await
    }

    /// Mark attendance; `today` bounds the allowed date. One mark per employee per day.
    pub async fn mark_as_of(
        &self,
        request: MarkAttendanceRequest,
        today: NaiveDate,
    ) -> ServiceResult<AttendanceRecord> {
        let errors = validate_attendance(&request, today);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let employee_id = request.employee_id.trim();
        let employee = self
            .db
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| employee_not_found(employee_id))?;

        if self.db.attendance_exists(employee_id, request.date).await? {
            return Err(ServiceError::Conflict(format!(
                "Attendance already marked for employee '{}' on {}",
                employee_id, request.date
            )));
        }

        let record = AttendanceRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee.employee_id,
            date: request.date,
            status: request.status,
            created_at: Some(timestamp()),
            employee_name: Some(employee.full_name),
            employee_department: Some(employee.department),
        };
        if !self.db.insert_attendance(&record).await? {
            return Err(ServiceError::Conflict(
                "Attendance already marked for this employee on this date".to_string(),
            ));
        }

        info!(
            employee_id = %record.employee_id,
            date = %record.date,
            status = %record.status,
            "Marked attendance"
        );
        Ok(record)
    }
}
