use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod validation;

pub use validation::{FieldError, FieldErrorKind, FormField};

/// Represents an employee record as returned by the collection service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Server-assigned opaque identifier (UUID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Externally assigned identifier, unique within the collection (e.g. "EMP001")
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    /// RFC 3339 timestamp, assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request for creating a new employee (an employee without server fields)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Attendance status for a single day
///
/// The set is closed: any other wire value decodes to `Unrecognized` so that a
/// single anomalous row does not fail a whole list payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    #[serde(other)]
    Unrecognized,
}

/// A daily attendance mark for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Server-assigned opaque identifier
    pub id: String,
    /// Reference to `Employee::employee_id`
    pub employee_id: String,
    /// Calendar date (YYYY-MM-DD), no time component
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Denormalized for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// Denormalized for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_department: Option<String>,
}

/// Request for marking attendance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Error payload returned by the collection service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Health check payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

impl Employee {
    /// Label used by employee selectors, e.g. "EMP001 - Jane Doe (IT)"
    pub fn display_label(&self) -> String {
        format!("{} - {} ({})", self.employee_id, self.full_name, self.department)
    }
}

impl CreateEmployeeRequest {
    /// Copy of the request with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
        }
    }
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Unrecognized => "Unrecognized",
        }
    }

    /// Decode a stored or transmitted status; anything else is `Unrecognized`
    pub fn from_wire(value: &str) -> Self {
        match value {
            "Present" => AttendanceStatus::Present,
            "Absent" => AttendanceStatus::Absent,
            _ => AttendanceStatus::Unrecognized,
        }
    }

    /// Whether this is one of the two values the service accepts
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AttendanceStatus::Unrecognized)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
        }
    }

    /// Extract the human-readable `detail` string from a raw response body.
    ///
    /// Returns `None` when the body is not JSON, has no `detail` field, or the
    /// field is not a string (e.g. a list of validation entries).
    pub fn detail_from(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("detail")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }
}
