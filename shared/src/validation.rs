//! Field-level validation rules for employee and attendance input.
//!
//! The same rules run in the client before a request is issued and in the
//! service before anything is persisted. Every failing field is reported;
//! validation never stops at the first error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CreateEmployeeRequest, MarkAttendanceRequest};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    EmployeeId,
    FullName,
    Email,
    Department,
    Date,
    Status,
}

/// Kind of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    Format,
    FutureDate,
    UnknownStatus,
}

/// A validation error attached to a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FormField {
    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        match self {
            FormField::EmployeeId => "employee_id",
            FormField::FullName => "full_name",
            FormField::Email => "email",
            FormField::Department => "department",
            FormField::Date => "date",
            FormField::Status => "status",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FormField::EmployeeId => "Employee ID",
            FormField::FullName => "Full name",
            FormField::Email => "Email",
            FormField::Department => "Department",
            FormField::Date => "Date",
            FormField::Status => "Status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldError {
    pub fn required(field: FormField) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
            message: format!("{} is required", field.label()),
        }
    }

    fn new(field: FormField, kind: FieldErrorKind, message: &str) -> Self {
        Self {
            field,
            kind,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Empty or whitespace-only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validate an employee submission, reporting every failing field
pub fn validate_employee(request: &CreateEmployeeRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&request.employee_id) {
        errors.push(FieldError::required(FormField::EmployeeId));
    }

    if is_blank(&request.full_name) {
        errors.push(FieldError::required(FormField::FullName));
    }

    if is_blank(&request.email) {
        errors.push(FieldError::required(FormField::Email));
    } else if !is_valid_email(&request.email) {
        errors.push(FieldError::new(
            FormField::Email,
            FieldErrorKind::Format,
            "Invalid email format",
        ));
    }

    if is_blank(&request.department) {
        errors.push(FieldError::required(FormField::Department));
    }

    errors
}

/// Validate an attendance mark relative to `today` (client local date)
pub fn validate_attendance(request: &MarkAttendanceRequest, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&request.employee_id) {
        errors.push(FieldError::new(
            FormField::EmployeeId,
            FieldErrorKind::Required,
            "Please select an employee",
        ));
    }

    if request.date > today {
        errors.push(FieldError::new(
            FormField::Date,
            FieldErrorKind::FutureDate,
            "Attendance date cannot be in the future",
        ));
    }

    if !request.status.is_recognized() {
        errors.push(FieldError::new(
            FormField::Status,
            FieldErrorKind::UnknownStatus,
            "Status must be either Present or Absent",
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttendanceStatus;

    fn valid_employee() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            employee_id: "EMP001".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            department: "IT".to_string(),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+hr@mail.example.co"));

        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn test_valid_employee_has_no_errors() {
        assert!(validate_employee(&valid_employee()).is_empty());
    }

    #[test]
    fn test_bad_email_reports_single_format_error() {
        let request = CreateEmployeeRequest {
            email: "bad".to_string(),
            ..valid_employee()
        };

        let errors = validate_employee(&request);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::Email);
        assert_eq!(errors[0].kind, FieldErrorKind::Format);
        assert_eq!(errors[0].message, "Invalid email format");
    }

    #[test]
    fn test_all_fields_empty_reports_four_required_errors() {
        let errors = validate_employee(&CreateEmployeeRequest::default());
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.kind == FieldErrorKind::Required));

        let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::EmployeeId,
                FormField::FullName,
                FormField::Email,
                FormField::Department
            ]
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let request = CreateEmployeeRequest {
            full_name: "   ".to_string(),
            department: "\t".to_string(),
            ..valid_employee()
        };

        let errors = validate_employee(&request);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], FieldError::required(FormField::FullName));
        assert_eq!(errors[1].message, "Department is required");
    }

    #[test]
    fn test_attendance_rules() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let mut request = MarkAttendanceRequest {
            employee_id: "EMP001".to_string(),
            date: today,
            status: AttendanceStatus::Present,
        };
        assert!(validate_attendance(&request, today).is_empty());

        request.date = today.pred_opt().unwrap();
        assert!(validate_attendance(&request, today).is_empty());

        request.employee_id = String::new();
        request.date = today.succ_opt().unwrap();
        request.status = AttendanceStatus::Unrecognized;
        let kinds: Vec<FieldErrorKind> = validate_attendance(&request, today)
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FieldErrorKind::Required,
                FieldErrorKind::FutureDate,
                FieldErrorKind::UnknownStatus
            ]
        );
    }
}
