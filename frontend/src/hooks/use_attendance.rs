use std::sync::Arc;

use chrono::NaiveDate;
use shared::validation::validate_attendance;
use shared::{AttendanceRecord, AttendanceStatus, Employee, FormField, MarkAttendanceRequest};
use tokio::sync::mpsc;

use crate::hooks::use_collection::{CollectionSync, ScrollIntoView, SyncPhase};
use crate::hooks::use_form::{FieldErrors, SubmitError};
use crate::services::api::{ApiClient, ApiError};
use crate::services::attendance::AttendanceApi;
use crate::services::date_utils;
use crate::services::employees::EmployeeApi;
use crate::services::filters::{self, DailyStats};
use crate::services::notifications::{Notification, Notifier};

pub const ATTENDANCE_MARKED: &str = "Attendance marked successfully";

/// Mark-attendance form state. Date and status always hold a value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceForm {
    employee_id: String,
    date: NaiveDate,
    status: AttendanceStatus,
    errors: FieldErrors,
    is_submitting: bool,
}

impl AttendanceForm {
    /// Empty selection, `today`, Present
    pub fn new(today: NaiveDate) -> Self {
        Self {
            employee_id: String::new(),
            date: today,
            status: AttendanceStatus::Present,
            errors: FieldErrors::default(),
            is_submitting: false,
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn select_employee(&mut self, employee_id: impl Into<String>) {
        self.employee_id = employee_id.into();
        self.errors.clear_field(FormField::EmployeeId);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.errors.clear_field(FormField::Date);
    }

    pub fn set_status(&mut self, status: AttendanceStatus) {
        self.status = status;
        self.errors.clear_field(FormField::Status);
    }

    pub fn request(&self) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            employee_id: self.employee_id.trim().to_string(),
            date: self.date,
            status: self.status,
        }
    }

    pub fn validate(&mut self, today: NaiveDate) -> bool {
        self.errors.replace(validate_attendance(&self.request(), today));
        self.errors.is_empty()
    }
}

/// Attendance records with the mark form, employee selector and filter
pub struct AttendanceView {
    attendance: CollectionSync<AttendanceApi>,
    employees: CollectionSync<EmployeeApi>,
    form: AttendanceForm,
    filter_employee_id: String,
    notifier: Arc<dyn Notifier>,
}

impl AttendanceView {
    pub fn new(client: ApiClient) -> Self {
        let scroll_delay = client.config().scroll_delay;
        let notifier = client.notifier();
        Self {
            attendance: CollectionSync::new(AttendanceApi::new(client.clone()), scroll_delay),
            employees: CollectionSync::new(EmployeeApi::new(client), scroll_delay),
            form: AttendanceForm::new(date_utils::today()),
            filter_employee_id: String::new(),
            notifier,
        }
    }

    /// Signals to bring the records list into view after a mark
    pub fn subscribe_scroll(&mut self) -> mpsc::UnboundedReceiver<ScrollIntoView> {
        self.attendance.subscribe_scroll()
    }

    /// Load attendance and the employee selector together
    pub async fn mount(&self) -> Result<(), ApiError> {
        let (attendance, employees) = tokio::join!(self.attendance.mount(), self.employees.mount());
        attendance.and(employees)
    }

    pub fn phase(&self) -> SyncPhase {
        self.attendance.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.attendance.is_loading()
    }

    pub fn records(&self) -> Arc<[AttendanceRecord]> {
        self.attendance.snapshot()
    }

    pub fn employees(&self) -> Arc<[Employee]> {
        self.employees.snapshot()
    }

    /// `(employee_id, label)` pairs for the employee selector
    pub fn employee_options(&self) -> Vec<(String, String)> {
        self.employees
            .snapshot()
            .iter()
            .map(|employee| (employee.employee_id.clone(), employee.display_label()))
            .collect()
    }

    pub fn form(&self) -> &AttendanceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AttendanceForm {
        &mut self.form
    }

    /// Restrict `visible_records` to one employee; empty shows everyone
    pub fn set_filter(&mut self, employee_id: impl Into<String>) {
        self.filter_employee_id = employee_id.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter_employee_id
    }

    pub fn visible_records(&self) -> Vec<AttendanceRecord> {
        let snapshot = self.attendance.snapshot();
        filters::filter_by_employee(&snapshot, &self.filter_employee_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn stats_for(&self, day: NaiveDate) -> DailyStats {
        filters::daily_stats(&self.attendance.snapshot(), day)
    }

    pub fn today_stats(&self) -> DailyStats {
        filters::today_stats(&self.attendance.snapshot())
    }

    /// Validate and mark, then refetch the records
    ///
    /// On success the employee selection is cleared; date and status are kept.
    pub async fn submit(&mut self) -> Result<AttendanceRecord, SubmitError> {
        self.submit_as_of(date_utils::today()).await
    }

    async fn submit_as_of(&mut self, today: NaiveDate) -> Result<AttendanceRecord, SubmitError> {
        if !self.form.validate(today) {
            return Err(SubmitError::Invalid(self.form.errors.all().to_vec()));
        }

        self.form.is_submitting = true;
        let request = self.form.request();
        let result = self.attendance.source().mark(&request).await;
        self.form.is_submitting = false;

        let record = result?;
        tracing::info!(
            component = "attendance",
            employee_id = %record.employee_id,
            date = %record.date,
            status = %record.status,
            "attendance marked"
        );
        self.notifier.notify(Notification::success(ATTENDANCE_MARKED));
        self.form.select_employee(String::new());

        let _ = self.attendance.after_mutation(true).await;
        Ok(record)
    }

    pub fn teardown(&self) {
        self.attendance.teardown();
        self.employees.teardown();
    }
}
