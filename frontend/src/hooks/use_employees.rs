use std::sync::Arc;

use shared::validation::validate_employee;
use shared::{CreateEmployeeRequest, Employee, FormField};
use tokio::sync::mpsc;

use crate::hooks::use_collection::{CollectionSync, ScrollIntoView, SyncPhase};
use crate::hooks::use_form::{FieldErrors, SubmitError};
use crate::services::api::{ApiClient, ApiError};
use crate::services::employees::EmployeeApi;
use crate::services::notifications::{Notification, Notifier};

pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this employee? This will also delete all attendance records.";
pub const EMPLOYEE_ADDED: &str = "Employee added successfully";
pub const EMPLOYEE_DELETED: &str = "Employee deleted successfully";

/// Add-employee form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    values: CreateEmployeeRequest,
    errors: FieldErrors,
    is_submitting: bool,
}

impl EmployeeForm {
    pub fn values(&self) -> &CreateEmployeeRequest {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Update one input. Non-employee fields are ignored.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::EmployeeId => &mut self.values.employee_id,
            FormField::FullName => &mut self.values.full_name,
            FormField::Email => &mut self.values.email,
            FormField::Department => &mut self.values.department,
            FormField::Date | FormField::Status => return,
        };
        *slot = value.into();
        self.errors.clear_field(field);
    }

    /// Run every field rule; returns true when the form may be submitted
    pub fn validate(&mut self) -> bool {
        self.errors.replace(validate_employee(&self.values));
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.values = CreateEmployeeRequest::default();
        self.errors.clear();
    }
}

/// Employee list with its add form and delete action
pub struct EmployeesView {
    employees: CollectionSync<EmployeeApi>,
    form: EmployeeForm,
    deleting_id: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl EmployeesView {
    pub fn new(client: ApiClient) -> Self {
        let scroll_delay = client.config().scroll_delay;
        let notifier = client.notifier();
        Self {
            employees: CollectionSync::new(EmployeeApi::new(client), scroll_delay),
            form: EmployeeForm::default(),
            deleting_id: None,
            notifier,
        }
    }

    /// Signals to bring the employee list into view after an add
    pub fn subscribe_scroll(&mut self) -> mpsc::UnboundedReceiver<ScrollIntoView> {
        self.employees.subscribe_scroll()
    }

    pub async fn mount(&self) -> Result<(), ApiError> {
        self.employees.mount().await
    }

    pub fn employees(&self) -> Arc<[Employee]> {
        self.employees.snapshot()
    }

    pub fn phase(&self) -> SyncPhase {
        self.employees.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.employees.is_loading()
    }

    pub fn form(&self) -> &EmployeeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EmployeeForm {
        &mut self.form
    }

    /// Employee currently being deleted, if any
    pub fn deleting_id(&self) -> Option<&str> {
        self.deleting_id.as_deref()
    }

    /// Validate and create the employee, then refetch the list
    pub async fn submit(&mut self) -> Result<Employee, SubmitError> {
        if !self.form.validate() {
            return Err(SubmitError::Invalid(self.form.errors.all().to_vec()));
        }

        self.form.is_submitting = true;
        let request = self.form.values.trimmed();
        let result = self.employees.source().create(&request).await;
        self.form.is_submitting = false;

        let created = result?;
        tracing::info!(
            component = "employees",
            employee_id = %created.employee_id,
            "employee created"
        );
        self.notifier.notify(Notification::success(EMPLOYEE_ADDED));
        self.form.reset();

        // A failed refetch is already reported; the create itself succeeded
        let _ = self.employees.after_mutation(true).await;
        Ok(created)
    }

    /// Delete an employee (and, on the service side, their attendance). The
    /// caller is expected to have confirmed with `DELETE_CONFIRMATION`.
    pub async fn delete_employee(&mut self, employee_id: &str) -> Result<(), ApiError> {
        self.deleting_id = Some(employee_id.to_string());
        let result = self.employees.source().delete(employee_id).await;
        self.deleting_id = None;

        result?;
        tracing::info!(component = "employees", employee_id, "employee deleted");
        self.notifier.notify(Notification::success(EMPLOYEE_DELETED));

        let _ = self.employees.after_mutation(false).await;
        Ok(())
    }

    pub fn teardown(&self) {
        self.employees.teardown();
    }
}
