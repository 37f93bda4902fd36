//! Client-side data layer for HRMS Lite.
//!
//! `services` talks to the collection service (transport, typed accessors,
//! filters), `hooks` holds the per-view synchronization and form state the
//! presentation layer binds to.

pub mod hooks;
pub mod services;

pub use hooks::use_attendance::{AttendanceForm, AttendanceView};
pub use hooks::use_collection::{
    CollectionSource, CollectionSync, EmployeeAttendanceSource, ScrollIntoView, ScrollTimer,
    SyncPhase,
};
pub use hooks::use_dashboard::DashboardView;
pub use hooks::use_employees::{EmployeeForm, EmployeesView, DELETE_CONFIRMATION};
pub use hooks::use_form::{FieldErrors, SubmitError};
pub use services::api::{ApiClient, ApiError, HttpTransport, Transport};
pub use services::attendance::AttendanceApi;
pub use services::config::ClientConfig;
pub use services::employees::EmployeeApi;
pub use services::filters::{daily_stats, filter_by_employee, today_stats, DailyStats};
pub use services::notifications::{
    LogNotifier, Notification, NotificationLevel, NotificationQueue, Notifier,
};
