use std::sync::Arc;

use shared::{AttendanceRecord, Employee};

use crate::hooks::use_collection::{CollectionSync, SyncPhase};
use crate::services::api::{ApiClient, ApiError};
use crate::services::attendance::AttendanceApi;
use crate::services::date_utils;
use crate::services::employees::EmployeeApi;
use crate::services::filters::{self, DailyStats};

/// Summary counts shown on the landing page
pub struct DashboardView {
    employees: CollectionSync<EmployeeApi>,
    attendance: CollectionSync<AttendanceApi>,
}

impl DashboardView {
    pub fn new(client: ApiClient) -> Self {
        let scroll_delay = client.config().scroll_delay;
        Self {
            employees: CollectionSync::new(EmployeeApi::new(client.clone()), scroll_delay),
            attendance: CollectionSync::new(AttendanceApi::new(client), scroll_delay),
        }
    }

    pub async fn mount(&self) -> Result<(), ApiError> {
        let (employees, attendance) = tokio::join!(self.employees.mount(), self.attendance.mount());
        employees.and(attendance)
    }

    pub async fn refresh(&self) -> Result<(), ApiError> {
        let (employees, attendance) =
            tokio::join!(self.employees.refresh(), self.attendance.refresh());
        employees.and(attendance)
    }

    pub fn is_loading(&self) -> bool {
        self.employees.phase() != SyncPhase::Ready || self.attendance.phase() != SyncPhase::Ready
    }

    pub fn total_employees(&self) -> usize {
        self.employees.snapshot().len()
    }

    pub fn employees(&self) -> Arc<[Employee]> {
        self.employees.snapshot()
    }

    pub fn attendance(&self) -> Arc<[AttendanceRecord]> {
        self.attendance.snapshot()
    }

    pub fn today_stats(&self) -> DailyStats {
        filters::today_stats(&self.attendance.snapshot())
    }

    /// Heading for today's figures, e.g. "January 15, 2025"
    pub fn today_label(&self) -> String {
        date_utils::format_display(date_utils::today())
    }
}
