use shared::{AttendanceRecord, MarkAttendanceRequest};

use crate::services::api::{ApiClient, ApiError, ApiRequest};

const ATTENDANCE: [&str; 2] = ["api", "attendance"];

/// Typed access to the attendance collection
#[derive(Clone)]
pub struct AttendanceApi {
    client: ApiClient,
}

impl AttendanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn list_all(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.client.send(ApiRequest::get(&ATTENDANCE)).await
    }

    /// Records for one employee, filtered by the service
    pub async fn list_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.client
            .send(ApiRequest::get(&["api", "attendance", employee_id]))
            .await
    }

    pub async fn mark(
        &self,
        request: &MarkAttendanceRequest,
    ) -> Result<AttendanceRecord, ApiError> {
        self.client
            .send(ApiRequest::post(&ATTENDANCE).json(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils::FakeService;
    use chrono::NaiveDate;
    use shared::AttendanceStatus;

    fn mark(employee_id: &str, day: u32, status: AttendanceStatus) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            employee_id: employee_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            status,
        }
    }

    #[tokio::test]
    async fn test_mark_returns_denormalized_record() {
        let service = FakeService::new();
        service.seed_employee("EMP001", "Jane Doe", "IT");
        let (client, queue) = service.client();
        let api = AttendanceApi::new(client);

        let record = api.mark(&mark("EMP001", 14, AttendanceStatus::Absent)).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.employee_name.as_deref(), Some("Jane Doe"));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_employee_is_filtered_by_service() {
        let service = FakeService::new();
        service.seed_employee("EMP001", "Jane Doe", "IT");
        service.seed_employee("EMP002", "John Roe", "HR");
        let (client, _queue) = service.client();
        let api = AttendanceApi::new(client);

        api.mark(&mark("EMP001", 13, AttendanceStatus::Present)).await.unwrap();
        api.mark(&mark("EMP002", 13, AttendanceStatus::Absent)).await.unwrap();
        api.mark(&mark("EMP001", 14, AttendanceStatus::Present)).await.unwrap();

        let all = api.list_all().await.unwrap();
        let jane = api.list_by_employee("EMP001").await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(jane.len(), 2);
        assert!(jane.iter().all(|r| r.employee_id == "EMP001"));
    }

    #[tokio::test]
    async fn test_mark_for_unknown_employee_is_rejected() {
        let service = FakeService::new();
        let (client, queue) = service.client();
        let api = AttendanceApi::new(client);

        let error = api.mark(&mark("EMP404", 14, AttendanceStatus::Present)).await.unwrap_err();
        assert_eq!(error.to_string(), "Employee with ID 'EMP404' not found");
        assert_eq!(queue.drain()[0].message, "Employee with ID 'EMP404' not found");
    }
}
