use shared::{CreateEmployeeRequest, Employee};

use crate::services::api::{ApiClient, ApiError, ApiRequest};

const EMPLOYEES: [&str; 2] = ["api", "employees"];

/// Typed access to the employee collection
#[derive(Clone)]
pub struct EmployeeApi {
    client: ApiClient,
}

impl EmployeeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn list_all(&self) -> Result<Vec<Employee>, ApiError> {
        self.client.send(ApiRequest::get(&EMPLOYEES)).await
    }

    pub async fn create(&self, request: &CreateEmployeeRequest) -> Result<Employee, ApiError> {
        self.client
            .send(ApiRequest::post(&EMPLOYEES).json(request))
            .await
    }

    /// Delete an employee. The service also removes their attendance records.
    pub async fn delete(&self, employee_id: &str) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(&["api", "employees", employee_id]))
            .await
    }
}
