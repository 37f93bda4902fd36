//! In-process transports for unit tests.
//!
//! `ScriptedTransport` replays canned responses in order. `FakeService` keeps
//! a small in-memory collection and answers the same routes as the real
//! service, so views can be driven through full mutate-then-refetch cycles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use shared::{AttendanceRecord, CreateEmployeeRequest, Employee, MarkAttendanceRequest};

use crate::services::api::{ApiClient, HttpRequest, RawResponse, Transport, TransportFailure};
use crate::services::config::ClientConfig;
use crate::services::notifications::NotificationQueue;

/// Replays queued replies, recording every request it receives
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RawResponse, TransportFailure>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn fail(&self, failure: TransportFailure) {
        self.replies.lock().unwrap().push_back(Err(failure));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::NoResponse("no scripted reply".to_string())))
    }
}

#[derive(Default)]
struct FakeState {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    next_id: u32,
}

/// In-memory stand-in for the collection service
#[derive(Default)]
pub struct FakeService {
    state: Mutex<FakeState>,
    requests: Mutex<Vec<HttpRequest>>,
    offline: AtomicBool,
    read_delays: Mutex<VecDeque<Duration>>,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build a client over this service with a fresh notification queue
    pub fn client(self: &Arc<Self>) -> (ApiClient, NotificationQueue) {
        let queue = NotificationQueue::new();
        let config = ClientConfig {
            scroll_delay: Duration::from_millis(30),
            ..ClientConfig::with_base_url("http://hr.test")
        };
        let transport: Arc<dyn Transport> = self.clone();
        let client = ApiClient::with_transport(&config, transport, Arc::new(queue.clone()));
        (client, queue)
    }

    pub fn seed_employee(&self, employee_id: &str, full_name: &str, department: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("emp-{}", state.next_id);
        state.employees.insert(
            0,
            Employee {
                id: Some(id),
                employee_id: employee_id.to_string(),
                full_name: full_name.to_string(),
                email: format!("{}@example.com", employee_id.to_lowercase()),
                department: department.to_string(),
                created_at: None,
            },
        );
    }

    pub fn seed_attendance(&self, record: AttendanceRecord) {
        self.state.lock().unwrap().attendance.push(record);
    }

    /// Drop every following call without a response
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay the next GET calls, one entry per call in arrival order
    pub fn delay_reads(&self, delays: &[Duration]) {
        self.read_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_requests(&self, method: &Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.method == method)
            .count()
    }

    fn route(&self, request: &HttpRequest) -> RawResponse {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| s.map(str::to_string).collect())
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["api", "employees"]) => ok(200, &state.employees),
            ("POST", ["api", "employees"]) => {
                let body: CreateEmployeeRequest = match parse(request) {
                    Some(body) => body,
                    None => return detail(422, "Invalid request body"),
                };
                if state.employees.iter().any(|e| e.employee_id == body.employee_id) {
                    return detail(
                        409,
                        &format!("Employee with ID '{}' already exists", body.employee_id),
                    );
                }
                state.next_id += 1;
                let employee = Employee {
                    id: Some(format!("emp-{}", state.next_id)),
                    employee_id: body.employee_id,
                    full_name: body.full_name,
                    email: body.email,
                    department: body.department,
                    created_at: None,
                };
                state.employees.insert(0, employee.clone());
                ok(201, &employee)
            }
            ("DELETE", ["api", "employees", employee_id]) => {
                let before = state.employees.len();
                state.employees.retain(|e| e.employee_id != *employee_id);
                if state.employees.len() == before {
                    return detail(404, &format!("Employee with ID '{}' not found", employee_id));
                }
                state.attendance.retain(|r| r.employee_id != *employee_id);
                RawResponse::new(204, "")
            }
            ("GET", ["api", "attendance"]) => ok(200, &state.attendance),
            ("GET", ["api", "attendance", employee_id]) => {
                if !state.employees.iter().any(|e| e.employee_id == *employee_id) {
                    return detail(404, &format!("Employee with ID '{}' not found", employee_id));
                }
                let records: Vec<&AttendanceRecord> = state
                    .attendance
                    .iter()
                    .filter(|r| r.employee_id == *employee_id)
                    .collect();
                ok(200, &records)
            }
            ("POST", ["api", "attendance"]) => {
                let body: MarkAttendanceRequest = match parse(request) {
                    Some(body) => body,
                    None => return detail(422, "Invalid request body"),
                };
                let employee = match state.employees.iter().find(|e| e.employee_id == body.employee_id) {
                    Some(employee) => employee.clone(),
                    None => {
                        return detail(
                            404,
                            &format!("Employee with ID '{}' not found", body.employee_id),
                        )
                    }
                };
                state.next_id += 1;
                let record = AttendanceRecord {
                    id: format!("att-{}", state.next_id),
                    employee_id: body.employee_id,
                    date: body.date,
                    status: body.status,
                    created_at: None,
                    employee_name: Some(employee.full_name),
                    employee_department: Some(employee.department),
                };
                state.attendance.insert(0, record.clone());
                ok(201, &record)
            }
            _ => detail(404, "Not Found"),
        }
    }
}

#[async_trait]
impl Transport for FakeService {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportFailure::NoResponse("connection refused".to_string()));
        }

        // Reads snapshot the collection when they arrive, then wait
        let response = self.route(&request);
        if request.method == Method::GET {
            let delay = self.read_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(response)
    }
}

fn parse<T: serde::de::DeserializeOwned>(request: &HttpRequest) -> Option<T> {
    request
        .body
        .as_deref()
        .and_then(|body| serde_json::from_str(body).ok())
}

fn ok<T: serde::Serialize>(status: u16, payload: &T) -> RawResponse {
    RawResponse::new(status, serde_json::to_string(payload).unwrap())
}

fn detail(status: u16, message: &str) -> RawResponse {
    RawResponse::new(status, json!({ "detail": message }).to_string())
}
