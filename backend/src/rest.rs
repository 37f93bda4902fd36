use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use shared::{CreateEmployeeRequest, ErrorBody, HealthResponse, MarkAttendanceRequest};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::{AttendanceService, EmployeeService, ServiceError};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub employee_service: EmployeeService,
    pub attendance_service: AttendanceService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            employee_service: EmployeeService::new(db.clone()),
            attendance_service: AttendanceService::new(db),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    detail: self.to_string(),
                    errors: errors.iter().map(|e| e.to_string()).collect(),
                },
            ),
            ServiceError::Conflict(message) => {
                (StatusCode::CONFLICT, ErrorBody::new(message.clone()))
            }
            ServiceError::NotFound(message) => {
                (StatusCode::NOT_FOUND, ErrorBody::new(message.clone()))
            }
            ServiceError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed or mistyped JSON bodies still answer with a `detail`
fn rejection_response(rejection: JsonRejection) -> Response {
    let status = match rejection.status() {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorBody::new(rejection.body_text()))).into_response()
}

fn health_payload(message: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: message.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
pub async fn root() -> impl IntoResponse {
    health_payload("HRMS Lite API is running")
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    health_payload("API is healthy")
}

/// GET /api/employees
pub async fn list_employees(State(state): State<AppState>) -> Result<Response, ServiceError> {
    info!("GET /api/employees");
    let employees = state.employee_service.list().await?;
    Ok(Json(employees).into_response())
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Ok(rejection_response(rejection)),
    };
    info!(employee_id = %request.employee_id, "POST /api/employees");

    let employee = state.employee_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(employee)).into_response())
}

/// DELETE /api/employees/:employee_id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    info!("DELETE /api/employees/{}", employee_id);
    state.employee_service.delete(&employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/attendance
pub async fn list_attendance(State(state): State<AppState>) -> Result<Response, ServiceError> {
    info!("GET /api/attendance");
    let records = state.attendance_service.list().await?;
    Ok(Json(records).into_response())
}

/// GET /api/attendance/:employee_id
pub async fn list_employee_attendance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Response, ServiceError> {
    info!("GET /api/attendance/{}", employee_id);
    let records = state.attendance_service.list_for_employee(&employee_id).await?;
    Ok(Json(records).into_response())
}

/// POST /api/attendance
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Ok(rejection_response(rejection)),
    };
    info!(employee_id = %request.employee_id, date = %request.date, "POST /api/attendance");

    let record = state.attendance_service.mark(request).await?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// Routes of the collection service
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/employees", get(list_employees).post(create_employee))
        .route("/api/employees/:employee_id", delete(delete_employee))
        .route("/api/attendance", get(list_attendance).post(mark_attendance))
        .route("/api/attendance/:employee_id", get(list_employee_attendance))
        .with_state(state)
}
