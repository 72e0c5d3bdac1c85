use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{DaySchedule, Hours, ScheduleStatus, ScheduleStore};

/// Shared handle to one store. The lock serializes every read and write.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<ScheduleStore>>,
}

impl AppState {
    pub fn new(store: ScheduleStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with_shared(store: Arc<RwLock<ScheduleStore>>) -> Self {
        Self { store }
    }

    fn store(&self) -> Arc<RwLock<ScheduleStore>> {
        self.store.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursPayload {
    pub open: String,
    pub close: String,
    #[serde(default)]
    pub special_hours: bool,
    #[serde(default)]
    pub schedule_type: Option<String>,
}

impl HoursPayload {
    fn to_hours(&self) -> Hours {
        let schedule_type = self
            .schedule_type
            .clone()
            .unwrap_or_else(|| ScheduleStatus::Operating.as_str().to_string());
        Hours::new(self.open.as_str(), self.close.as_str())
            .with_special_hours(self.special_hours)
            .with_schedule_type(schedule_type)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangePayload {
    pub start: String,
    pub end: String,
    #[serde(flatten)]
    pub hours: HoursPayload,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: String,
    end: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/days", get(list_days))
        .route("/days/:date", get(get_day).put(put_day))
        .route("/ranges", post(post_range))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: ScheduleStore) -> std::io::Result<()> {
    let state = AppState::new(store);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DaySchedule>, ApiError> {
    let store = state.store();
    let schedule = {
        let guard = store.read();
        guard.get_date(date.as_str())
    };
    match schedule {
        Some(schedule) => Ok(Json(schedule)),
        None => Err(ApiError::not_found(format!("no schedule for {date}"))),
    }
}

async fn put_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<HoursPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
    let store = state.store();
    {
        let mut guard = store.write();
        guard
            .try_set_date(date.as_str(), &payload.to_hours())
            .map_err(|err| ApiError::invalid(err.to_string()))?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_days(
    State(state): State<AppState>,
    range: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<DaySchedule>>, ApiError> {
    let Query(range) = range.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
    let store = state.store();
    let schedules = {
        let guard = store.read();
        guard.get_date_range(range.start.as_str(), range.end.as_str())
    };
    Ok(Json(schedules))
}

async fn post_range(
    State(state): State<AppState>,
    payload: Result<Json<RangePayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
    let store = state.store();
    let all_applied = {
        let mut guard = store.write();
        guard.set_range(
            payload.start.as_str(),
            payload.end.as_str(),
            &payload.hours.to_hours(),
        )
    };
    if !all_applied {
        return Err(ApiError::invalid(format!(
            "range {} to {} was not fully applied; days that were accepted are kept",
            payload.start, payload.end
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
