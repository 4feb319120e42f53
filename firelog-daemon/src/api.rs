//! HTTP API for normalized firewall records.
//!
//! | method    | path                           | response                          |
//! |-----------|--------------------------------|-----------------------------------|
//! | GET       | `/api/logfiles/{vendor}`       | all records of the vendor         |
//! | GET       | `/api/logfiles/{vendor}/{id}`  | one record or 404                 |
//! | GET, POST | `/api/logfiles/{vendor}/update`| reload one vendor                 |
//! | GET, POST | `/api/logfiles/update`         | reload all vendors concurrently   |
//! | GET       | `/health`                      | [`DaemonHealth`]                  |
//!
//! `{vendor}` is `kaspersky`, `tplink` or `dlink` (case-insensitive).
//! Errors are returned as `{"error": "..."}`.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Serialize, Serializer};
use serde_json::json;

use firelog_core::metrics as m;
use firelog_core::types::{RecordId, Vendor};
use firelog_log_pipeline::{RecordCollection, RecordStore, ReloadSummary};

use crate::health::DaemonHealth;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RecordStore>,
    started: Instant,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            started: Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/logfiles/update",
            get(reload_all_handler).post(reload_all_handler),
        )
        .route("/api/logfiles/{vendor}", get(list_handler))
        .route(
            "/api/logfiles/{vendor}/update",
            get(reload_handler).post(reload_handler),
        )
        .route("/api/logfiles/{vendor}/{id}", get(record_handler))
        .with_state(state)
}

/// API error rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    UnknownVendor(String),
    InvalidId(String),
    NotFound,
    ReloadFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::UnknownVendor(name) => (StatusCode::NOT_FOUND, format!("unknown vendor '{name}'")),
            Self::InvalidId(raw) => (StatusCode::BAD_REQUEST, format!("invalid record id '{raw}'")),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            Self::ReloadFailed(reason) => (StatusCode::SERVICE_UNAVAILABLE, reason),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn parse_vendor(raw: &str) -> Result<Vendor, ApiError> {
    let vendor = raw
        .parse::<Vendor>()
        .map_err(|_| ApiError::UnknownVendor(raw.to_owned()))?;
    metrics::counter!(m::API_REQUESTS_TOTAL, m::LABEL_VENDOR => vendor.as_str()).increment(1);
    Ok(vendor)
}

/// Serializes a collection snapshot as a plain JSON array without cloning records.
struct RecordList(Arc<RecordCollection>);

impl Serialize for RecordList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.records().serialize(serializer)
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<DaemonHealth> {
    Json(DaemonHealth::collect(&state.store, state.started))
}

async fn list_handler(
    State(state): State<AppState>,
    Path(vendor): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = parse_vendor(&vendor)?;
    Ok(Json(RecordList(state.store.get_all(vendor))))
}

async fn record_handler(
    State(state): State<AppState>,
    Path((vendor, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = parse_vendor(&vendor)?;
    let id: RecordId = id.parse().map_err(|_| ApiError::InvalidId(id.clone()))?;

    state
        .store
        .get_by_id(vendor, id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn reload_handler(
    State(state): State<AppState>,
    Path(vendor): Path<String>,
) -> Result<Json<ReloadSummary>, ApiError> {
    let vendor = parse_vendor(&vendor)?;
    state
        .store
        .reload(vendor)
        .await
        .map(Json)
        .map_err(|e| ApiError::ReloadFailed(e.to_string()))
}

/// Per-vendor entry of a reload-all response.
#[derive(Serialize)]
#[serde(untagged)]
enum ReloadOutcome {
    Loaded(ReloadSummary),
    Failed { vendor: Vendor, error: String },
}

/// 200 when every vendor reloaded, 503 otherwise; the body always lists all three.
async fn reload_all_handler(State(state): State<AppState>) -> Response {
    let results = state.store.reload_all().await;
    let all_ok = results.iter().all(|(_, r)| r.is_ok());

    let outcomes: Vec<ReloadOutcome> = results
        .into_iter()
        .map(|(vendor, result)| match result {
            Ok(summary) => ReloadOutcome::Loaded(summary),
            Err(e) => ReloadOutcome::Failed {
                vendor,
                error: e.to_string(),
            },
        })
        .collect();

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(outcomes)).into_response()
}
