//! HTTP surface for the transaction cache.
//!
//! Collection routes live under `/api/transactions`. Every JSON body carries
//! a `success` flag; failures add `error` and usually `message`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::errors::{CacheError, ServerError};
use crate::models::TransactionRecord;
use crate::services::{Provenance, TransactionService};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<TransactionService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<'a> {
    pub success: bool,
    pub source: Provenance,
    pub contract: &'a str,
    pub count: usize,
    pub data: &'a [TransactionRecord],
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub data: TransactionRecord,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse<'a> {
    pub success: bool,
    pub contract: &'a str,
    pub balance: String,
    pub unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub cached_records: Option<usize>,
    /// Seconds since the last successful upstream fetch.
    pub cache_age_seconds: Option<u64>,
}

/// `{success: false, error, message?}` with an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiError {
    fn internal(error: &'static str, cause: &CacheError) -> Self {
        error!("{}: {}", error, cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
            message: Some(cause.to_string()),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Transaction not found",
            message: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Build the router with every route; CORS is layered on by [`run_server`].
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/transactions", get(list_handler))
        .route("/api/transactions/balance", get(balance_handler))
        .route("/api/transactions/refresh", post(refresh_handler))
        .route("/api/transactions/{hash}", get(transaction_handler))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[HeaderValue]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any).allow_headers(Any);
    }
    layer
        .allow_origin(allowed_origins.to_vec())
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Serve until the listener fails.
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let service = TransactionService::from_config(&config)?;
    let state = AppState::new(Arc::new(service));
    let app = create_router(state).layer(cors_layer(&config.allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    info!("Donation proxy listening on {}", config.bind_addr);
    info!(
        "Serving contract {} with {}s cache TTL",
        config.contract_address,
        config.cache_ttl.as_secs()
    );

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}

/// `GET /health`
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache_ttl_seconds: state.service.ttl().as_secs(),
        cached_records: state.service.cached_len().await,
        cache_age_seconds: state.service.cache_age().await.map(|age| age.as_secs()),
    })
}

/// `GET /api/transactions`
async fn list_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let served = state
        .service
        .get()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch transactions from blockchain", &e))?;

    Ok(Json(ListResponse {
        success: true,
        source: served.provenance,
        contract: state.service.address(),
        count: served.records.len(),
        data: &served.records,
    })
    .into_response())
}

/// `GET /api/transactions/balance`
async fn balance_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let balance = state
        .service
        .contract_balance()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch balance", &e))?;

    Ok(Json(BalanceResponse {
        success: true,
        contract: state.service.address(),
        balance,
        unit: "ETH",
    })
    .into_response())
}

/// `GET /api/transactions/{hash}`
async fn transaction_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<RecordResponse>, ApiError> {
    match state.service.get_by_id(&hash).await {
        Ok(data) => Ok(Json(RecordResponse {
            success: true,
            data,
        })),
        Err(CacheError::NotFound { .. }) => Err(ApiError::not_found()),
        Err(e) => Err(ApiError::internal("Server Error", &e)),
    }
}

/// `POST /api/transactions/refresh`
async fn refresh_handler(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let records = state
        .service
        .refresh()
        .await
        .map_err(|e| ApiError::internal("Failed to refresh", &e))?;

    Ok(Json(RefreshResponse {
        success: true,
        message: "Cache refreshed",
        count: records.len(),
    }))
}
