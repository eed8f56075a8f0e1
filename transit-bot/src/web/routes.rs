//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{ArrivalResult, FailureKind, LookupError};
use crate::nearby::find_nearest_stops_str;

use super::dto::*;
use super::state::AppState;
use super::templates::SmsTemplate;
use super::text::reply_text;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sms", post(sms))
        .route("/api/query", get(query))
        .route("/api/stops/:number", get(stop_arrivals))
        .route("/api/nearby", get(nearby))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Twilio SMS webhook. Always answers with TwiML, even for failed lookups.
async fn sms(State(state): State<AppState>, Form(req): Form<SmsRequest>) -> Result<Response, AppError> {
    debug!(from = req.from.as_deref().unwrap_or("unknown"), "incoming sms");

    let snapshot = state.transit.snapshot().await;
    let handled = state
        .pipeline
        .handle(&req.body, &snapshot, state.today())
        .await;

    let xml = SmsTemplate {
        message: reply_text(&handled.reply),
    }
    .render()
    .map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

/// Web channel: the same pipeline as SMS, answered as JSON.
async fn query(State(state): State<AppState>, Query(req): Query<QueryRequest>) -> Json<QueryResponse> {
    let snapshot = state.transit.snapshot().await;
    let handled = state.pipeline.handle(&req.q, &snapshot, state.today()).await;

    Json(QueryResponse {
        action: handled.action.as_str(),
        text: reply_text(&handled.reply),
        reply: handled.reply,
    })
}

/// Arrivals for a rider stop number.
async fn stop_arrivals(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<ArrivalResult>, AppError> {
    let number: u32 = number.trim().parse().map_err(|_| AppError::BadRequest {
        message: format!("Invalid stop number: {}", number),
    })?;

    let snapshot = state.transit.snapshot().await;
    let timed = state.pipeline.arrivals_for_stop(number, &snapshot).await?;
    Ok(Json(timed.data))
}

/// Stops near a point. Unusable coordinates give an empty list.
async fn nearby(State(state): State<AppState>, Query(req): Query<NearbyRequest>) -> Json<NearbyResponse> {
    let snapshot = state.transit.snapshot().await;
    let stops = find_nearest_stops_str(
        snapshot.stops(),
        &req.lat,
        &req.lon,
        state.pipeline.search_config(),
    );
    Json(NearbyResponse { stops })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        let message = e.rider_message().to_string();
        match e.kind() {
            FailureKind::NotFound => AppError::NotFound { message },
            FailureKind::UpstreamDown | FailureKind::UnexpectedFormat => {
                AppError::BadGateway { message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
