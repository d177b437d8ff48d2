//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::directory::DirectoryError;
use crate::domain::{Position, StopId};
use crate::eta::EtaError;
use crate::finder::FinderError;
use crate::geolocation::FixedPosition;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/nearby", get(nearby_stops))
        .route("/api/stops/:id", get(stop_detail))
        .route("/api/directory/invalidate", post(invalidate_directory))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stops within `radius` meters of (`lat`, `lon`), nearest first.
async fn nearby_stops(
    State(state): State<AppState>,
    query: Result<Query<NearbyRequest>, QueryRejection>,
) -> Result<Json<NearbyResponse>, AppError> {
    let Query(req) = query?;
    let token = state.begin_request(req.session.as_deref()).await;
    let here = FixedPosition(Position::new(req.lat, req.lon));

    let ranked = state
        .finder
        .locate_and_find(&here, req.radius, &token)
        .await?;

    let stops = ranked.iter().map(NearbyStopResult::from_ranked).collect();
    Ok(Json(NearbyResponse { stops }))
}

/// A stop's details, live arrivals, and map marker.
async fn stop_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<StopDetailRequest>, QueryRejection>,
) -> Result<Json<StopDetailResponse>, AppError> {
    let Query(req) = query?;
    let stop_id = StopId::parse(&id).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;
    let token = state.begin_request(req.session.as_deref()).await;

    let directory = state.finder.directory(&token).await?;

    let stop = directory.get(&stop_id).ok_or_else(|| AppError::NotFound {
        message: format!("unknown stop: {stop_id}"),
    })?;

    let routes = state.eta.stop_arrivals(&stop_id, &token).await?;

    Ok(Json(StopDetailResponse {
        stop: StopResult::from_stop(stop),
        marker: Marker::for_stop(stop),
        routes: routes.iter().map(RouteArrivalsResult::from_route).collect(),
    }))
}

/// Drop the cached stop directory so the next search refetches it.
async fn invalidate_directory(State(state): State<AppState>) -> StatusCode {
    state.finder.cache().invalidate().await;
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug, PartialEq)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    GatewayTimeout { message: String },
}

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        let message = e.to_string();
        if e.is_user_error() {
            return AppError::BadRequest { message };
        }
        match e {
            FinderError::Superseded => AppError::Conflict { message },
            FinderError::Timeout { .. } | FinderError::Directory(DirectoryError::Timeout) => {
                AppError::GatewayTimeout { message }
            }
            _ => AppError::BadGateway { message },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<EtaError> for AppError {
    fn from(e: EtaError) -> Self {
        let message = e.to_string();
        match e {
            EtaError::Timeout => AppError::GatewayTimeout { message },
            EtaError::Superseded => AppError::Conflict { message },
            _ => AppError::BadGateway { message },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::BadGateway { message }
            | AppError::GatewayTimeout { message } => message,
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
