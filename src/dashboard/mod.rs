//! JSON surface for the embedding frontend.
//!
//! Serves the current snapshot, the trend history and a manual refresh
//! trigger on the paths the frontend already consumes. The engine stays the
//! sole writer; handlers only read through an `EngineHandle`.

use crate::engine::EngineHandle;
use crate::utils::error::{Error, Result};
use crate::utils::types::Snapshot;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::{SocketAddr, TcpListener};

/// One point of the trend view, in the frontend's wire shape.
#[derive(Debug, Serialize)]
struct TrendPoint {
    t: String,
    score: u8,
}

fn trend_point(snapshot: &Snapshot) -> TrendPoint {
    TrendPoint { t: snapshot.timestamp.format("%H:%M").to_string(), score: snapshot.score }
}

pub fn router(handle: EngineHandle) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/devflow/summary", get(summary))
        .route("/api/devflow/history", get(history))
        .route("/api/devflow/refresh", post(refresh))
        .with_state(handle)
}

async fn root() -> impl IntoResponse {
    "DevFlow monitor running"
}

async fn healthz() -> impl IntoResponse {
    "OK"
}

/// Current snapshot, or 204 before the first cycle completes.
async fn summary(State(handle): State<EngineHandle>) -> Response {
    match handle.current_snapshot().await {
        | Some(snapshot) => Json(snapshot).into_response(),
        | None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn history(State(handle): State<EngineHandle>) -> Json<Vec<TrendPoint>> {
    let points = handle.history().await.iter().map(trend_point).collect();
    Json(points)
}

/// Coalesced manual refresh: always accepted, dropped by the engine if a
/// cycle is already in flight.
async fn refresh(State(handle): State<EngineHandle>) -> StatusCode {
    handle.request_refresh();
    StatusCode::ACCEPTED
}

/// Serve the snapshot API on `addr`, falling back to a random port if the
/// primary one is taken.
pub async fn serve(handle: EngineHandle, addr: SocketAddr) -> Result<()> {
    let listener = match TcpListener::bind(addr) {
        | Ok(l) => l,
        | Err(e) => {
            log::warn!("Port {} unavailable: {} – binding to random port", addr.port(), e);
            TcpListener::bind("127.0.0.1:0").map_err(|e| Error::ServerError(e.to_string()))?
        }
    };
    let local_addr = listener.local_addr().map_err(|e| Error::ServerError(e.to_string()))?;
    log::info!("Serving snapshot API at http://{}", local_addr);

    axum::Server::from_tcp(listener)
        .map_err(|e| Error::ServerError(e.to_string()))?
        .serve(router(handle).into_make_service())
        .await
        .map_err(|e| Error::ServerError(e.to_string()))
}
