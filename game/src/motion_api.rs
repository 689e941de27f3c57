use std::net::SocketAddr;
use std::sync::mpsc::Sender;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::detection::MotionEvent;

/// HTTP ingest for the external detection subsystem: motion events are
/// POSTed here and forwarded into the game loop's channel.
#[derive(Clone)]
struct ApiState {
    motion_tx: Sender<MotionEvent>,
}

pub fn router(motion_tx: Sender<MotionEvent>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/motion", post(motion))
        .with_state(ApiState { motion_tx })
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

async fn motion(State(state): State<ApiState>, Json(event): Json<MotionEvent>) -> StatusCode {
    if state.motion_tx.send(event).is_err() {
        // The game loop is gone; tell the detector to stop posting.
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::NO_CONTENT
}

pub fn resolve_motion_api_addr<F>(mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = get_env("STILLPATH_MOTION_API_ADDR").and_then(|v| v.parse().ok()) {
        return addr;
    }

    if let Some(port) = get_env("STILLPATH_MOTION_API_PORT").and_then(|v| v.parse::<u16>().ok()) {
        return SocketAddr::from(([127, 0, 0, 1], port));
    }

    "127.0.0.1:4010"
        .parse()
        .expect("default motion api listen addr should parse")
}

pub async fn serve(addr: SocketAddr, motion_tx: Sender<MotionEvent>) -> std::io::Result<()> {
    let app = router(motion_tx);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("motion api listening on http://{addr}");
    axum::serve(listener, app).await
}
