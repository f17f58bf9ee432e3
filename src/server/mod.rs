use crate::config::Config;
use crate::error::Result;
use crate::process::Supervisor;
use crate::telemetry;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
struct AppState {
    supervisor: Arc<Supervisor>,
    config: Arc<Config>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    running: bool,
}

#[derive(Debug, Serialize)]
struct StartResponse {
    started: bool,
}

#[derive(Debug, Serialize)]
struct StopResponse {
    stopped: bool,
}

#[derive(Debug, Serialize)]
struct LogResponse {
    log: String,
}

/// Build the dashboard router.
///
/// Control endpoints translate HTTP requests into supervisor calls; the
/// telemetry endpoints are read-only and never fail toward the client.
pub fn router(config: Arc<Config>, supervisor: Arc<Supervisor>) -> Router {
    let state = AppState { supervisor, config };

    Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/log", get(log))
        .route("/chart", get(chart))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve the dashboard until the process exits.
pub async fn serve(config: Arc<Config>, supervisor: Arc<Supervisor>) -> Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let app = router(config, supervisor);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("dashboard listening on {local_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn home() -> Html<&'static str> {
    Html(include_str!("dashboard.html"))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: state.supervisor.is_running().await,
    })
}

/// POST /start. `started: false` means "already running", not a failure;
/// a spawn refusal from the OS is a 500.
async fn start(State(state): State<AppState>) -> std::result::Result<Json<StartResponse>, StatusCode> {
    match state.supervisor.start().await {
        Ok(started) => Ok(Json(StartResponse { started })),
        Err(e) => {
            tracing::error!("start request failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /stop. `stopped: false` means "already stopped".
async fn stop(State(state): State<AppState>) -> std::result::Result<Json<StopResponse>, StatusCode> {
    match state.supervisor.stop().await {
        Ok(stopped) => Ok(Json(StopResponse { stopped })),
        Err(e) => {
            tracing::error!("stop request failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn log(State(state): State<AppState>) -> Json<LogResponse> {
    let log = match telemetry::tail_bytes(&state.config.log_file, state.config.log_tail_bytes).await
    {
        Ok(log) => log,
        Err(e) => {
            tracing::warn!("log tail unavailable: {}", e);
            String::new()
        }
    };

    Json(LogResponse { log })
}

async fn chart(State(state): State<AppState>) -> Json<telemetry::ChartData> {
    let data = match telemetry::read_recent(
        &state.config.history_file,
        &state.config.value_field,
        state.config.chart_points,
    )
    .await
    {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("chart history unavailable: {}", e);
            telemetry::ChartData::default()
        }
    };

    Json(data)
}
