use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::models::{Dashboard, Panel};
use crate::{chart, dashboard, parser};

pub struct AppState {
    pub cfg: Config,
    pub client: Client,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub window: Option<usize>, // defaults to HISTORY_WINDOW
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Bridge dashboard API running" }))
        .route("/dashboard", get(get_dashboard))
        .route("/metrics", get(get_metrics))
        .route("/chart", get(get_chart))
        .route("/history.csv", get(get_history_csv))
        .route("/flows/outflow", get(get_outflow))
        .route("/flows/inflow", get(get_inflow))
        .route("/flows/outflow.csv", get(get_outflow_csv))
        .route("/flows/inflow.csv", get(get_inflow_csv))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(cfg: Config, client: Client) -> eyre::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    let app = router(Arc::new(AppState { cfg, client }));

    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ---------- handlers (fresh load per request) ----------

fn failed() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "Failed to load data." })),
    )
        .into_response()
}

async fn fresh(state: &AppState) -> Result<Dashboard, Response> {
    dashboard::load(&state.cfg, &state.client).await.map_err(|e| {
        error!("Failed to load data: {}", e);
        failed()
    })
}

fn reply<T: Serialize>(result: Result<T, Response>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(resp) => resp,
    }
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Response {
    reply(fresh(&state).await)
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    reply(fresh(&state).await.map(|d| d.metrics))
}

async fn get_chart(State(state): State<Arc<AppState>>, Query(q): Query<ChartQuery>) -> Response {
    let window = q.window.unwrap_or(state.cfg.history_window);
    reply(fresh(&state).await.map(|d| match d.metrics {
        Panel::Ready(m) => Panel::Ready(chart::chart_window(&m.history, window)),
        Panel::NoData => Panel::NoData,
    }))
}

async fn get_outflow(State(state): State<Arc<AppState>>) -> Response {
    reply(fresh(&state).await.map(|d| d.outflow))
}

async fn get_inflow(State(state): State<Arc<AppState>>) -> Response {
    reply(fresh(&state).await.map(|d| d.inflow))
}

fn csv(result: Result<String, Response>) -> Response {
    match result {
        Ok(body) => ([(header::CONTENT_TYPE, "text/csv")], body).into_response(),
        Err(resp) => resp,
    }
}

async fn get_history_csv(State(state): State<Arc<AppState>>) -> Response {
    csv(fresh(&state).await.map(|d| match &d.metrics {
        Panel::Ready(m) => parser::encode_time_series(&m.history),
        Panel::NoData => parser::encode_time_series(&[]),
    }))
}

async fn get_outflow_csv(State(state): State<Arc<AppState>>) -> Response {
    csv(fresh(&state).await.map(|d| parser::encode_chain_flows(&d.outflow_rows)))
}

async fn get_inflow_csv(State(state): State<Arc<AppState>>) -> Response {
    csv(fresh(&state).await.map(|d| parser::encode_chain_flows(&d.inflow_rows)))
}
