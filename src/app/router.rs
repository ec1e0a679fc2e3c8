use std::collections::HashMap;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::pipeline::{CreateObsRequest, Pipeline};

/// Where the wiki posts its AJAX calls.
pub const AJAX_PATH: &str = "/lib/exe/ajax.php";
pub const CREATE_OBS_ACTION: &str = "create_obs_now";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route(AJAX_PATH, get(ajax).post(ajax))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ajax(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let Some(call) = params.get("call") else {
        return plain_text(StatusCode::BAD_REQUEST, "missing parameter: call".to_owned());
    };

    match call.as_str() {
        CREATE_OBS_ACTION => create_obs_now(state, &headers, &params).await,
        other => {
            tracing::debug!(call = other, "unknown ajax call");
            plain_text(StatusCode::BAD_REQUEST, format!("unknown call: {other}"))
        }
    }
}

async fn create_obs_now(
    state: AppState,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> Response {
    let request = match CreateObsRequest::from_params(params) {
        Ok(request) => request,
        Err(message) => return plain_text(StatusCode::BAD_REQUEST, message),
    };

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(server_name);
    let show_diagnostics = state.pipeline.config().is_dev_host(host);

    let pipeline = state.pipeline.clone();
    let today = chrono::Local::now().date_naive();
    let result = tokio::task::spawn_blocking(move || pipeline.run(&request, today)).await;

    match result {
        Ok(Ok(outcome)) => plain_text(
            StatusCode::OK,
            crate::messages::render(&outcome, show_diagnostics),
        ),
        Ok(Err(err)) => {
            tracing::error!(?err, "create obs failed");
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
        }
        Err(err) => {
            tracing::error!(?err, "create obs task panicked");
            plain_text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_owned(),
            )
        }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// `Host` header value without the port.
pub fn server_name(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}
