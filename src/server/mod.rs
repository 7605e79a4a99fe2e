//! HTTP shell around the fetch orchestrator.
//!
//! | Method    | Path      | Description                                   |
//! |-----------|-----------|-----------------------------------------------|
//! | `GET`     | `/fetch`  | Fetch `?url=` and return `{url, text, ...}`   |
//! | `GET`     | `/health` | `{status: "ok", version}`                     |
//! | `OPTIONS` | any       | 204 with CORS headers                         |
//!
//! Any other method, `HEAD` included, answers 405 and any other path 404.
//! Every error body is `{"error": "<message>"}` and every response carries
//! `Access-Control-Allow-Origin: *`.

pub mod params;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::{
        header::{
            HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::{FetchMeta, FetchOptions, FetchOrchestrator};

use params::RequestParams;

/// Shared state for the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<FetchOrchestrator>,
    /// Defaults for options the query string leaves out.
    pub defaults: Arc<FetchOptions>,
}

impl AppState {
    pub fn new(orchestrator: FetchOrchestrator, defaults: FetchOptions) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            defaults: Arc::new(defaults),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FetchOrchestrator::from_config(config),
            config.fetch.to_options(),
        )
    }
}

#[derive(Debug, Serialize)]
struct FetchResponse {
    url: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<FetchMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<Vec<String>>,
}

/// `{"error": message}` with a status code.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the router for `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetch", get(handle_fetch).fallback(handle_fallback))
        .route("/health", get(handle_health).fallback(handle_fallback))
        .fallback(handle_fallback)
        .layer(middleware::from_fn(reject_head))
        .layer(middleware::map_response(allow_any_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `server.host:server.port` and serve until Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Fetch service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down fetch service");
        })
        .await?;

    Ok(())
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// GET routes would otherwise answer HEAD implicitly.
async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }
    next.run(request).await
}

async fn handle_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
                (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            ],
        )
            .into_response();
    }
    if method != Method::GET {
        return ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }
    ApiError::new(StatusCode::NOT_FOUND, "Not found").into_response()
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_fetch(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<FetchResponse>, ApiError> {
    let Query(query) =
        query.map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let raw_url = query.get("url").map(String::as_str).unwrap_or("");
    let url = match state.orchestrator.preflight(raw_url).await {
        Ok(url) => url,
        Err(err) => {
            if state.defaults.debug && err.is_rejection() {
                info!(error = %err, "request:rejected");
            }
            return Err(err.into());
        }
    };

    let params = RequestParams::from_query(&query, &state.defaults);
    let debug = params.options.debug;
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    if debug {
        info!(request_id = %request_id, url = url.as_str(), "request:start");
    }

    match state.orchestrator.orchestrate(&url, &params.options).await {
        Ok(outcome) => {
            let chunks = params.chunk_size.map(|size| {
                chunk_text(&outcome.text, size, params.chunk_overlap, params.max_chunks)
            });
            if debug {
                info!(
                    request_id = %request_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    chars = outcome.text.chars().count(),
                    "request:success"
                );
            }
            Ok(Json(FetchResponse {
                url: url.to_string(),
                meta: params.options.include_meta.then(|| outcome.meta()),
                text: outcome.text,
                chunks,
            }))
        }
        Err(err) => {
            if debug {
                info!(
                    request_id = %request_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "request:fail"
                );
            }
            Err(ApiError::new(StatusCode::BAD_GATEWAY, err.to_string()))
        }
    }
}
