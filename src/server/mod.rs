use axum::body::Body;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod routes;

pub const BIND_ENV: &str = "MECHCURVE_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

pub fn bind_addr_from_env() -> String {
    std::env::var(BIND_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND.to_string())
}

/// All routing lives in [routes::route_request]; axum only carries bytes.
pub fn router() -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(method: Method, uri: Uri, body: String) -> Response {
    let method = method.as_str().to_string();
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    // Batch requests can take a while; keep them off the async workers.
    match tokio::task::spawn_blocking(move || routes::route_request(&method, &path, &body)).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(%err, "request handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Body::from("internal error")).into_response()
        }
    }
}

pub async fn serve(bind_addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("mechcurve server listening on http://{bind_addr}");
    axum::serve(listener, router()).await
}

pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(bind_addr))
}
