use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::server::api::{self, ApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok_json(body: String) -> Self {
        Self {
            status_code: 200,
            content_type: "application/json",
            body,
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Dispatch one request. `path` may carry a query string.
pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/api/health") => respond(api::health_payload()),
        ("GET", "/api/units") => respond(api::units_payload()),
        ("GET", route) if route.starts_with("/api/units/") => {
            let rest = route.trim_start_matches("/api/units/");
            match rest.split_once('/') {
                Some((id, "curve")) if !id.is_empty() => {
                    respond(api::unit_curve_payload(id, path))
                }
                Some((id, "summary")) if !id.is_empty() => {
                    respond(api::unit_summary_payload(id))
                }
                _ => error_response(404, "Route not found"),
            }
        }
        ("POST", "/api/curve") => respond(api::curve_payload(body)),
        ("POST", "/api/summary") => respond(api::summary_payload(body)),
        ("POST", "/api/batch") => respond(api::batch_payload(body)),
        _ => error_response(404, "Route not found"),
    }
}

fn respond(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok_json(payload),
        Err(ApiError::Parse(err)) => error_response(400, &format!("Invalid request body: {err}")),
        Err(ApiError::Validation(validation)) => validation_error_response(400, validation),
        Err(err @ ApiError::NotFound(_)) => error_response(404, &err.to_string()),
        Err(err @ ApiError::Internal(_)) => {
            tracing::error!(%err, "request failed");
            error_response(500, &err.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
