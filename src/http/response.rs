//! HTTP response building module
//!
//! Builders for the JSON and plain-text responses the service returns.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Build a JSON response
///
/// Serialization failures become a 500 with a plain-text body.
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
    server_name: &str,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_response(status, JSON, Bytes::from(json), server_name),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                server_name,
            )
        }
    }
}

/// Build a plain-text response
pub fn build_text_response(
    status: StatusCode,
    message: &str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    build_response(status, TEXT, Bytes::from(message.to_owned()), server_name)
}

/// Build the plain-text response for a failed request
pub fn build_error_response(err: &ApiError, server_name: &str) -> Response<Full<Bytes>> {
    let mut response = build_text_response(err.status(), &err.to_string(), server_name);
    if let ApiError::MethodNotAllowed { allow } = err {
        if let Ok(value) = allow.parse() {
            response.headers_mut().insert(hyper::header::ALLOW, value);
        }
    }
    response
}

/// Build health check response
pub fn build_health_response(course_count: usize, server_name: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": "ok",
        "courses": course_count,
    });
    build_json_response(StatusCode::OK, &body, server_name)
}

fn build_response(
    status: StatusCode,
    content_type: &str,
    body: Bytes,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let content_length = body.len();
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = status;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
