//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body size
//! validation, route resolution, dispatch and access logging.

use crate::config::AppState;
use crate::error::{ApiError, Result};
use crate::handler::courses;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Operation, Resolution};
use crate::store::Course;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
///
/// Generic over the body type so tests can drive it with in-memory bodies.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> std::result::Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_log = state.access_log_enabled();
    let mut entry = access_log.then(|| access_log_entry(&req, remote_addr));
    let is_head = req.method() == Method::HEAD;

    let mut response = match route_request(req, &state).await {
        Ok(response) => response,
        Err(err) => http::build_error_response(&err, &state.config.http.server_name),
    };

    // Headers (including Content-Length) stay as they would be for GET
    if is_head {
        response = response.map(|_| Full::new(Bytes::new()));
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the route and run the matching operation
async fn route_request<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    check_body_size(&req, state.config.http.max_body_size)?;

    let health_enabled = state.config.routes.health_enabled;
    let routes = routing::ROUTES
        .iter()
        .filter(|route| health_enabled || route.operation != Operation::Health);
    let resolution = routing::match_route(req.method(), req.uri().path(), routes);
    let (operation, params) = match resolution {
        Resolution::Matched { operation, params } => (operation, params),
        Resolution::MethodNotAllowed { allow } => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method(),
                req.uri().path()
            ));
            let allow = allow
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiError::MethodNotAllowed { allow });
        }
        Resolution::NotFound => return Err(ApiError::RouteNotFound),
    };

    match operation {
        Operation::CreateCourse => {
            let course = read_course(req, state.config.http.max_body_size).await?;
            courses::create_course(state, course).await
        }
        Operation::ListCourses => Ok(courses::list_courses(state).await),
        Operation::GetCourse => courses::get_course(state, course_id(&params)?).await,
        Operation::UpdateCourse => {
            let id = course_id(&params)?;
            let course = read_course(req, state.config.http.max_body_size).await?;
            courses::update_course(state, id, course).await
        }
        Operation::DeleteCourse => courses::delete_course(state, course_id(&params)?).await,
        Operation::SearchCourses => {
            let title = path_param(&params, "title").unwrap_or_default();
            Ok(courses::search_courses(state, title).await)
        }
        Operation::Health => Ok(courses::health(state).await),
    }
}

fn path_param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}

/// Parse the `{id}` path segment
fn course_id(params: &[(&'static str, String)]) -> Result<i64> {
    path_param(params, "id")
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::InvalidCourseId)
}

/// Validate Content-Length header against the configured limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Result<()> {
    let Some(content_length) = req.headers().get("content-length") else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Err(ApiError::PayloadTooLarge)
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Read and decode a course body, enforcing the size limit while streaming
async fn read_course<B>(req: Request<B>, max_body_size: u64) -> Result<Course>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                ApiError::PayloadTooLarge
            } else {
                ApiError::invalid_body(format!("Failed to read request body: {e}"))
            }
        })?
        .to_bytes();

    serde_json::from_slice(&body).map_err(|e| ApiError::invalid_body(e.to_string()))
}

fn access_log_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::CourseStore;
    use hyper::StatusCode;
    use serde_json::Value;

    fn test_state() -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist/courses").unwrap();
        config.logging.access_log = false;
        config.http.max_body_size = 1024;
        Arc::new(AppState::new(&config, CourseStore::new()))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, String) {
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let response = handle_request(req, Arc::clone(state), addr).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn status_of(state: &Arc<AppState>, method: Method, uri: &str) -> StatusCode {
        send(state, request(method, uri, "")).await.0
    }

    async fn create(state: &Arc<AppState>, id: i64, title: &str) -> StatusCode {
        let body = format!(r#"{{"courseId":{id},"title":"{title}"}}"#);
        send(state, request(Method::POST, "/courses", &body)).await.0
    }

    fn titles(body: &str) -> Vec<String> {
        let value: Value = serde_json::from_str(body).unwrap();
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_returns_created_record() {
        let state = test_state();
        let (status, body) = send(
            &state,
            request(
                Method::POST,
                "/courses",
                r#"{"courseId":1,"title":"Algorithms","credits":4}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["courseId"], 1);
        assert_eq!(value["credits"], 4);

        let (status, body) = send(&state, request(Method::GET, "/courses/1", "")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["title"], "Algorithms");
        assert_eq!(value["credits"], 4);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_id() {
        let state = test_state();
        for body in [
            r#"{"courseId":0,"title":"Zero"}"#,
            r#"{"courseId":-3,"title":"Negative"}"#,
            r#"{"title":"Missing id"}"#,
        ] {
            let (status, text) = send(&state, request(Method::POST, "/courses", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(text, "Invalid Course ID");
        }
        assert!(state.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let state = test_state();
        let (status, text) =
            send(&state, request(Method::POST, "/courses", r#"{"courseId":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_get_missing_course() {
        let state = test_state();
        let (status, text) = send(&state, request(Method::GET, "/courses/99", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "Course not found");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let state = test_state();
        let (status, text) = send(&state, request(Method::GET, "/courses/abc", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid Course ID");
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let state = test_state();
        create(&state, 1, "Algorithms").await;

        let (status, body) = send(
            &state,
            request(
                Method::PUT,
                "/courses/1",
                r#"{"courseId":1,"title":"Advanced Algorithms"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["title"], "Advanced Algorithms");

        let (status, text) = send(
            &state,
            request(Method::PUT, "/courses/7", r#"{"courseId":7,"title":"Ghost"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "Course not found");
        assert_eq!(state.store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_different_body_id() {
        let state = test_state();
        create(&state, 1, "Algorithms").await;

        let (status, _) = send(
            &state,
            request(Method::PUT, "/courses/1", r#"{"courseId":5,"title":"Moved"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            status_of(&state, Method::GET, "/courses/1").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&state, Method::GET, "/courses/5").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let state = test_state();
        create(&state, 4, "Networks").await;

        let (status, text) = send(&state, request(Method::DELETE, "/courses/4", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Course deleted successfully");

        let (status, text) = send(&state, request(Method::DELETE, "/courses/4", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "Course not found");
    }

    #[tokio::test]
    async fn test_search_decodes_and_ignores_case() {
        let state = test_state();
        create(&state, 1, "Engineering 101").await;
        create(&state, 2, "Data Bases").await;

        let (status, body) = send(&state, request(Method::GET, "/courses/search/ENG", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Engineering 101"]);

        let (_, body) = send(&state, request(Method::GET, "/courses/search/data%20b", "")).await;
        assert_eq!(titles(&body), vec!["Data Bases"]);

        let (status, body) = send(&state, request(Method::GET, "/courses/search/xyz", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_course_lifecycle_over_http() {
        let state = test_state();
        assert_eq!(create(&state, 1, "Algorithms").await, StatusCode::CREATED);
        assert_eq!(create(&state, 2, "Databases").await, StatusCode::CREATED);

        let (_, body) = send(&state, request(Method::GET, "/courses", "")).await;
        assert_eq!(titles(&body), vec!["Algorithms", "Databases"]);

        let (_, body) = send(&state, request(Method::GET, "/courses/search/data", "")).await;
        assert_eq!(titles(&body), vec!["Databases"]);

        assert_eq!(
            status_of(&state, Method::DELETE, "/courses/1").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(&state, Method::GET, "/courses/1").await,
            StatusCode::NOT_FOUND
        );

        let (_, body) = send(&state, request(Method::GET, "/courses", "")).await;
        assert_eq!(titles(&body), vec!["Databases"]);
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        let state = test_state();
        let (status, _) = send(&state, request(Method::GET, "/students", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let req = request(Method::PATCH, "/courses/1", "");
        let response = handle_request(req, Arc::clone(&state), addr).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET, PUT, DELETE");
    }

    #[tokio::test]
    async fn test_body_size_limits() {
        let state = test_state();
        let mut req = request(Method::POST, "/courses", "{}");
        req.headers_mut()
            .insert("content-length", "4096".parse().unwrap());
        assert_eq!(send(&state, req).await.0, StatusCode::PAYLOAD_TOO_LARGE);

        let padding = "x".repeat(2048);
        let body = format!(r#"{{"courseId":1,"title":"{padding}"}}"#);
        let (status, _) = send(&state, request(Method::POST, "/courses", &body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(state.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_access_log_entry_from_request() {
        let mut config = Config::load_from("does-not-exist/courses").unwrap();
        config.logging.access_log = true;
        config.logging.access_log_format = "json".to_string();
        let state = Arc::new(AppState::new(&config, CourseStore::new()));

        let req = Request::builder()
            .method(Method::GET)
            .uri("/courses/search/alg?page=2")
            .header("user-agent", "curl/8.5.0")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let entry = access_log_entry(&req, "192.168.1.20:51000".parse().unwrap());
        assert_eq!(entry.remote_addr, "192.168.1.20");
        assert_eq!(entry.path, "/courses/search/alg");
        assert_eq!(entry.query.as_deref(), Some("page=2"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
        assert!(entry.referer.is_none());

        assert_eq!(send(&state, req).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state();
        create(&state, 1, "Algorithms").await;
        let (status, body) = send(&state, request(Method::GET, "/healthz", "")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["courses"], 1);

        let mut config = state.config.clone();
        config.routes.health_enabled = false;
        let disabled = Arc::new(AppState::new(&config, CourseStore::new()));
        let (status, _) = send(&disabled, request(Method::GET, "/healthz", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&disabled, Method::POST, "/healthz").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&state, Method::POST, "/healthz").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_head_returns_get_headers_without_body() {
        let state = test_state();
        create(&state, 1, "Algorithms").await;

        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let get = handle_request(request(Method::GET, "/courses", ""), Arc::clone(&state), addr)
            .await
            .unwrap();
        let head = handle_request(request(Method::HEAD, "/courses", ""), Arc::clone(&state), addr)
            .await
            .unwrap();
        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(head.headers()["content-length"], get.headers()["content-length"]);
        assert_eq!(head.headers()["content-type"], "application/json");
        let bytes = head.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());

        let (status, body) = send(&state, request(Method::HEAD, "/courses/9", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_create_accepts_null_title() {
        let state = test_state();
        let (status, body) = send(
            &state,
            request(Method::POST, "/courses", r#"{"courseId":2.0,"title":null}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["courseId"], 2);
        assert_eq!(value["title"], "");
    }
}
