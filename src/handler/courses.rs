//! Course operation handlers
//!
//! One function per route-table operation. Each takes already-parsed
//! inputs, runs the store operation under the store lock and builds the
//! response. Absence from the store becomes `ApiError::CourseNotFound`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::error::{ApiError, Result};
use crate::http::{build_health_response, build_json_response, build_text_response};
use crate::logger;
use crate::store::Course;

/// `POST /courses`
///
/// Ids must be strictly positive; the check happens here, not in the store.
pub async fn create_course(state: &AppState, course: Course) -> Result<Response<Full<Bytes>>> {
    if course.course_id <= 0 {
        return Err(ApiError::InvalidCourseId);
    }

    let created = state.store.write().await.add(course);
    logger::log_course_created(created.course_id);

    Ok(build_json_response(
        StatusCode::CREATED,
        &created,
        &state.config.http.server_name,
    ))
}

/// `GET /courses`
pub async fn list_courses(state: &AppState) -> Response<Full<Bytes>> {
    let store = state.store.read().await;
    build_json_response(
        StatusCode::OK,
        store.get_all(),
        &state.config.http.server_name,
    )
}

/// `GET /courses/{id}`
pub async fn get_course(state: &AppState, id: i64) -> Result<Response<Full<Bytes>>> {
    let store = state.store.read().await;
    let course = store.get_by_id(id).ok_or(ApiError::CourseNotFound)?;
    Ok(build_json_response(
        StatusCode::OK,
        course,
        &state.config.http.server_name,
    ))
}

/// `PUT /courses/{id}`
///
/// Full replacement. The body's `courseId` is stored as sent even when it
/// differs from `id`.
pub async fn update_course(
    state: &AppState,
    id: i64,
    course: Course,
) -> Result<Response<Full<Bytes>>> {
    let updated = state
        .store
        .write()
        .await
        .update(id, course)
        .ok_or(ApiError::CourseNotFound)?;
    logger::log_course_updated(id, updated.course_id);

    Ok(build_json_response(
        StatusCode::OK,
        &updated,
        &state.config.http.server_name,
    ))
}

/// `DELETE /courses/{id}`
pub async fn delete_course(state: &AppState, id: i64) -> Result<Response<Full<Bytes>>> {
    if !state.store.write().await.delete(id) {
        return Err(ApiError::CourseNotFound);
    }
    logger::log_course_deleted(id);

    Ok(build_text_response(
        StatusCode::OK,
        "Course deleted successfully",
        &state.config.http.server_name,
    ))
}

/// `GET /courses/search/{title}`
pub async fn search_courses(state: &AppState, title: &str) -> Response<Full<Bytes>> {
    let store = state.store.read().await;
    let matches = store.search_by_title(title);
    build_json_response(StatusCode::OK, &matches, &state.config.http.server_name)
}

/// `GET /healthz`
pub async fn health(state: &AppState) -> Response<Full<Bytes>> {
    let count = state.store.read().await.len();
    build_health_response(count, &state.config.http.server_name)
}
