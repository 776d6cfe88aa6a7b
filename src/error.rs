//! Error types for request handling

use hyper::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Terminal outcome of a failed request
///
/// The `Display` text is the plain-text response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid Course ID")]
    InvalidCourseId,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allow: String },

    #[error("Not Found")]
    RouteNotFound,
}

impl ApiError {
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCourseId | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::CourseNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_status() {
        assert_eq!(ApiError::InvalidCourseId.to_string(), "Invalid Course ID");
        assert_eq!(ApiError::InvalidCourseId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::CourseNotFound.to_string(), "Course not found");
        assert_eq!(ApiError::CourseNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed { allow: "GET".into() }.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
