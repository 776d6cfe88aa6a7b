//! HTTP protocol layer module
//!
//! Response construction shared by the request handlers, decoupled from
//! the course operations themselves.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_error_response, build_health_response, build_json_response, build_text_response,
};
