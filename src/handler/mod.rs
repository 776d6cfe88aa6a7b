//! Request handler module
//!
//! Responsible for request routing dispatch and the course operations
//! behind each route.

pub mod courses;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
