//! Course registry
//!
//! A small HTTP service keeping course records in memory. Requests are
//! resolved through an explicit route table (`routing`), handled in
//! `handler`, and applied to a `store::CourseStore` owned by the shared
//! `config::AppState`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
