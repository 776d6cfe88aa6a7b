//! Routing module
//!
//! Provides the explicit route table and the matcher that resolves a
//! request method and path to an operation plus captured path parameters.

mod matcher;
mod table;

pub use matcher::{match_route, Resolution};
pub use table::{Operation, Route, ROUTES};
