//! Route table
//!
//! Static mapping of (method, path pattern) to the operation that serves it.
//! Routes are tried in order; the first full match wins.

use hyper::Method;

/// Operations the request handler knows how to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateCourse,
    ListCourses,
    GetCourse,
    UpdateCourse,
    DeleteCourse,
    SearchCourses,
    Health,
}

/// A single route table entry
#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub pattern: &'static str,
    pub operation: Operation,
}

pub static ROUTES: &[Route] = &[
    Route {
        method: Method::POST,
        pattern: "/courses",
        operation: Operation::CreateCourse,
    },
    Route {
        method: Method::GET,
        pattern: "/courses",
        operation: Operation::ListCourses,
    },
    Route {
        method: Method::GET,
        pattern: "/courses/search/{title}",
        operation: Operation::SearchCourses,
    },
    Route {
        method: Method::GET,
        pattern: "/courses/{id}",
        operation: Operation::GetCourse,
    },
    Route {
        method: Method::PUT,
        pattern: "/courses/{id}",
        operation: Operation::UpdateCourse,
    },
    Route {
        method: Method::DELETE,
        pattern: "/courses/{id}",
        operation: Operation::DeleteCourse,
    },
    Route {
        method: Method::GET,
        pattern: "/healthz",
        operation: Operation::Health,
    },
];
