//! Route matching module
//!
//! Matches a request method and path against the ordered route table.
//! Patterns are `/`-separated; a `{name}` segment captures one non-empty
//! path segment, percent-decoded.

use hyper::Method;

use super::table::{Operation, Route};

/// Result of resolving a request against the route table
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A route matched on both path and method
    Matched {
        operation: Operation,
        params: Vec<(&'static str, String)>,
    },
    /// The path matched one or more routes, none with this method
    MethodNotAllowed { allow: Vec<Method> },
    NotFound,
}

/// Find the first route matching path and method
///
/// `HEAD` is served by the matching `GET` route.
pub fn match_route<'a>(
    method: &Method,
    path: &str,
    routes: impl IntoIterator<Item = &'a Route>,
) -> Resolution {
    let mut allow = Vec::new();

    for route in routes {
        let Some(params) = match_path(route.pattern, path) else {
            continue;
        };
        if route.method == *method || (*method == Method::HEAD && route.method == Method::GET) {
            return Resolution::Matched {
                operation: route.operation,
                params,
            };
        }
        if !allow.contains(&route.method) {
            allow.push(route.method.clone());
        }
    }

    if allow.is_empty() {
        Resolution::NotFound
    } else {
        Resolution::MethodNotAllowed { allow }
    }
}

/// Match a path against a pattern, returning captured parameters
pub fn match_path(pattern: &'static str, path: &str) -> Option<Vec<(&'static str, String)>> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = Vec::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push((name, percent_decode(actual)));
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Decode `%XX` escapes in a path segment
///
/// Malformed escapes are kept literally and invalid UTF-8 is replaced.
pub fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ROUTES;

    #[test]
    fn test_match_path_literal() {
        assert_eq!(match_path("/courses", "/courses"), Some(vec![]));
        assert_eq!(match_path("/courses", "/courses/"), None);
        assert_eq!(match_path("/courses", "/course"), None);
    }

    #[test]
    fn test_match_path_param() {
        assert_eq!(
            match_path("/courses/{id}", "/courses/12"),
            Some(vec![("id", "12".to_string())])
        );
        assert_eq!(match_path("/courses/{id}", "/courses/"), None);
        assert_eq!(match_path("/courses/{id}", "/courses/1/extra"), None);
    }

    #[test]
    fn test_search_route_wins_over_get_by_id() {
        let resolution = match_route(&Method::GET, "/courses/search/data", ROUTES);
        assert_eq!(
            resolution,
            Resolution::Matched {
                operation: Operation::SearchCourses,
                params: vec![("title", "data".to_string())],
            }
        );

        let resolution = match_route(&Method::GET, "/courses/search", ROUTES);
        assert_eq!(
            resolution,
            Resolution::Matched {
                operation: Operation::GetCourse,
                params: vec![("id", "search".to_string())],
            }
        );
    }

    #[test]
    fn test_method_selects_operation() {
        let ops: Vec<Operation> = [Method::GET, Method::PUT, Method::DELETE]
            .iter()
            .map(|m| match match_route(m, "/courses/1", ROUTES) {
                Resolution::Matched { operation, .. } => operation,
                other => panic!("unexpected resolution: {other:?}"),
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Operation::GetCourse,
                Operation::UpdateCourse,
                Operation::DeleteCourse
            ]
        );
    }

    #[test]
    fn test_method_not_allowed() {
        let resolution = match_route(&Method::PATCH, "/courses/1", ROUTES);
        assert_eq!(
            resolution,
            Resolution::MethodNotAllowed {
                allow: vec![Method::GET, Method::PUT, Method::DELETE]
            }
        );

        let resolution = match_route(&Method::DELETE, "/courses", ROUTES);
        assert_eq!(
            resolution,
            Resolution::MethodNotAllowed {
                allow: vec![Method::POST, Method::GET]
            }
        );
    }

    #[test]
    fn test_head_uses_get_route() {
        assert_eq!(
            match_route(&Method::HEAD, "/courses", ROUTES),
            Resolution::Matched {
                operation: Operation::ListCourses,
                params: vec![],
            }
        );
        assert_eq!(
            match_route(&Method::HEAD, "/courses/3", ROUTES),
            Resolution::Matched {
                operation: Operation::GetCourse,
                params: vec![("id", "3".to_string())],
            }
        );
    }

    #[test]
    fn test_filtered_routes_are_not_advertised() {
        let without_health = ROUTES.iter().filter(|r| r.operation != Operation::Health);
        assert_eq!(
            match_route(&Method::POST, "/healthz", without_health),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            match_route(&Method::GET, "/students", ROUTES),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("data%20bases"), "data bases");
        assert_eq!(percent_decode("C%2B%2B"), "C++");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("a+b"), "a+b");
    }
}
