// Fixed cross-origin headers attached to every gateway response

use warp::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use warp::reply::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

pub fn response_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
        (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
        (CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE)),
    ]
}

/// Overwrite whatever the reply set with the fixed header set
pub fn apply(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in response_headers() {
        headers.insert(name, value);
    }
    response
}
