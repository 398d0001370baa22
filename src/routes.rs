// Route definitions

use std::convert::Infallible;
use std::sync::Arc;

use crate::gateway::Gateway;
use crate::handlers;
use crate::handlers::relay::BodyRejected;
use warp::http::Method;
use warp::{Filter, Rejection};

/// Default cap on a POST body, in bytes
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

pub fn configure_routes(
    gateway: Arc<Gateway>,
    max_body_bytes: u64,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Infallible> + Clone {
    // Every path and method lands in one handler; the gateway does its own
    // method routing so unsupported verbs get a JSON 405 with CORS headers.
    warp::any()
        .and(warp::method())
        .and(bounded_body(max_body_bytes))
        .and(with_gateway(gateway))
        .and_then(handlers::relay_handler)
        .recover(handlers::recover_rejection)
        .unify()
}

/// Buffer the body only after checking its declared length. A POST must
/// declare one; other methods are only checked when they do.
fn bounded_body(limit: u64) -> impl Filter<Extract = (bytes::Bytes,), Error = Rejection> + Clone {
    warp::method()
        .and(warp::header::optional::<u64>("content-length"))
        .and_then(move |method: Method, length: Option<u64>| async move {
            match length {
                Some(length) if length > limit => {
                    Err(warp::reject::custom(BodyRejected::TooLarge { limit }))
                }
                None if method == Method::POST => {
                    Err(warp::reject::custom(BodyRejected::LengthRequired))
                }
                _ => Ok::<(), Rejection>(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
}

fn with_gateway(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (Arc<Gateway>,), Error = Infallible> + Clone {
    warp::any().map(move || gateway.clone())
}
