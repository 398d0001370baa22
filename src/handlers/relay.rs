// Catch-all relay handler: any path, any method

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use warp::http::{Method, StatusCode};
use warp::reply::Response;
use warp::Reply;

use super::cors;
use crate::gateway::{Gateway, RelayReply, BODY_TOO_LARGE, INTERNAL_ERROR, LENGTH_REQUIRED};
use crate::models::ErrorEnvelope;

/// Why a request body was refused before it was buffered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRejected {
    TooLarge { limit: u64 },
    LengthRequired,
}

impl warp::reject::Reject for BodyRejected {}

pub async fn relay_handler(
    method: Method,
    body: Bytes,
    gateway: Arc<Gateway>,
) -> Result<Response, Infallible> {
    tracing::info!(method = %method, bytes = body.len(), "relay request");

    let reply = gateway.handle(&method, &body).await;

    tracing::info!(method = %method, status = reply.status.as_u16(), "relay response");
    Ok(into_response(reply))
}

/// Turn any rejection that reaches the top of the filter tree into the
/// same JSON envelope and headers the handler produces.
pub async fn recover_rejection(rejection: warp::Rejection) -> Result<Response, Infallible> {
    if let Some(refused) = rejection.find::<BodyRejected>() {
        tracing::info!(reason = ?refused, "request body refused");
        let envelope = match refused {
            BodyRejected::TooLarge { limit } => ErrorEnvelope::new(BODY_TOO_LARGE)
                .with_message(format!("limit is {} bytes", limit)),
            BodyRejected::LengthRequired => ErrorEnvelope::new(LENGTH_REQUIRED),
        };
        return Ok(into_response(RelayReply::error(StatusCode::BAD_REQUEST, envelope)));
    }

    tracing::warn!(rejection = ?rejection, "unhandled rejection");
    let reply = RelayReply::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorEnvelope::new(INTERNAL_ERROR).with_message(format!("{:?}", rejection)),
    );

    Ok(into_response(reply))
}

pub fn into_response(reply: RelayReply) -> Response {
    let response = match reply.body {
        Some(body) => {
            warp::reply::with_status(warp::reply::json(&body), reply.status).into_response()
        }
        None => warp::reply::with_status(warp::reply(), reply.status).into_response(),
    };
    cors::apply(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warp::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};

    #[test]
    fn test_json_reply_keeps_status_and_gets_headers() {
        let response = into_response(RelayReply::json(
            StatusCode::BAD_REQUEST,
            &json!({"error": "Request must include messages array"}),
        ));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_empty_reply_gets_headers() {
        let response = into_response(RelayReply::empty());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_oversized_body_is_bad_request() {
        let rejection = warp::reject::custom(BodyRejected::TooLarge { limit: 16 });
        let response = recover_rejection(rejection).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_recovered_rejection_is_enveloped() {
        let response = recover_rejection(warp::reject::not_found()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
