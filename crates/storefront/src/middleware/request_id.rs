//! Request correlation ids.
//!
//! A proxy-supplied `x-request-id` is kept when it looks sane; anything else
//! gets a fresh UUID v4. The id lands on the request span, the Sentry scope
//! and the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The upstream id, if it is short printable ASCII.
fn upstream_id(headers: &HeaderMap) -> Option<&str> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let sane = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    sane.then_some(id)
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = upstream_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    tracing::Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(id).unwrap_or(HeaderValue::from_static(""));
        headers.insert(REQUEST_ID_HEADER, value);
        headers
    }

    #[test]
    fn test_upstream_id_is_kept() {
        assert_eq!(upstream_id(&headers("req-123")), Some("req-123"));
    }

    #[test]
    fn test_unusable_upstream_ids_are_replaced() {
        assert_eq!(upstream_id(&HeaderMap::new()), None);
        assert_eq!(upstream_id(&headers("")), None);
        assert_eq!(upstream_id(&headers("has space")), None);
        assert_eq!(upstream_id(&headers(&"a".repeat(200))), None);
    }
}
