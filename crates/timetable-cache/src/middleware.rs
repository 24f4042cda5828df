//! HTTP caching middleware for ETag and Cache-Control headers.
//!
//! Schedules change rarely within a day, so read endpoints get a short public
//! `Cache-Control` and a body-hash ETag that lets clients revalidate with
//! `If-None-Match` and receive `304 Not Modified`.
//!
//! # Example
//!
//! ```ignore
//! use timetable_cache::middleware::{cache_control, etag_middleware, CacheControlConfig};
//!
//! let app = Router::new()
//!     .route("/api/v1/schedule/groups/{group}", get(handler))
//!     .layer(cache_control(CacheControlConfig::public(60)))
//!     .layer(axum::middleware::from_fn(etag_middleware));
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tower_http::set_header::SetResponseHeaderLayer;

/// Configuration for the Cache-Control header.
#[derive(Debug, Clone)]
pub struct CacheControlConfig {
    /// Cacheable by shared caches (public) or only by the browser (private).
    pub public: bool,
    /// Seconds the response is considered fresh.
    pub max_age: u64,
    /// Always revalidate with the server.
    pub no_cache: bool,
    /// Seconds a stale response may be served while revalidating.
    pub stale_while_revalidate: Option<u64>,
}

impl CacheControlConfig {
    pub fn public(max_age: u64) -> Self {
        Self {
            public: true,
            max_age,
            no_cache: false,
            stale_while_revalidate: None,
        }
    }

    pub fn private(max_age: u64) -> Self {
        Self {
            public: false,
            ..Self::public(max_age)
        }
    }

    pub fn no_cache() -> Self {
        Self {
            public: false,
            max_age: 0,
            no_cache: true,
            stale_while_revalidate: None,
        }
    }

    pub fn with_stale_while_revalidate(mut self, seconds: u64) -> Self {
        self.stale_while_revalidate = Some(seconds);
        self
    }

    /// Build the Cache-Control header value.
    pub fn to_header_value(&self) -> HeaderValue {
        let mut directives = Vec::new();

        if self.no_cache {
            directives.push("no-cache".to_string());
            directives.push("must-revalidate".to_string());
        } else {
            directives.push(if self.public { "public" } else { "private" }.to_string());
            directives.push(format!("max-age={}", self.max_age));

            if let Some(swr) = self.stale_while_revalidate {
                directives.push(format!("stale-while-revalidate={}", swr));
            }
        }

        HeaderValue::from_str(&directives.join(", "))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self::no_cache()
    }
}

/// Produces the configured Cache-Control value for successful responses only.
#[derive(Clone)]
pub struct CacheControlMakeHeader(HeaderValue);

impl<B> tower_http::set_header::MakeHeaderValue<Response<B>> for CacheControlMakeHeader {
    fn make_header_value(&mut self, message: &Response<B>) -> Option<HeaderValue> {
        message.status().is_success().then(|| self.0.clone())
    }
}

/// Create a Cache-Control layer. Handlers that set their own header win.
pub fn cache_control(config: CacheControlConfig) -> SetResponseHeaderLayer<CacheControlMakeHeader> {
    let header_value = config.to_header_value();
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, CacheControlMakeHeader(header_value))
}

/// Generate a strong ETag from response body bytes.
fn generate_etag(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let hash = hasher.finalize();
    format!("\"{}\"", hex::encode(&hash[..16]))
}

/// Weak comparison, ignoring the `W/` prefix.
fn etags_match(client_etag: &str, server_etag: &str) -> bool {
    let client = client_etag.trim().trim_start_matches("W/");
    let server = server_etag.trim().trim_start_matches("W/");
    client == "*" || client == server
}

/// ETag middleware for conditional GET requests.
///
/// Successful GET responses are buffered, hashed and tagged. When the
/// request's `If-None-Match` lists the same tag the body is replaced by a
/// `304 Not Modified`. Other methods and error responses pass through untouched.
pub async fn etag_middleware(request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let if_none_match = request
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(request).await;

    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return (parts, Body::empty()).into_response(),
    };

    let etag = generate_etag(&bytes);

    if let Some(client_etag) = if_none_match
        && client_etag.split(',').any(|tag| etags_match(tag, &etag))
    {
        let mut not_modified = StatusCode::NOT_MODIFIED.into_response();
        if let Ok(value) = HeaderValue::from_str(&etag) {
            not_modified.headers_mut().insert(ETAG, value);
        }
        return not_modified;
    }

    let mut response = Response::from_parts(parts, Body::from(bytes));
    if let Ok(etag_value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(ETAG, etag_value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/data", get(|| async { "schedule" }).post(|| async { "created" }))
            .layer(axum::middleware::from_fn(etag_middleware))
    }

    #[test]
    fn test_cache_control_public() {
        let header = CacheControlConfig::public(300).to_header_value();
        assert_eq!(header.to_str().unwrap(), "public, max-age=300");
    }

    #[test]
    fn test_cache_control_private_with_swr() {
        let header = CacheControlConfig::private(60)
            .with_stale_while_revalidate(120)
            .to_header_value();
        assert_eq!(
            header.to_str().unwrap(),
            "private, max-age=60, stale-while-revalidate=120"
        );
    }

    #[test]
    fn test_cache_control_no_cache() {
        let header = CacheControlConfig::default().to_header_value();
        assert_eq!(header.to_str().unwrap(), "no-cache, must-revalidate");
    }

    #[test]
    fn test_etags_match() {
        assert!(etags_match("\"abc123\"", "\"abc123\""));
        assert!(etags_match("W/\"abc123\"", "\"abc123\""));
        assert!(etags_match("*", "\"abc123\""));
        assert!(!etags_match("\"abc123\"", "\"xyz789\""));
    }

    #[tokio::test]
    async fn test_etag_round_trip_returns_not_modified() {
        let response = app()
            .oneshot(Request::get("/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let etag = response.headers().get(ETAG).unwrap().clone();

        let response = app()
            .oneshot(
                Request::get("/data")
                    .header(IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_non_get_requests_are_not_tagged() {
        let response = app()
            .oneshot(Request::post("/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(ETAG).is_none());
    }

    #[tokio::test]
    async fn test_cache_control_skips_error_responses() {
        let app = Router::new()
            .route("/ok", get(|| async { "schedule" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .layer(cache_control(CacheControlConfig::public(300)));

        let ok = app
            .clone()
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            ok.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=300"
        );

        let missing = app
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(missing.headers().get(CACHE_CONTROL).is_none());
    }
}
