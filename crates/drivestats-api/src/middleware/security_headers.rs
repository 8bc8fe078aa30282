//! Security headers middleware
//!
//! Every response gets a fixed set of hardening headers. JSON endpoints also
//! get a deny-all Content-Security-Policy; the Swagger UI pages load their
//! own scripts and styles, so they get a same-origin policy instead.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

const DOCS_PREFIX: &str = "/swagger-ui";

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const DOCS_CSP: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:";

static COMMON_HEADERS: [(HeaderName, &str); 5] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (header::CACHE_CONTROL, "no-store"),
];

/// Add hardening headers to every response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let is_docs = request.uri().path().starts_with(DOCS_PREFIX);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in COMMON_HEADERS.iter() {
        headers.insert(name.clone(), HeaderValue::from_static(value));
    }

    let csp = if is_docs { DOCS_CSP } else { API_CSP };
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(csp));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{Request, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/vehicles", get(|| async { "[]" }))
            .route(
                "/swagger-ui/index.html",
                get(|| async { "<html></html>" }),
            )
            .route(
                "/boom",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response() }),
            )
            .layer(middleware::from_fn(security_headers_middleware))
    }

    async fn get_headers(uri: &str) -> axum::http::HeaderMap {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().headers().clone()
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        let headers = get_headers("/vehicles").await;

        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(headers.get(header::CONTENT_SECURITY_POLICY).unwrap(), API_CSP);
    }

    #[tokio::test]
    async fn test_docs_get_same_origin_policy() {
        let headers = get_headers("/swagger-ui/index.html").await;
        assert_eq!(headers.get(header::CONTENT_SECURITY_POLICY).unwrap(), DOCS_CSP);
    }

    #[tokio::test]
    async fn test_security_headers_on_error_response() {
        let headers = get_headers("/boom").await;
        assert!(headers.get(header::X_CONTENT_TYPE_OPTIONS).is_some());
        assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_some());
    }
}
