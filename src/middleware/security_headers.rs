//! HTTP security headers middleware
//!
//! Adds standard hardening headers to every response.

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;

/// Middleware that injects security headers into every response:
/// clickjacking, MIME sniffing and referrer-leak protection.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'self'"),
    );

    response
}
