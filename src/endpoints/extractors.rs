//! Request extractors shared by endpoint handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::services::audit::RequestMeta;

/// Capture method, path and client IP for audit entries. Infallible: a
/// request with no forwarding headers just yields `None` for the address.
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            });

        Ok(RequestMeta {
            method: Some(parts.method.to_string()),
            path: Some(parts.uri.path().to_string()),
            ip_address,
        })
    }
}
