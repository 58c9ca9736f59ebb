use axum::http::{header, HeaderMap};

/// Authorization scheme used by both services: `Authorization: Token <value>`.
pub const TOKEN_SCHEME: &str = "Token ";

/// Pull the bearer credential out of the Authorization header.
///
/// Returns `None` for a missing header, a different scheme, or an empty
/// value; callers collapse all of those into the same unauthorized response.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(TOKEN_SCHEME))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
