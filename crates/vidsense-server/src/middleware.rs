use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Origins with this prefix are always allowed (the browser extension client).
const EXTENSION_ORIGIN_PREFIX: &str = "chrome-extension://";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// CORS origin check: exact match against the allowlist, or any browser
/// extension origin.
pub fn is_origin_allowed(origin: &str, allowlist: &[String]) -> bool {
    origin.starts_with(EXTENSION_ORIGIN_PREFIX) || allowlist.iter().any(|allowed| allowed == origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "http://youtubeanalysistech.com".to_string(),
        ]
    }

    #[test]
    fn allows_listed_origin() {
        assert!(is_origin_allowed("http://localhost:3000", &allowlist()));
    }

    #[test]
    fn allows_any_extension_origin() {
        assert!(is_origin_allowed(
            "chrome-extension://abcdefghijklmnop",
            &allowlist()
        ));
    }

    #[test]
    fn rejects_unlisted_origin() {
        assert!(!is_origin_allowed("http://evil.example.com", &allowlist()));
        assert!(!is_origin_allowed("http://localhost:3001", &allowlist()));
    }

    #[test]
    fn rejects_prefix_lookalike() {
        assert!(!is_origin_allowed(
            "http://youtubeanalysistech.com.evil.io",
            &allowlist()
        ));
    }
}
