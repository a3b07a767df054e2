use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::extract::Request;

/// API keys issued to integration partners.
pub const API_KEY_HEADER: &str = "x-api-key";

/// User id stamped onto the request by the auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared bucket for callers with no usable identity.
pub const ANONYMOUS: &str = "anonymous";

/// Derive the throttling identifier for a request.
///
/// Prefers the API key, then the authenticated user id, then the peer
/// address. The prefixes keep the key spaces disjoint so an API key can
/// never collide with a user id or an IP.
pub fn from_request(req: &Request) -> String {
    if let Some(key) = header_str(req, API_KEY_HEADER) {
        return format!("key:{key}");
    }

    if let Some(user) = header_str(req, USER_ID_HEADER) {
        return format!("user:{user}");
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }

    ANONYMOUS.to_string()
}

fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    use super::*;

    fn request() -> HttpRequest<Body> {
        HttpRequest::builder().uri("/api/items").body(Body::empty()).unwrap()
    }

    #[test]
    fn test_api_key_wins() {
        let mut req = request();
        req.headers_mut().insert(API_KEY_HEADER, "abc123".parse().unwrap());
        req.headers_mut().insert(USER_ID_HEADER, "u-7".parse().unwrap());

        assert_eq!(from_request(&req), "key:abc123");
    }

    #[test]
    fn test_user_id_before_peer_address() {
        let mut req = request();
        req.headers_mut().insert(USER_ID_HEADER, "u-7".parse().unwrap());
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));

        assert_eq!(from_request(&req), "user:u-7");
    }

    #[test]
    fn test_peer_address_fallback() {
        let mut req = request();
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));

        assert_eq!(from_request(&req), "ip:10.0.0.1");
    }

    #[test]
    fn test_anonymous_fallback() {
        assert_eq!(from_request(&request()), ANONYMOUS);
    }

    #[test]
    fn test_empty_header_is_ignored() {
        let mut req = request();
        req.headers_mut().insert(API_KEY_HEADER, "".parse().unwrap());

        assert_eq!(from_request(&req), ANONYMOUS);
    }
}
