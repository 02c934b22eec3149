use axum::http::{HeaderMap, Uri};
use futures_util::future::BoxFuture;
use lib_core::Principal;
use thiserror::Error;

/// The parts of a request a strategy may inspect.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    pub headers: &'a HeaderMap,
    pub uri: &'a Uri,
}

impl<'a> AuthRequest<'a> {
    pub fn new(headers: &'a HeaderMap, uri: &'a Uri) -> Self {
        Self { headers, uri }
    }

    /// `Authorization` header credentials for `scheme` (case-insensitive).
    pub fn authorization(&self, scheme: &str) -> Option<&'a str> {
        let value = self.headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
        let (found, credentials) = value.trim().split_once(' ')?;
        let credentials = credentials.trim();
        (found.eq_ignore_ascii_case(scheme) && !credentials.is_empty()).then_some(credentials)
    }
}

/// Why a strategy declined a request. Logged, never shown to clients.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("no credentials for this strategy")]
    Missing,
    #[error("credentials rejected: {0}")]
    Rejected(String),
    #[error("credential inactive")]
    Inactive,
    #[error("strategy error: {0}")]
    Internal(String),
}

pub trait AuthStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_authenticate<'a>(&'a self, req: AuthRequest<'a>) -> BoxFuture<'a, Result<Principal, AuthFailure>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authorization_scheme_matching() {
        let uri = Uri::from_static("/");

        let headers = auth("Bearer abc.def.ghi");
        assert_eq!(AuthRequest::new(&headers, &uri).authorization("Bearer"), Some("abc.def.ghi"));
        assert_eq!(AuthRequest::new(&headers, &uri).authorization("ApiKey"), None);

        let headers = auth("bearer   tok");
        assert_eq!(AuthRequest::new(&headers, &uri).authorization("Bearer"), Some("tok"));

        let headers = auth("Bearer");
        assert_eq!(AuthRequest::new(&headers, &uri).authorization("Bearer"), None);

        let headers = auth("Bearer ");
        assert_eq!(AuthRequest::new(&headers, &uri).authorization("Bearer"), None);
    }
}
