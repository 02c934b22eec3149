use super::strategy::{AuthFailure, AuthRequest, AuthStrategy};
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use lib_auth::{decode_jwt, token};
use lib_core::{AuthMethod, Principal};
use serde_json::Value;

/// Verifies `Authorization: Bearer <jwt>` against the shared secret.
pub struct BearerStrategy {
    secret: String,
}

impl BearerStrategy {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    fn authenticate(&self, req: AuthRequest<'_>) -> Result<Principal, AuthFailure> {
        let token = req.authorization("Bearer").ok_or(AuthFailure::Missing)?;

        let claims = decode_jwt(token, &self.secret).map_err(|e| match e {
            token::Error::Expired => AuthFailure::Rejected("token expired".to_string()),
            other => AuthFailure::Rejected(other.to_string()),
        })?;

        let mut extra = claims.extra;
        extra.insert("exp".to_string(), Value::from(claims.exp));
        extra.insert("iat".to_string(), Value::from(claims.iat));

        Ok(Principal {
            subject_id: claims.sub,
            email: claims.email,
            auth_method: AuthMethod::Bearer,
            claims: extra,
        })
    }
}

impl AuthStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn try_authenticate<'a>(&'a self, req: AuthRequest<'a>) -> BoxFuture<'a, Result<Principal, AuthFailure>> {
        // Signature check is local; no await needed.
        future::ready(self.authenticate(req)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, Uri};
    use lib_auth::{encode_claims, encode_jwt, Claims};

    const SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";

    fn headers(auth: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_str(auth).unwrap());
        h
    }

    async fn run(h: &HeaderMap) -> Result<Principal, AuthFailure> {
        let uri = Uri::from_static("/api/projects");
        BearerStrategy::new(SECRET).try_authenticate(AuthRequest::new(h, &uri)).await
    }

    #[tokio::test]
    async fn test_valid_token_yields_claims() {
        let claims = Claims::new("12", Some("ada@example.com".to_string()), 1).with_claim("role", "admin");
        let token = encode_claims(&claims, SECRET).unwrap();

        let principal = run(&headers(&format!("Bearer {token}"))).await.unwrap();

        assert_eq!(principal.subject_id, "12");
        assert_eq!(principal.email.as_deref(), Some("ada@example.com"));
        assert_eq!(principal.auth_method, AuthMethod::Bearer);
        assert_eq!(principal.claims["role"], "admin");
        assert_eq!(principal.user_id(), Some(12));
    }

    #[tokio::test]
    async fn test_missing_header() {
        assert_eq!(run(&HeaderMap::new()).await.unwrap_err(), AuthFailure::Missing);
    }

    #[tokio::test]
    async fn test_other_scheme_is_missing() {
        assert_eq!(run(&headers("ApiKey ak_123")).await.unwrap_err(), AuthFailure::Missing);
    }

    #[tokio::test]
    async fn test_malformed_and_foreign_tokens_are_rejected() {
        assert!(matches!(run(&headers("Bearer garbage")).await, Err(AuthFailure::Rejected(_))));

        let foreign = encode_jwt("1", None, "some-other-secret-of-sufficient-length!!", 1).unwrap();
        assert!(matches!(
            run(&headers(&format!("Bearer {foreign}"))).await,
            Err(AuthFailure::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let expired = encode_jwt("1", None, SECRET, -2).unwrap();
        assert_eq!(
            run(&headers(&format!("Bearer {expired}"))).await.unwrap_err(),
            AuthFailure::Rejected("token expired".to_string())
        );
    }
}
