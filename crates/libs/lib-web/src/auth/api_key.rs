use super::strategy::{AuthFailure, AuthRequest, AuthStrategy};
use axum::extract::Query;
use axum::http::Uri;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use lib_core::{CredentialStore, Principal};
use std::collections::HashMap;
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Stand-in for secrets in logs and error envelopes.
pub const REDACTED: &str = "***REDACTED***";

/// Replaces the value of every `api_key` pair in a raw query string.
pub fn mask_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((API_KEY_QUERY_PARAM, _)) => format!("{API_KEY_QUERY_PARAM}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// `path?query` as it may be logged or echoed back to the client.
pub fn masked_path_and_query(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}?{}", uri.path(), mask_query(query)),
        None => uri.path().to_string(),
    }
}

/// Looks up an opaque key through the [`CredentialStore`].
pub struct ApiKeyStrategy {
    store: Arc<dyn CredentialStore>,
}

impl ApiKeyStrategy {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The presented key, by precedence: `x-api-key` header, `api_key`
    /// query parameter, `Authorization: ApiKey <key>`.
    pub fn extract_key(req: &AuthRequest<'_>) -> Option<String> {
        let from_header = req
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        from_header
            .or_else(|| {
                Query::<HashMap<String, String>>::try_from_uri(req.uri)
                    .ok()
                    .and_then(|Query(mut params)| params.remove(API_KEY_QUERY_PARAM))
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
            })
            .or_else(|| req.authorization("ApiKey").map(str::to_string))
    }
}

impl AuthStrategy for ApiKeyStrategy {
    fn name(&self) -> &'static str {
        "api_key"
    }

    fn try_authenticate<'a>(&'a self, req: AuthRequest<'a>) -> BoxFuture<'a, Result<Principal, AuthFailure>> {
        async move {
            let key = Self::extract_key(&req).ok_or(AuthFailure::Missing)?;

            let valid = self
                .store
                .validate(&key)
                .await
                .map_err(|e| AuthFailure::Internal(e.to_string()))?;
            if !valid {
                return Err(AuthFailure::Rejected("unknown or inactive key".to_string()));
            }

            self.store
                .resolve(&key)
                .await
                .map_err(|e| AuthFailure::Internal(e.to_string()))?
                .ok_or(AuthFailure::Inactive)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, Uri};
    use lib_core::model::store::{memory_pool, ApiKeyRepository, SqlCredentialStore};
    use lib_core::AuthMethod;

    fn request<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> AuthRequest<'a> {
        AuthRequest::new(headers, uri)
    }

    #[test]
    fn test_query_key_trimmed_like_header() {
        let headers = HeaderMap::new();
        let padded: Uri = "/api/projects?api_key=%20ak_padded%20".parse().unwrap();
        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &padded)).as_deref(), Some("ak_padded"));

        let blank: Uri = "/api/projects?api_key=%20%20".parse().unwrap();
        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &blank)), None);
    }

    #[test]
    fn test_api_key_query_masked() {
        assert_eq!(mask_query("page=2&api_key=ak_abc"), format!("page=2&api_key={REDACTED}"));
        assert_eq!(mask_query("page=2"), "page=2");

        let uri: Uri = "/api/projects?api_key=ak_secret&limit=5".parse().unwrap();
        let masked = masked_path_and_query(&uri);
        assert_eq!(masked, format!("/api/projects?api_key={REDACTED}&limit=5"));
        assert!(!masked.contains("ak_secret"));

        let bare: Uri = "/api/projects".parse().unwrap();
        assert_eq!(masked_path_and_query(&bare), "/api/projects");
    }

    #[test]
    fn test_key_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("from-header"));
        headers.insert("authorization", HeaderValue::from_static("ApiKey from-authorization"));
        let uri: Uri = "/api/projects?api_key=from-query".parse().unwrap();

        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &uri)).as_deref(), Some("from-header"));

        headers.remove("x-api-key");
        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &uri)).as_deref(), Some("from-query"));

        let bare: Uri = "/api/projects".parse().unwrap();
        assert_eq!(
            ApiKeyStrategy::extract_key(&request(&headers, &bare)).as_deref(),
            Some("from-authorization")
        );

        headers.remove("authorization");
        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &bare)), None);
    }

    #[test]
    fn test_query_key_is_percent_decoded() {
        let headers = HeaderMap::new();
        let uri: Uri = "/x?api_key=ak_a%2Bb&page=2".parse().unwrap();
        assert_eq!(ApiKeyStrategy::extract_key(&request(&headers, &uri)).as_deref(), Some("ak_a+b"));
    }

    #[tokio::test]
    async fn test_authenticates_active_key_only() {
        let pool = memory_pool().await.unwrap();
        let owner: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, email, password_hash) VALUES ('o', 'o@example.com', 'h') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        ApiKeyRepository::create(&pool, "ak_live", None, Some(owner)).await.unwrap();
        let old = ApiKeyRepository::create(&pool, "ak_old", None, Some(owner)).await.unwrap();
        ApiKeyRepository::deactivate(&pool, old.id, owner).await.unwrap();

        let strategy = ApiKeyStrategy::new(Arc::new(SqlCredentialStore::new(pool)));
        let uri = Uri::from_static("/api/projects");

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("ak_live"));
        let principal = strategy.try_authenticate(request(&headers, &uri)).await.unwrap();
        assert_eq!(principal.auth_method, AuthMethod::ApiKey);

        headers.insert("x-api-key", HeaderValue::from_static("ak_old"));
        assert!(matches!(
            strategy.try_authenticate(request(&headers, &uri)).await,
            Err(AuthFailure::Rejected(_))
        ));

        assert_eq!(
            strategy.try_authenticate(request(&HeaderMap::new(), &uri)).await.unwrap_err(),
            AuthFailure::Missing
        );
    }
}
