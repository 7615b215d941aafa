/// Request authentication extractor
///
/// This module provides [`AuthContext`], an axum extractor that validates the
/// `Authorization: Bearer <token>` header and exposes the caller's identity
/// to handlers. Handlers opt in to authentication simply by taking an
/// `AuthContext` argument; routes without one stay public.
///
/// The JWT secret is pulled from application state via [`FromRef`], so any
/// state type that can hand out a [`JwtSecret`] works.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use fiscus_shared::auth::extract::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {}", auth.user_id)
/// }
/// ```
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{self, Claims};

/// JWT signing secret, provided by application state
///
/// The API server's state implements `FromRef<AppState> for JwtSecret` so the
/// extractor can validate tokens without a dedicated middleware layer.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Authenticated user context available to request handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user
    pub user_id: Uuid,

    /// Email carried in the token claims
    pub email: String,
}

impl AuthContext {
    /// Builds a context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
        }
    }
}

/// Error type for failed authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer token in the Authorization header
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// Token failed validation (bad signature, expired, wrong issuer)
    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtSecret(secret) = JwtSecret::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let claims = jwt::validate_token(token, &secret).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthContext::from_claims(&claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[derive(Clone)]
    struct TestState {
        secret: JwtSecret,
    }

    impl FromRef<TestState> for JwtSecret {
        fn from_ref(state: &TestState) -> JwtSecret {
            state.secret.clone()
        }
    }

    fn test_state() -> TestState {
        TestState {
            secret: JwtSecret(SECRET.to_string()),
        }
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_token_extracts_context() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com".to_string());
        let token = jwt::create_token(&claims, SECRET).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let ctx = AuthContext::from_request_parts(&mut parts, &test_state())
            .await
            .expect("Should authenticate");

        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let mut parts = parts_with_auth(None);
        let result = AuthContext::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejected() {
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let result = AuthContext::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let mut parts = parts_with_auth(Some("Bearer not-a-jwt"));
        let result = AuthContext::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "test@example.com".to_string(),
            Duration::seconds(-3600),
        );
        let token = jwt::create_token(&claims, SECRET).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let result = AuthContext::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "test@example.com".to_string());
        let token = jwt::create_token(&claims, "a-completely-different-secret-key").unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let result = AuthContext::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
