//! Authentication Middleware
//! Mission: Gate protected routes on a valid session cookie

use crate::auth::jwt::{TokenError, TokenService};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Name of the HTTP-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "jwt";

/// Subject bound to a request once the gate has accepted its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

/// Auth middleware that validates the session cookie
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let subject = tokens.validate(&token).map_err(AuthError::InvalidToken)?;

    // Handlers read the subject back through the extractor below
    req.extensions_mut().insert(AuthenticatedUser { id: subject });

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}

/// Auth error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken(TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => debug!("rejecting request without session cookie"),
            AuthError::InvalidToken(e) => debug!(reason = %e, "rejecting request with invalid session token"),
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": "Token parsing failed",
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, middleware, routing::get, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    async fn whoami(user: AuthenticatedUser) -> String {
        user.id.to_string()
    }

    fn gated_app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
    }

    fn request_with_cookie(cookie: Option<String>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let expired = AuthError::InvalidToken(TokenError::Expired).into_response();
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_extractor_rejects_ungated_request() {
        // Route mounted without the gate: nothing bound the subject
        let app = Router::new().route("/me", get(whoami));

        let response = app.oneshot(request_with_cookie(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_cookie_binds_subject() {
        let tokens = Arc::new(TokenService::new("gate-secret"));
        let subject = Uuid::new_v4();
        let token = tokens.issue(subject).unwrap();

        let response = gated_app(tokens)
            .oneshot(request_with_cookie(Some(format!("{SESSION_COOKIE}={token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, subject.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_missing_cookie_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret"));

        let response = gated_app(tokens)
            .oneshot(request_with_cookie(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tampered_and_expired_cookies_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret"));
        let forged = TokenService::new("other-secret").issue(Uuid::new_v4()).unwrap();
        let expired = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(48))
            .unwrap();

        for token in [forged, expired, "garbage".to_string()] {
            let response = gated_app(tokens.clone())
                .oneshot(request_with_cookie(Some(format!("{SESSION_COOKIE}={token}"))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_bearer_header_is_not_a_credential_carrier() {
        let tokens = Arc::new(TokenService::new("gate-secret"));
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let request = axum::http::Request::builder()
            .uri("/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = gated_app(tokens).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
