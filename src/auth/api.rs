//! Authentication API Endpoints
//! Mission: Registration, login and the signed-in user's own account

use crate::api::error::{ApiError, MessageResponse};
use crate::api::state::AppState;
use crate::auth::{
    credentials::CredentialError,
    middleware::{AuthenticatedUser, SESSION_COOKIE},
    models::{
        LoginForm, LoginResponse, Profile, RegisterForm, RegisterResponse, User,
        UserUpdatedResponse,
    },
};
use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, State},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// Register endpoint - POST /api/register (form-encoded)
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Form(form) = form.map_err(|e| {
        warn!(error = %e, "unreadable registration form");
        ApiError::bad_request("Invalid Email Address")
    })?;

    info!(email = %form.email, "registration attempt");

    let user = state
        .credentials
        .register(&form.email, &form.password, &form.profile())
        .await?;

    Ok(Json(RegisterResponse {
        user,
        message: "Account created successfully".to_string(),
    }))
}

/// Login endpoint - POST /api/login (form-encoded)
///
/// On success the session token is set as an HTTP-only cookie that expires
/// together with the token.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let form = form.map(|Form(f)| f).unwrap_or_default();

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = state
        .credentials
        .verify(&form.email, &form.password)
        .await
        .map_err(|e| match e {
            CredentialError::NotFound => {
                warn!(email = %form.email, "login for unknown email");
                ApiError::not_found("Email address doesn't exist, kindly create an account")
            }
            other => other.into(),
        })?;

    let token = state.tokens.issue(user.id).map_err(|e| {
        error!(error = %e, user_id = %user.id, "failed to issue session token");
        ApiError::InternalError
    })?;

    let expires =
        OffsetDateTime::now_utc() + time::Duration::seconds(state.tokens.ttl().num_seconds());
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .expires(expires);

    info!(user_id = %user.id, "login successful");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "You have successfully logged in".to_string(),
            user,
        }),
    ))
}

/// Current user - GET /api/user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<User>, ApiError> {
    let user = state.credentials.get(auth.id).await?;
    Ok(Json(user))
}

/// Update profile - PUT /api/user
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    body: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<UserUpdatedResponse>, ApiError> {
    let Json(profile) = body.map_err(|e| {
        debug!(error = %e, "unreadable user payload");
        ApiError::bad_request("Invalid user payload")
    })?;

    let user = state.credentials.update_profile(auth.id, &profile).await?;

    Ok(Json(UserUpdatedResponse {
        message: "User information updated successfully".to_string(),
        user,
    }))
}

/// Delete account - DELETE /api/user
///
/// The user's posts, comments and follow edges go with it.
pub async fn delete_current_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.credentials.delete(auth.id).await?;
    Ok(MessageResponse::new("User account deleted successfully"))
}
