//! Social API Endpoints
//! Mission: Follow, unfollow and the followed-authors feed

use crate::api::error::{ApiError, MessageResponse};
use crate::api::state::AppState;
use crate::auth::{credentials::CredentialError, middleware::AuthenticatedUser};
use crate::blog::models::PostWithAuthor;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct FollowedPosts {
    pub posts: Vec<PostWithAuthor>,
}

fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid user ID"))
}

/// Follow - POST /api/follow/:id
pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(target): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = parse_user_id(&target)?;

    if target == auth.id {
        return Err(ApiError::bad_request("Cannot follow yourself"));
    }

    state.credentials.get(target).await.map_err(|e| match e {
        CredentialError::NotFound => ApiError::not_found("Followed user not found"),
        other => other.into(),
    })?;

    // The insert also refuses a duplicate pair if two requests race here
    if state.follows.is_following(auth.id, target).await?
        || !state.follows.follow(auth.id, target).await?
    {
        return Err(ApiError::bad_request("Already following this user"));
    }
    Ok(MessageResponse::new("Successfully followed user"))
}

/// Unfollow - DELETE /api/unfollow/:id
pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(target): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = parse_user_id(&target)?;

    if !state.follows.unfollow(auth.id, target).await? {
        return Err(ApiError::not_found("Not following this user"));
    }
    Ok(MessageResponse::new("Successfully unfollowed user"))
}

/// Feed - GET /api/posts/followed
pub async fn followed_posts(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FollowedPosts>, ApiError> {
    let followed = state.follows.following(auth.id).await?;
    let posts = state.posts.by_authors(&followed).await?;
    Ok(Json(FollowedPosts { posts }))
}
