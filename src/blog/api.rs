//! Blog API Endpoints
//! Mission: HTTP handlers for posts and comments

use crate::api::error::{ApiError, MessageResponse};
use crate::api::state::AppState;
use crate::auth::middleware::AuthenticatedUser;
use crate::blog::models::{
    CommentBody, CommentList, CommentResponse, NewPost, PageMeta, PostCreated, PostDetail,
    PostPage, PostUpdate, PostWithAuthor, PAGE_SIZE,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page; missing, unparseable or non-positive values mean page 1
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.max(1) as u64)
            .unwrap_or(1)
    }
}

fn parse_post_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid post ID"))
}

fn parse_comment_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid comment ID"))
}

/// Load a post and make sure `auth` wrote it
async fn owned_post(
    state: &AppState,
    auth: AuthenticatedUser,
    post_id: i64,
) -> Result<PostWithAuthor, ApiError> {
    let post = state
        .posts
        .get(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.post.user_id != auth.id {
        warn!(post_id, user_id = %auth.id, "post modification by non-author");
        return Err(ApiError::forbidden("You can only modify your own posts"));
    }
    Ok(post)
}

/// Create post - POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    body: Result<Json<NewPost>, JsonRejection>,
) -> Result<Json<PostCreated>, ApiError> {
    let Json(new_post) = body.map_err(|e| {
        debug!(error = %e, "unreadable post payload");
        ApiError::bad_request("Invalid payload")
    })?;

    let post = state.posts.create(auth.id, &new_post).await?;

    Ok(Json(PostCreated {
        message: "Congratulations! Your post is live".to_string(),
        post,
    }))
}

/// Paginated listing - GET /api/allpost?page=N
pub async fn list_posts(
    State(state): State<AppState>,
    query: Option<Query<PageQuery>>,
) -> Result<Json<PostPage>, ApiError> {
    let page = query.map(|Query(q)| q.page()).unwrap_or(1);
    let (data, total) = state.posts.list_page(page, PAGE_SIZE).await?;

    Ok(Json(PostPage {
        data,
        meta: PageMeta::new(total, page, PAGE_SIZE),
    }))
}

/// Single post - GET /api/allpost/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    let id = parse_post_id(&id)?;
    let data = state
        .posts
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(PostDetail { data }))
}

/// Update post - PUT /api/updatepost/:id
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    body: Result<Json<PostUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_post_id(&id)?;
    let Json(update) = body.map_err(|e| {
        debug!(error = %e, "unreadable post update");
        ApiError::bad_request("Invalid payload")
    })?;

    owned_post(&state, auth, id).await?;

    if !state.posts.update(id, &update).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    Ok(MessageResponse::new("post updated successfully"))
}

/// Own posts - GET /api/uniquepost
pub async fn my_posts(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    Ok(Json(state.posts.by_author(auth.id).await?))
}

/// Delete post - DELETE /api/deletepost/:id
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_post_id(&id)?;
    owned_post(&state, auth, id).await?;

    if !state.posts.delete(id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    Ok(MessageResponse::new("post deleted successfully"))
}

/// Comment on a post - POST /api/post/:id/comment
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<String>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<Json<CommentResponse>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "unreadable comment payload");
        ApiError::bad_request("Invalid comment payload")
    })?;

    if state.posts.get(post_id).await?.is_none() {
        return Err(ApiError::not_found("Blog post not found"));
    }

    let comment = state
        .comments
        .create(post_id, auth.id, &body.content)
        .await?;

    Ok(Json(CommentResponse {
        message: "Comment created successfully".to_string(),
        comment,
    }))
}

/// Comments on a post - GET /api/post/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<CommentList>, ApiError> {
    let post_id = parse_post_id(&post_id)?;

    if state.posts.get(post_id).await?.is_none() {
        return Err(ApiError::not_found("Blog post not found"));
    }

    let comments = state.comments.for_post(post_id).await?;

    Ok(Json(CommentList {
        message: "Comments retrieved successfully".to_string(),
        comments,
    }))
}

/// Resolve a comment under its post and check that `auth` wrote it
async fn owned_comment(
    state: &AppState,
    auth: AuthenticatedUser,
    post_id: i64,
    comment_id: i64,
) -> Result<(), ApiError> {
    let comment = state
        .comments
        .get(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if comment.user_id != auth.id {
        warn!(comment_id, user_id = %auth.id, "comment modification by non-author");
        return Err(ApiError::forbidden("You can only modify your own comments"));
    }
    Ok(())
}

/// Edit comment - PUT /api/post/:id/comment/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(String, String)>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<Json<CommentResponse>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "unreadable comment payload");
        ApiError::bad_request("Invalid comment payload")
    })?;

    owned_comment(&state, auth, post_id, comment_id).await?;

    let comment = state
        .comments
        .update_content(comment_id, &body.content)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(CommentResponse {
        message: "Comment updated successfully".to_string(),
        comment,
    }))
}

/// Remove comment - DELETE /api/post/:id/comment/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = parse_comment_id(&comment_id)?;

    owned_comment(&state, auth, post_id, comment_id).await?;

    if !state.comments.delete(comment_id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }
    Ok(MessageResponse::new("Comment deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_page_query_defaults_and_clamps() {
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("3")).page(), 3);
        assert_eq!(query(Some("0")).page(), 1);
        assert_eq!(query(Some("-4")).page(), 1);
        assert_eq!(query(Some("abc")).page(), 1);
    }

    #[test]
    fn test_id_parsing() {
        assert_eq!(parse_post_id("42").unwrap(), 42);
        assert!(matches!(
            parse_post_id("forty-two"),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid post ID"
        ));
        assert!(matches!(
            parse_comment_id(""),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid comment ID"
        ));
    }
}
