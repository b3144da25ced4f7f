//! HTTP Router
//! Mission: Mount public and cookie-gated routes onto one axum app

use crate::api::state::AppState;
use crate::auth::{api as auth_api, auth_middleware};
use crate::blog::api as blog_api;
use crate::middleware::request_logging_simple;
use crate::social::api as social_api;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    // Auth routes stay public; the gate would reject a caller without a cookie
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(auth_api::register))
        .route("/api/login", post(auth_api::login));

    let protected_routes = Router::new()
        .route(
            "/api/user",
            get(auth_api::get_current_user)
                .put(auth_api::update_current_user)
                .delete(auth_api::delete_current_user),
        )
        .route("/api/posts", post(blog_api::create_post))
        .route("/api/allpost", get(blog_api::list_posts))
        .route("/api/allpost/:id", get(blog_api::get_post))
        .route("/api/updatepost/:id", put(blog_api::update_post))
        .route("/api/uniquepost", get(blog_api::my_posts))
        .route("/api/deletepost/:id", delete(blog_api::delete_post))
        .route("/api/post/:id/comment", post(blog_api::create_comment))
        .route("/api/post/:id/comments", get(blog_api::list_comments))
        .route(
            "/api/post/:id/comment/:comment_id",
            put(blog_api::update_comment).delete(blog_api::delete_comment),
        )
        .route("/api/follow/:id", post(social_api::follow_user))
        .route("/api/unfollow/:id", delete(social_api::unfollow_user))
        .route("/api/posts/followed", get(social_api::followed_posts))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(middleware::from_fn(request_logging_simple))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
