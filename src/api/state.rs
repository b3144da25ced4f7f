//! Application state shared by every handler

use crate::auth::{CredentialStore, TokenService};
use crate::blog::{CommentStore, PostStore};
use crate::db::Database;
use crate::social::FollowStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub posts: Arc<PostStore>,
    pub comments: Arc<CommentStore>,
    pub follows: Arc<FollowStore>,
}

impl AppState {
    /// Wire every store onto one database handle
    pub fn new(db: Database, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            credentials: Arc::new(CredentialStore::new(db.clone(), bcrypt_cost)),
            tokens: Arc::new(tokens),
            posts: Arc::new(PostStore::new(db.clone())),
            comments: Arc::new(CommentStore::new(db.clone())),
            follows: Arc::new(FollowStore::new(db)),
        }
    }
}
