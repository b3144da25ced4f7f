//! Blog Module
//! Mission: Posts and the comment threads under them

pub mod api;
pub mod comments;
pub mod models;
pub mod posts;

pub use comments::CommentStore;
pub use posts::PostStore;
