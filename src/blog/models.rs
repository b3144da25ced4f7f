//! Blog Models
//! Mission: Posts, comments and their request/response shapes

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::models::User;
use crate::db::uuid_column;

/// Posts per page on the public listing
pub const PAGE_SIZE: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub image: String,
    pub user_id: Uuid,
    pub created_at: String,
}

impl Post {
    pub(crate) fn from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(start)?,
            title: row.get(start + 1)?,
            desc: row.get(start + 2)?,
            image: row.get(start + 3)?,
            user_id: uuid_column(row, start + 4)?,
            created_at: row.get(start + 5)?,
        })
    }
}

/// A post with its author embedded under `user`
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub image: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Uuid,
    pub content: String,
    pub date_time: String,
}

impl Comment {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            post_id: row.get(1)?,
            user_id: uuid_column(row, 2)?,
            content: row.get(3)?,
            date_time: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub last_page: u64,
}

impl PageMeta {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            last_page: last_page(total, limit),
        }
    }
}

/// Number of pages needed for `total` items, counting a partial last page
pub fn last_page(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    pub data: Vec<PostWithAuthor>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub data: PostWithAuthor,
}

#[derive(Debug, Serialize)]
pub struct PostCreated {
    pub message: String,
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub message: String,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_counts_partial_pages() {
        assert_eq!(last_page(0, PAGE_SIZE), 0);
        assert_eq!(last_page(1, PAGE_SIZE), 1);
        assert_eq!(last_page(5, PAGE_SIZE), 1);
        assert_eq!(last_page(6, PAGE_SIZE), 2);
        assert_eq!(last_page(11, PAGE_SIZE), 3);
        assert_eq!(last_page(10, 0), 0);
    }

    #[test]
    fn test_post_with_author_flattens() {
        let user_id = Uuid::new_v4();
        let item = PostWithAuthor {
            post: Post {
                id: 7,
                title: "Hello".to_string(),
                desc: "World".to_string(),
                image: String::new(),
                user_id,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            },
            user: User {
                id: user_id,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: String::new(),
                created_at: "2025-01-01T00:00:00Z".to_string(),
            },
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["desc"], "World");
        assert_eq!(json["user"]["email"], "ada@example.com");
    }

    #[test]
    fn test_post_update_is_partial() {
        let update: PostUpdate = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert!(update.desc.is_none());
        assert!(update.image.is_none());
    }
}
