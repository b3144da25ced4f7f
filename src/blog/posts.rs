//! Post Storage
//! Mission: Create, page through, update and delete blog posts

use crate::auth::models::User;
use crate::blog::models::{NewPost, Post, PostUpdate, PostWithAuthor};
use crate::db::Database;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const POST_WITH_AUTHOR: &str = "
    SELECT p.id, p.title, p.description, p.image, p.user_id, p.created_at,
           u.id, u.first_name, u.last_name, u.email, u.phone, u.created_at
    FROM posts p
    JOIN users u ON u.id = p.user_id";

fn post_with_author(row: &Row<'_>) -> rusqlite::Result<PostWithAuthor> {
    Ok(PostWithAuthor {
        post: Post::from_row(row, 0)?,
        user: User::from_row(row, 6)?,
    })
}

pub struct PostStore {
    db: Database,
}

impl PostStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, new_post: &NewPost) -> Result<Post> {
        let conn = self.db.lock().await;
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO posts (title, description, image, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_post.title,
                new_post.desc,
                new_post.image,
                user_id.to_string(),
                created_at,
            ],
        )
        .context("Failed to insert post")?;

        let post = Post {
            id: conn.last_insert_rowid(),
            title: new_post.title.clone(),
            desc: new_post.desc.clone(),
            image: new_post.image.clone(),
            user_id,
            created_at,
        };

        info!(post_id = post.id, user_id = %user_id, "created post");
        Ok(post)
    }

    /// One page of posts (1-based) plus the total post count
    pub async fn list_page(&self, page: u64, limit: u64) -> Result<(Vec<PostWithAuthor>, u64)> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let conn = self.db.lock().await;

        let mut stmt = conn.prepare_cached(&format!(
            "{POST_WITH_AUTHOR} ORDER BY p.id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let posts = stmt
            .query_map(
                params![
                    i64::try_from(limit).unwrap_or(i64::MAX),
                    i64::try_from(offset).unwrap_or(i64::MAX)
                ],
                post_with_author,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;

        Ok((posts, total.max(0) as u64))
    }

    pub async fn get(&self, id: i64) -> Result<Option<PostWithAuthor>> {
        let conn = self.db.lock().await;
        let post = conn
            .query_row(
                &format!("{POST_WITH_AUTHOR} WHERE p.id = ?1"),
                params![id],
                post_with_author,
            )
            .optional()?;
        Ok(post)
    }

    /// Posts written by `user_id`, oldest first
    pub async fn by_author(&self, user_id: Uuid) -> Result<Vec<PostWithAuthor>> {
        let conn = self.db.lock().await;
        let mut stmt =
            conn.prepare_cached(&format!("{POST_WITH_AUTHOR} WHERE p.user_id = ?1 ORDER BY p.id ASC"))?;
        let posts = stmt
            .query_map(params![user_id.to_string()], post_with_author)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Posts by any of `authors`, newest first
    pub async fn by_authors(&self, authors: &[Uuid]) -> Result<Vec<PostWithAuthor>> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; authors.len()].join(", ");
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare(&format!(
            "{POST_WITH_AUTHOR} WHERE p.user_id IN ({placeholders}) ORDER BY p.id DESC"
        ))?;
        let posts = stmt
            .query_map(
                params_from_iter(authors.iter().map(Uuid::to_string)),
                post_with_author,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Apply a partial update; returns false when the post does not exist
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<bool> {
        let conn = self.db.lock().await;
        let rows = conn.execute(
            "UPDATE posts SET
                title = COALESCE(?2, title),
                description = COALESCE(?3, description),
                image = COALESCE(?4, image)
             WHERE id = ?1",
            params![id, update.title, update.desc, update.image],
        )?;

        if rows > 0 {
            info!(post_id = id, "updated post");
        }
        Ok(rows > 0)
    }

    /// Delete a post and, by cascade, its comments
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.lock().await;
        let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;

        if rows > 0 {
            info!(post_id = id, "deleted post");
        }
        Ok(rows > 0)
    }
}
