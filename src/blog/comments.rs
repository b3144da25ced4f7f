//! Comment Storage
//! Mission: Flat comment lists attached to a single post

use crate::blog::models::Comment;
use crate::db::Database;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::info;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, date_time";

pub struct CommentStore {
    db: Database,
}

impl CommentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, post_id: i64, user_id: Uuid, content: &str) -> Result<Comment> {
        let conn = self.db.lock().await;
        let date_time = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO comments (post_id, user_id, content, date_time) VALUES (?1, ?2, ?3, ?4)",
            params![post_id, user_id.to_string(), content, date_time],
        )
        .context("Failed to insert comment")?;

        let comment = Comment {
            id: conn.last_insert_rowid(),
            post_id,
            user_id,
            content: content.to_string(),
            date_time,
        };

        info!(comment_id = comment.id, post_id, "created comment");
        Ok(comment)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.db.lock().await;
        let comment = conn
            .query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                params![id],
                Comment::from_row,
            )
            .optional()?;
        Ok(comment)
    }

    /// Comments on a post in the order they were written
    pub async fn for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 ORDER BY id ASC"
        ))?;
        let comments = stmt
            .query_map(params![post_id], Comment::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Replace a comment's content, returning the updated comment
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Option<Comment>> {
        let conn = self.db.lock().await;
        let rows = conn.execute(
            "UPDATE comments SET content = ?2 WHERE id = ?1",
            params![id, content],
        )?;
        if rows == 0 {
            return Ok(None);
        }

        let comment = conn.query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
            params![id],
            Comment::from_row,
        )?;

        info!(comment_id = id, "updated comment");
        Ok(Some(comment))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.lock().await;
        let rows = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;

        if rows > 0 {
            info!(comment_id = id, "deleted comment");
        }
        Ok(rows > 0)
    }
}
