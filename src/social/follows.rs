//! Follow Graph Storage
//! Mission: Directed follower -> followed edges between users

use crate::db::{is_unique_violation, Database};
use anyhow::Result;
use rusqlite::params;
use tracing::info;
use uuid::Uuid;

pub struct FollowStore {
    db: Database,
}

impl FollowStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let conn = self.db.lock().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?1 AND followed_user_id = ?2",
            params![follower_id.to_string(), followed_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Add an edge; returns false if it already existed
    pub async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let conn = self.db.lock().await;
        let inserted = conn.execute(
            "INSERT INTO follows (follower_id, followed_user_id) VALUES (?1, ?2)",
            params![follower_id.to_string(), followed_id.to_string()],
        );

        match inserted {
            Ok(_) => {
                info!(follower = %follower_id, followed = %followed_id, "followed user");
                Ok(true)
            }
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an edge; returns false if there was none
    pub async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let conn = self.db.lock().await;
        let rows = conn.execute(
            "DELETE FROM follows WHERE follower_id = ?1 AND followed_user_id = ?2",
            params![follower_id.to_string(), followed_id.to_string()],
        )?;

        if rows > 0 {
            info!(follower = %follower_id, followed = %followed_id, "unfollowed user");
        }
        Ok(rows > 0)
    }

    /// IDs of the users `follower_id` follows
    pub async fn following(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare_cached(
            "SELECT followed_user_id FROM follows WHERE follower_id = ?1 ORDER BY id ASC",
        )?;
        let ids = stmt
            .query_map(params![follower_id.to_string()], |row| {
                crate::db::uuid_column(row, 0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}
