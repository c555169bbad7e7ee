//! Notebook storage. Every query is scoped by owner.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct NotebookStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
}

/// Title given to the notebook created on registration.
pub const DEFAULT_NOTEBOOK_TITLE: &str = "My Notebook";

impl NotebookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, title: &str) -> Result<Notebook, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO notebooks (id, user_id, title) VALUES (?, ?, ?)
             RETURNING id, user_id, title, created_at",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
    }

    /// Create the notebook every new account starts with.
    pub async fn create_default(&self, user_id: &str) -> Result<Notebook, sqlx::Error> {
        self.create(user_id, DEFAULT_NOTEBOOK_TITLE).await
    }

    /// Get a notebook only if it belongs to the given user.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> Result<Option<Notebook>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, title, created_at FROM notebooks WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a user's notebooks, oldest first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Notebook>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, title, created_at FROM notebooks WHERE user_id = ?
             ORDER BY created_at ASC, rowid ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
