//! Note storage. Every query is scoped by owner.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct NoteStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub notebook_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

const NOTE_COLUMNS: &str = "id, notebook_id, user_id, content, created_at";

impl NoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a note. The caller must already have checked that `notebook_id` is owned by `user_id`.
    pub async fn create(
        &self,
        user_id: &str,
        notebook_id: &str,
        content: &str,
    ) -> Result<Note, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO notes (id, notebook_id, user_id, content) VALUES (?, ?, ?, ?)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(notebook_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a note only if it belongs to the given user.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> Result<Option<Note>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a user's notes, newest first, optionally limited to one notebook.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        notebook_id: Option<&str>,
    ) -> Result<Vec<Note>, sqlx::Error> {
        match notebook_id {
            Some(notebook_id) => {
                sqlx::query_as(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? AND notebook_id = ?
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(user_id)
                .bind(notebook_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Update an owned note. `None` leaves the content unchanged.
    /// Returns `None` if no note with this id belongs to the user.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        content: Option<&str>,
    ) -> Result<Option<Note>, sqlx::Error> {
        sqlx::query_as(&format!(
            "UPDATE notes SET content = COALESCE(?, content) WHERE id = ? AND user_id = ?
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(content)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
