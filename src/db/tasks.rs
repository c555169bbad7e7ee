//! Study planner task storage. Every query is scoped by owner.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;

/// Status given to tasks created without one.
pub const DEFAULT_TASK_STATUS: &str = "todo";

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Normalized UTC timestamp, see `api::tasks::parse_due_date`.
    pub due_date: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Fields to change on a task. `None` means "leave as is";
/// `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub due_date: Option<Option<String>>,
    pub status: Option<String>,
}

const TASK_COLUMNS: &str = "id, user_id, title, due_date, status, created_at";

/// Status, then due date (undated last), then creation.
const TASK_ORDER: &str =
    "ORDER BY status ASC, due_date IS NULL, due_date ASC, created_at ASC, rowid ASC";

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        title: &str,
        due_date: Option<&str>,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO tasks (id, user_id, title, due_date) VALUES (?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(title)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a task only if it belongs to the given user.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a user's tasks. With `due_until`, only tasks due at or before that
    /// instant are returned; undated tasks are left out.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        due_until: Option<&str>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        match due_until {
            Some(until) => {
                sqlx::query_as(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE user_id = ? AND due_date IS NOT NULL AND due_date <= ?
                     {TASK_ORDER}"
                ))
                .bind(user_id)
                .bind(until)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? {TASK_ORDER}"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Apply `update` to an owned task. Returns `None` if no such task belongs to the user.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, sqlx::Error> {
        let (set_due, due_date) = match &update.due_date {
            Some(value) => (true, value.as_deref()),
            None => (false, None),
        };

        sqlx::query_as(&format!(
            "UPDATE tasks SET
                title = COALESCE(?, title),
                status = COALESCE(?, status),
                due_date = CASE WHEN ? THEN ? ELSE due_date END
             WHERE id = ? AND user_id = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(update.title.as_deref())
        .bind(update.status.as_deref())
        .bind(set_due)
        .bind(due_date)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an owned task. Returns false if nothing matched.
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
