mod notebooks;
mod notes;
mod tasks;
mod user;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use notebooks::{Notebook, NotebookStore};
pub use notes::{Note, NoteStore};
pub use tasks::{DEFAULT_TASK_STATUS, Task, TaskStore, TaskUpdate};
pub use user::{CreateUserError, PublicUser, User, UserStore};

/// Column default for `created_at`: UTC with millisecond precision, so text order is time order.
const NOW_MILLIS: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    /// Use ":memory:" for an in-memory database.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the current schema version.
    async fn get_version(&self) -> Result<i32, sqlx::Error> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(result.map(|r| r.0).unwrap_or(0))
    }

    /// Set the schema version within a transaction.
    async fn set_version(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut **tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Run database migrations.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let version = self.get_version().await?;

        if version < 1 {
            self.migrate_v1().await?;
        }

        if version < 2 {
            self.migrate_v2().await?;
        }

        Ok(())
    }

    /// Execute a list of queries in a transaction, then set the version.
    async fn run_migration(&self, version: i32, queries: &[String]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for query in queries {
            sqlx::query(query.as_str()).execute(&mut *tx).await?;
        }
        Self::set_version(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn migrate_v1(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            1,
            &[
                // Users table. Email comparison is case-sensitive.
                format!(
                    "CREATE TABLE users (
                        id TEXT PRIMARY KEY NOT NULL,
                        email TEXT UNIQUE NOT NULL,
                        password_hash TEXT NOT NULL,
                        display_name TEXT NOT NULL,
                        created_at TEXT NOT NULL DEFAULT ({NOW_MILLIS})
                    )"
                ),
                // Notebooks table
                format!(
                    "CREATE TABLE notebooks (
                        id TEXT PRIMARY KEY NOT NULL,
                        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                        title TEXT NOT NULL,
                        created_at TEXT NOT NULL DEFAULT ({NOW_MILLIS})
                    )"
                ),
                "CREATE INDEX idx_notebooks_user_id ON notebooks(user_id, created_at)".into(),
                // Notes table
                format!(
                    "CREATE TABLE notes (
                        id TEXT PRIMARY KEY NOT NULL,
                        notebook_id TEXT NOT NULL REFERENCES notebooks(id) ON DELETE CASCADE,
                        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                        content TEXT NOT NULL,
                        created_at TEXT NOT NULL DEFAULT ({NOW_MILLIS})
                    )"
                ),
                "CREATE INDEX idx_notes_user_id ON notes(user_id, created_at)".into(),
                "CREATE INDEX idx_notes_notebook_id ON notes(notebook_id)".into(),
            ],
        )
        .await
    }

    async fn migrate_v2(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            2,
            &[
                // Study planner tasks. due_date uses the same text format as created_at.
                format!(
                    "CREATE TABLE tasks (
                        id TEXT PRIMARY KEY NOT NULL,
                        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                        title TEXT NOT NULL,
                        due_date TEXT,
                        status TEXT NOT NULL DEFAULT '{DEFAULT_TASK_STATUS}',
                        created_at TEXT NOT NULL DEFAULT ({NOW_MILLIS})
                    )"
                ),
                "CREATE INDEX idx_tasks_user_id ON tasks(user_id)".into(),
                "CREATE INDEX idx_tasks_due_date ON tasks(user_id, due_date)".into(),
            ],
        )
        .await
    }

    /// Get the user store.
    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    /// Get the notebook store.
    pub fn notebooks(&self) -> NotebookStore {
        NotebookStore::new(self.pool.clone())
    }

    /// Get the note store.
    pub fn notes(&self) -> NoteStore {
        NoteStore::new(self.pool.clone())
    }

    /// Get the task store.
    pub fn tasks(&self) -> TaskStore {
        TaskStore::new(self.pool.clone())
    }

    /// Get the underlying connection pool (for tests that need raw SQL access).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections. Used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
