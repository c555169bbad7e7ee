use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// A stored user. `password_hash` never leaves the server; use [`PublicUser`] in responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub created_at: String,
}

/// User as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

const USER_COLUMNS: &str = "id, email, password_hash, display_name, created_at";

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user. Fails with `EmailTaken` if the email is already registered,
    /// whether caught by the lookup or by the UNIQUE constraint on a concurrent insert.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<User, CreateUserError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(CreateUserError::EmailTaken);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, display_name) VALUES (?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CreateUserError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email (exact match).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Get a user by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
