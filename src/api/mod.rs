mod error;
mod extract;
mod health;
mod notebooks;
mod notes;
mod tasks;
mod tokens;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::password::PasswordHasher;

pub use error::ApiError;
pub use health::not_found;
pub use tasks::parse_due_date;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, hasher: PasswordHasher) -> Router {
    let users_state = users::UsersState {
        db: db.clone(),
        jwt: jwt.clone(),
        hasher,
    };

    let tokens_state = tokens::TokensState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let notebooks_state = notebooks::NotebooksState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let notes_state = notes::NotesState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let tasks_state = tasks::TasksState { db, jwt };

    let auth_router = users::router(users_state).merge(tokens::router(tokens_state));

    Router::new()
        .merge(health::router())
        .nest("/auth", auth_router)
        .nest("/notebooks", notebooks::router(notebooks_state))
        .nest("/notes", notes::router(notes_state))
        .nest("/tasks", tasks::router(tasks_state))
}
