//! Bearer-token authentication for API routes.
//!
//! Access tokens are short-lived (15 min) and verified statelessly on every
//! request. Refresh tokens are exchanged at `/auth/refresh` and are never
//! accepted here.

mod bearer;
mod errors;
mod extractors;
mod state;
mod types;

pub use bearer::{BEARER_PREFIX, get_bearer_token};
pub use errors::ApiAuthError;
pub use extractors::ApiAuth;
pub use state::HasAuthBackend;
pub use types::AuthenticatedUser;
