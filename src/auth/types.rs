//! Authentication user types.

/// Caller identity taken from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id (`sub` claim). Every owned-row query filters on this.
    pub id: String,
    pub email: String,
}
