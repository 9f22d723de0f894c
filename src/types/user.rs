use serde::{Deserialize, Serialize};
use std::fmt;

/// What a signed-in user may see.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator of the dashboard.
    Admin,

    /// Any other account.
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

/// A user record returned by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned id.
    pub id: String,

    /// The email the user signed in with.
    pub email: String,

    /// The user's role.
    pub role: Role,
}

/// Outcome of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUp {
    /// The newly created account.
    pub user: User,

    /// When true, the account must be confirmed before it can sign in and no
    /// session was started.
    pub confirmation_required: bool,
}
