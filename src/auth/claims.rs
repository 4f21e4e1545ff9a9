use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable identity key (email-equivalent).
    pub unique_name: String,
    /// Display name.
    pub name: String,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
