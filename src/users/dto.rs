use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Profile returned by `GET /me`.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub quiz_score: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
}

impl From<crate::users::repo_types::User> for UserProfile {
    fn from(u: crate::users::repo_types::User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            is_admin: u.is_admin,
            quiz_score: u.quiz_score,
            last_login_at: u.last_login_at,
        }
    }
}
