use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::auth::jwt::JwtVerifier;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users;
use crate::users::repo_types::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// The authenticated caller. The user row is created on first successful
/// authentication and `last_login_at` is refreshed on every request.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("invalid auth scheme".into()))?;

        let verifier = JwtVerifier::from_ref(state);
        let claims = verifier.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("invalid or expired token".into())
        })?;

        let email = claims.unique_name.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::Unauthorized("token identity is not an email".into()));
        }

        let is_admin = state.config.is_admin_email(&email);
        let user = users::repo::upsert_on_login(&state.db, &email, &claims.name, is_admin)
            .await
            .map_err(ApiError::Persistence)?;

        Ok(CurrentUser(user))
    }
}

/// An authenticated caller holding the admin flag. Distribution endpoints
/// reject everyone else with `Forbidden`.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            warn!(user_id = %user.id, email = %user.email, "non-admin called admin endpoint");
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
