use axum::{routing::get, Json, Router};
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::UserProfile;

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(user.into()))
}
