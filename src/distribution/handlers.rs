use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::rng;
use crate::state::AppState;

use super::dto::{DistributeRequest, DistributeResponse, SelfDistributeRequest};
use super::services;

pub fn distribute_routes() -> Router<AppState> {
    Router::new()
        .route("/distribute", post(distribute))
        .route("/distribute/self", post(distribute_self))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn distribute(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<DistributeRequest>,
) -> Result<Json<DistributeResponse>, ApiError> {
    let mut rng = rng::from_entropy();
    let outcome = services::distribute_random(
        &state.db,
        &admin,
        &payload.receivers,
        payload.quantity,
        &mut rng,
    )
    .await?;
    Ok(Json(DistributeResponse {
        receivers: outcome.receivers,
        quantity_per_receiver: payload.quantity,
        total_granted: outcome.total_granted,
    }))
}

#[instrument(skip_all, fields(admin_id = %admin.id, email = %payload.email))]
pub async fn distribute_self(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<SelfDistributeRequest>,
) -> Result<Json<DistributeResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let outcome =
        services::distribute_self_card(&state.db, &admin, &email, payload.quantity).await?;
    Ok(Json(DistributeResponse {
        receivers: outcome.receivers,
        quantity_per_receiver: payload.quantity,
        total_granted: outcome.total_granted,
    }))
}
