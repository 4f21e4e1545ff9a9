use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::rng;
use crate::state::AppState;

use super::dto::{
    IssueCodeRequest, IssueCodeResponse, TransferRequest, TransferResponse,
};
use super::services;

pub fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/cards/code", post(issue_code))
        .route("/cards/transfer", post(transfer))
}

#[instrument(skip_all, fields(user_id = %user.id, card_id = %payload.card_id))]
pub async fn issue_code(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IssueCodeRequest>,
) -> Result<Json<IssueCodeResponse>, ApiError> {
    let mut rng = rng::from_entropy();
    let (code, valid_to) =
        services::issue_code(&state.db, &user, payload.card_id, &mut rng).await?;
    Ok(Json(IssueCodeResponse { code, valid_to }))
}

#[instrument(skip_all, fields(user_id = %user.id, card_id = %payload.card_id))]
pub async fn transfer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let giver_email = payload.giver_email.trim().to_lowercase();
    let outcome = services::execute_transfer(
        &state.db,
        &user,
        &giver_email,
        payload.card_id,
        &payload.code,
    )
    .await?;
    Ok(Json(TransferResponse {
        giver: outcome.giver.map(Into::into),
        receiver: outcome.receiver.into(),
    }))
}
