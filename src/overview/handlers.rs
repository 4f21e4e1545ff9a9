use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{OverviewResponse, OverviewTotals};
use super::repo;
use super::services;

pub fn overview_routes() -> Router<AppState> {
    Router::new().route("/overview", get(overview))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OverviewResponse>, ApiError> {
    let standings = repo::standings(&state.db).await?;
    let catalog_size = repo::catalog_size(&state.db).await?;

    let totals = OverviewTotals {
        users: standings.len(),
        catalog_size,
        copies_in_circulation: standings.iter().map(|s| s.total_quantity).sum(),
    };
    let collection_ranking = services::rank_by_collection(standings.clone())
        .into_iter()
        .map(Into::into)
        .collect();
    let quiz_ranking = services::rank_by_score(standings)
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(OverviewResponse {
        collection_ranking,
        quiz_ranking,
        totals,
    }))
}
