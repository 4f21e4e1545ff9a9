use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CardView, OwnedCard};
use super::repo;

pub fn card_routes() -> Router<AppState> {
    Router::new().route("/cards", get(list_my_cards))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_my_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OwnedCard>>, ApiError> {
    let rows = repo::list_collection(&state.db, user.id).await?;
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let card = CardView::render(&row.card, state.storage.as_ref()).await?;
        items.push(OwnedCard {
            card,
            quantity: row.quantity,
            last_received_at: row.last_received_at,
        });
    }
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::repo_types::Card;
    use crate::state::AppState;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[tokio::test]
    async fn rendering_presigns_the_portrait() {
        let state = AppState::fake();
        let card = Card {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            acronym: "ADA".into(),
            job: None,
            start_date: None,
            wish_destination: None,
            wish_person: None,
            wish_skill: None,
            best_advice: None,
            image_key: Some("ada.png".into()),
            owner_email: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let view = CardView::render(&card, state.storage.as_ref()).await.unwrap();
        let url = view.image_url.unwrap();
        assert!(url.contains("card-high-res-images/ada.png"));
        let thumb = view.thumbnail_url.unwrap();
        assert!(thumb.contains("card-thumbnails/ada.png"));
    }

    #[tokio::test]
    async fn rendering_without_image_yields_no_url() {
        let state = AppState::fake();
        let card = Card {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            acronym: "ADA".into(),
            job: None,
            start_date: None,
            wish_destination: None,
            wish_person: None,
            wish_skill: None,
            best_advice: None,
            image_key: None,
            owner_email: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let view = CardView::render(&card, state.storage.as_ref()).await.unwrap();
        assert!(view.image_url.is_none());
        assert!(view.thumbnail_url.is_none());
    }
}
