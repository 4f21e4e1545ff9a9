use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cards::attributes::format_date;
use crate::cards::repo_types::Card;
use crate::storage::{StorageClient, CARD_IMAGES, CARD_THUMBNAILS};

const IMAGE_URL_TTL_SECS: u64 = 60 * 60;

/// Card as rendered to clients: attribute values plus presigned portrait
/// URLs instead of the raw blob key.
#[derive(Debug, Serialize)]
pub struct CardView {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub job: Option<String>,
    pub start_date: Option<String>,
    pub wish_destination: Option<String>,
    pub wish_person: Option<String>,
    pub wish_skill: Option<String>,
    pub best_advice: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl CardView {
    pub async fn render(card: &Card, storage: &dyn StorageClient) -> anyhow::Result<Self> {
        let (image_url, thumbnail_url) = match &card.image_key {
            Some(key) => (
                Some(storage.signed_url(CARD_IMAGES, key, IMAGE_URL_TTL_SECS).await?),
                Some(
                    storage
                        .signed_url(CARD_THUMBNAILS, key, IMAGE_URL_TTL_SECS)
                        .await?,
                ),
            ),
            None => (None, None),
        };
        Ok(Self {
            id: card.id,
            name: card.name.clone(),
            acronym: card.acronym.clone(),
            job: card.job.clone(),
            start_date: card.start_date.map(format_date),
            wish_destination: card.wish_destination.clone(),
            wish_person: card.wish_person.clone(),
            wish_skill: card.wish_skill.clone(),
            best_advice: card.best_advice.clone(),
            image_url,
            thumbnail_url,
        })
    }
}

/// Entry in the caller's collection listing.
#[derive(Debug, Serialize)]
pub struct OwnedCard {
    #[serde(flatten)]
    pub card: CardView,
    pub quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_received_at: OffsetDateTime,
}
