use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Catalog entry. One card per member plus any seeded specials; attribute
/// columns are nullable because older cards predate some of the fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub job: Option<String>,
    pub start_date: Option<Date>,
    pub wish_destination: Option<String>,
    pub wish_person: Option<String>,
    pub wish_skill: Option<String>,
    pub best_advice: Option<String>,
    /// Stable blob key of the portrait; signed URLs are derived from this,
    /// never stored.
    pub image_key: Option<String>,
    /// Email of the member this card portrays (self-card link).
    pub owner_email: Option<String>,
    pub created_at: OffsetDateTime,
}
