use sqlx::{FromRow, PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cards::attributes::Attribute;
use crate::cards::repo_types::Card;

const CARD_COLUMNS: &str = "id, name, acronym, job, start_date, wish_destination, \
     wish_person, wish_skill, best_advice, image_key, owner_email, created_at";

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Card>> {
    sqlx::query_as::<_, Card>(&format!(
        r#"SELECT {CARD_COLUMNS} FROM cards ORDER BY acronym"#
    ))
    .fetch_all(db)
    .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<Card>> {
    sqlx::query_as::<_, Card>(&format!(
        r#"SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// The card portraying the given member, if they have one.
pub async fn find_self_card(db: &PgPool, owner_email: &str) -> sqlx::Result<Option<Card>> {
    sqlx::query_as::<_, Card>(&format!(
        r#"SELECT {CARD_COLUMNS} FROM cards WHERE owner_email = $1"#
    ))
    .bind(owner_email)
    .fetch_optional(db)
    .await
}

/// Candidate pool for a quiz round: cards where both the question and the
/// answer attribute are present. Column names come from the fixed
/// [`Attribute`] enum, not caller input.
pub async fn with_attributes(
    db: &PgPool,
    question: Attribute,
    answer: Attribute,
) -> sqlx::Result<Vec<Card>> {
    let q = question.column();
    let a = answer.column();
    sqlx::query_as::<_, Card>(&format!(
        r#"SELECT {CARD_COLUMNS} FROM cards WHERE {q} IS NOT NULL AND {a} IS NOT NULL"#
    ))
    .fetch_all(db)
    .await
}

/// A card as held by a user, joined with its ledger row.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedCardRow {
    #[sqlx(flatten)]
    pub card: Card,
    pub quantity: i32,
    pub last_received_at: OffsetDateTime,
}

pub async fn list_collection(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<OwnedCardRow>> {
    sqlx::query_as::<_, OwnedCardRow>(
        r#"
        SELECT c.id, c.name, c.acronym, c.job, c.start_date, c.wish_destination,
               c.wish_person, c.wish_skill, c.best_advice, c.image_key,
               c.owner_email, c.created_at,
               o.quantity, o.last_received_at
        FROM ownerships o
        JOIN cards c ON c.id = o.card_id
        WHERE o.user_id = $1
        ORDER BY o.last_received_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
