use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Per-user ledger aggregates joined with quiz score. Users without any
/// ownership still appear (zero holdings).
#[derive(Debug, Clone, FromRow)]
pub struct UserStanding {
    pub email: String,
    pub name: String,
    pub quiz_score: i64,
    pub last_unique_card_received_at: Option<OffsetDateTime>,
    pub total_quantity: i64,
    pub unique_cards: i64,
}

pub async fn standings(db: &PgPool) -> sqlx::Result<Vec<UserStanding>> {
    sqlx::query_as::<_, UserStanding>(
        r#"
        SELECT u.email, u.name, u.quiz_score, u.last_unique_card_received_at,
               COALESCE(SUM(o.quantity), 0)::BIGINT AS total_quantity,
               COUNT(o.id)::BIGINT AS unique_cards
        FROM users u
        LEFT JOIN ownerships o ON o.user_id = u.id
        GROUP BY u.id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn catalog_size(db: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM cards"#)
        .fetch_one(db)
        .await
}
