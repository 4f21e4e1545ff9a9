//! Row-level queries for the ownership ledger. Every mutating caller runs
//! inside a transaction and takes the row lock first, so read-modify-write
//! on one (user, card) pair is serialized.

use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::repo_types::Ownership;

const OWNERSHIP_COLUMNS: &str =
    "id, user_id, card_id, quantity, otp_value, otp_valid_to, last_received_at";

/// Lock and fetch the ledger row for (user, card), if it exists.
pub async fn lock(
    conn: &mut PgConnection,
    user_id: Uuid,
    card_id: Uuid,
) -> sqlx::Result<Option<Ownership>> {
    sqlx::query_as::<_, Ownership>(&format!(
        r#"
        SELECT {OWNERSHIP_COLUMNS}
        FROM ownerships
        WHERE user_id = $1 AND card_id = $2
        FOR UPDATE
        "#
    ))
    .bind(user_id)
    .bind(card_id)
    .fetch_optional(conn)
    .await
}

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    card_id: Uuid,
    quantity: i32,
    received_at: OffsetDateTime,
) -> sqlx::Result<Ownership> {
    sqlx::query_as::<_, Ownership>(&format!(
        r#"
        INSERT INTO ownerships (user_id, card_id, quantity, last_received_at)
        VALUES ($1, $2, $3, $4)
        RETURNING {OWNERSHIP_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(card_id)
    .bind(quantity)
    .bind(received_at)
    .fetch_one(conn)
    .await
}

pub async fn add_quantity(
    conn: &mut PgConnection,
    id: Uuid,
    quantity: i32,
    received_at: OffsetDateTime,
) -> sqlx::Result<Ownership> {
    sqlx::query_as::<_, Ownership>(&format!(
        r#"
        UPDATE ownerships
        SET quantity = quantity + $2, last_received_at = $3
        WHERE id = $1
        RETURNING {OWNERSHIP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(quantity)
    .bind(received_at)
    .fetch_one(conn)
    .await
}

pub async fn decrement_quantity(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Ownership> {
    sqlx::query_as::<_, Ownership>(&format!(
        r#"
        UPDATE ownerships
        SET quantity = quantity - 1
        WHERE id = $1
        RETURNING {OWNERSHIP_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<()> {
    sqlx::query(r#"DELETE FROM ownerships WHERE id = $1"#)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Overwrite any previous code; there is never more than one live code per row.
pub async fn set_code(
    conn: &mut PgConnection,
    id: Uuid,
    code: &str,
    valid_to: OffsetDateTime,
) -> sqlx::Result<Ownership> {
    sqlx::query_as::<_, Ownership>(&format!(
        r#"
        UPDATE ownerships
        SET otp_value = $2, otp_valid_to = $3
        WHERE id = $1
        RETURNING {OWNERSHIP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(code)
    .bind(valid_to)
    .fetch_one(conn)
    .await
}

pub async fn clear_code(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<()> {
    sqlx::query(r#"UPDATE ownerships SET otp_value = NULL, otp_valid_to = NULL WHERE id = $1"#)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
