use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::User;

const USER_COLUMNS: &str = "id, email, name, is_admin, quiz_score, \
     last_unique_card_received_at, last_login_at, created_at";

/// Create the user on first authenticated request, refresh login bookkeeping
/// afterwards. The admin flag mirrors the configured admin list.
pub async fn upsert_on_login(
    db: &PgPool,
    email: &str,
    name: &str,
    is_admin: bool,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, name, is_admin, last_login_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (email)
        DO UPDATE SET name = EXCLUDED.name,
                      is_admin = EXCLUDED.is_admin,
                      last_login_at = now()
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(name)
    .bind(is_admin)
    .fetch_one(db)
    .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"SELECT {USER_COLUMNS} FROM users WHERE email = $1"#
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"SELECT {USER_COLUMNS} FROM users ORDER BY email"#
    ))
    .fetch_all(db)
    .await
}

/// Add `delta` to the user's cumulative quiz score, returning the new total.
pub async fn apply_score_delta(
    conn: &mut PgConnection,
    user_id: Uuid,
    delta: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"UPDATE users SET quiz_score = quiz_score + $2 WHERE id = $1 RETURNING quiz_score"#,
    )
    .bind(user_id)
    .bind(delta)
    .fetch_one(conn)
    .await
}

/// Record the moment a user first acquired a card they did not hold before.
pub async fn mark_unique_acquisition(
    conn: &mut PgConnection,
    user_id: Uuid,
    at: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query(r#"UPDATE users SET last_unique_card_received_at = $2 WHERE id = $1"#)
        .bind(user_id)
        .bind(at)
        .execute(conn)
        .await?;
    Ok(())
}
