use sqlx::PgConnection;
use uuid::Uuid;

use crate::distribution::repo_types::Distribution;

pub async fn insert(
    conn: &mut PgConnection,
    admin_user_id: Uuid,
    quantity: i32,
    receivers: &str,
) -> sqlx::Result<Distribution> {
    sqlx::query_as::<_, Distribution>(
        r#"
        INSERT INTO distributions (admin_user_id, quantity, receivers)
        VALUES ($1, $2, $3)
        RETURNING id, admin_user_id, quantity, receivers, created_at
        "#,
    )
    .bind(admin_user_id)
    .bind(quantity)
    .bind(receivers)
    .fetch_one(conn)
    .await
}
