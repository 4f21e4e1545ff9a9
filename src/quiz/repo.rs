use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cards::attributes::Attribute;
use crate::quiz::repo_types::Quiz;

const QUIZ_COLUMNS: &str = "id, user_id, question_type, answer_type, correct_card_id, \
     option_count, asked_at, answered_at, answered_correctly";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    question_type: Attribute,
    answer_type: Attribute,
    correct_card_id: Uuid,
    option_count: i32,
) -> sqlx::Result<Quiz> {
    sqlx::query_as::<_, Quiz>(&format!(
        r#"
        INSERT INTO quizzes (user_id, question_type, answer_type, correct_card_id, option_count)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(question_type)
    .bind(answer_type)
    .bind(correct_card_id)
    .bind(option_count)
    .fetch_one(db)
    .await
}

/// Lock the quiz row for the answer transaction; double submissions
/// serialize here.
pub async fn lock(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(&format!(
        r#"SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1 FOR UPDATE"#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn mark_answered(
    conn: &mut PgConnection,
    id: Uuid,
    correct: bool,
    at: OffsetDateTime,
) -> sqlx::Result<Quiz> {
    sqlx::query_as::<_, Quiz>(&format!(
        r#"
        UPDATE quizzes
        SET answered_correctly = $2, answered_at = $3
        WHERE id = $1
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(correct)
    .bind(at)
    .fetch_one(conn)
    .await
}
