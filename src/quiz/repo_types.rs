use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cards::attributes::Attribute;

/// One posed trivia question. Answered at most once; `answered_correctly`
/// stays NULL until then.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_type: Attribute,
    pub answer_type: Attribute,
    pub correct_card_id: Uuid,
    pub option_count: i32,
    pub asked_at: OffsetDateTime,
    pub answered_at: Option<OffsetDateTime>,
    pub answered_correctly: Option<bool>,
}
