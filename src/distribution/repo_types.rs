use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Audit log entry for one bulk distribution. Written once, never touched
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Distribution {
    pub id: Uuid,
    pub admin_user_id: Uuid,
    /// Total copies granted across all receivers.
    pub quantity: i32,
    /// Receiver-set descriptor: `all`, `self:<email>`, or a comma-separated
    /// email list.
    pub receivers: String,
    pub created_at: OffsetDateTime,
}
