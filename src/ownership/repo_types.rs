use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Ledger row: how many copies of one card one user holds, plus the live
/// transfer code if one has been issued. Rows never exist with quantity 0;
/// the ledger deletes them instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ownership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub quantity: i32,
    #[serde(skip_serializing)]
    pub otp_value: Option<String>,
    pub otp_valid_to: Option<OffsetDateTime>,
    pub last_received_at: OffsetDateTime,
}
