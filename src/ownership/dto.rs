use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::repo_types::Ownership;

/// Request body for `POST /cards/code`.
#[derive(Debug, Deserialize)]
pub struct IssueCodeRequest {
    pub card_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct IssueCodeResponse {
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub valid_to: OffsetDateTime,
}

/// Request body for `POST /cards/transfer`.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub giver_email: String,
    pub card_id: Uuid,
    pub code: String,
}

/// A ledger row as exposed over the API (the live code stays server-side).
#[derive(Debug, Serialize)]
pub struct OwnershipView {
    pub card_id: Uuid,
    pub quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_received_at: OffsetDateTime,
}

impl From<Ownership> for OwnershipView {
    fn from(o: Ownership) -> Self {
        Self {
            card_id: o.card_id,
            quantity: o.quantity,
            last_received_at: o.last_received_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// The giver's remaining holding, absent when their last copy moved.
    pub giver: Option<OwnershipView>,
    pub receiver: OwnershipView,
}
