use rand::Rng;
use sqlx::{PgConnection, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::ownership::repo;
use crate::ownership::repo_types::Ownership;
use crate::users;
use crate::users::repo_types::User;

pub const CODE_LEN: usize = 16;
pub const CODE_VALIDITY: Duration = Duration::minutes(5);
const CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Grant `qty` copies of a card to a user inside the caller's transaction.
///
/// A fresh row marks the user's "last unique card" event; an existing row
/// only accumulates quantity and refreshes `last_received_at`.
pub async fn grant_card(
    conn: &mut PgConnection,
    user_id: Uuid,
    card_id: Uuid,
    qty: i32,
) -> Result<Ownership, ApiError> {
    let now = OffsetDateTime::now_utc();
    match repo::lock(conn, user_id, card_id).await? {
        Some(existing) => Ok(repo::add_quantity(conn, existing.id, qty, now).await?),
        None => {
            let created = repo::insert(conn, user_id, card_id, qty, now).await?;
            users::repo::mark_unique_acquisition(conn, user_id, now).await?;
            Ok(created)
        }
    }
}

/// Take one copy back. Returns `None` when the holding reached zero and the
/// row was deleted.
pub async fn revoke_one_card(
    conn: &mut PgConnection,
    user_id: Uuid,
    card_id: Uuid,
) -> Result<Option<Ownership>, ApiError> {
    let row = repo::lock(conn, user_id, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("ownership not found".into()))?;
    if row.quantity > 1 {
        Ok(Some(repo::decrement_quantity(conn, row.id).await?))
    } else {
        repo::delete(conn, row.id).await?;
        Ok(None)
    }
}

pub fn generate_code(rng: &mut impl Rng) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Issue (or overwrite) the transfer code on the caller's ledger row.
pub async fn issue_code(
    db: &PgPool,
    owner: &User,
    card_id: Uuid,
    rng: &mut impl Rng,
) -> Result<(String, OffsetDateTime), ApiError> {
    let mut tx = db.begin().await?;
    let row = repo::lock(&mut tx, owner.id, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("you do not own this card".into()))?;
    let code = generate_code(rng);
    let valid_to = OffsetDateTime::now_utc() + CODE_VALIDITY;
    repo::set_code(&mut tx, row.id, &code, valid_to).await?;
    tx.commit().await?;
    info!(user_id = %owner.id, %card_id, "transfer code issued");
    Ok((code, valid_to))
}

/// Check a submitted code against the giver's ledger row. Order matters:
/// a matching but stale code must surface as `Expired`, not `InvalidCode`.
fn validate_code(
    ownership: &Ownership,
    code: &str,
    receiver_id: Uuid,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    match ownership.otp_value.as_deref() {
        Some(v) if v == code => {}
        _ => return Err(ApiError::InvalidCode),
    }
    match ownership.otp_valid_to {
        Some(valid_to) if now <= valid_to => {}
        _ => return Err(ApiError::Expired),
    }
    if receiver_id == ownership.user_id {
        return Err(ApiError::SelfTransfer);
    }
    Ok(())
}

pub struct TransferOutcome {
    /// The giver's remaining holding; `None` when their last copy moved.
    pub giver: Option<Ownership>,
    pub receiver: Ownership,
}

/// Move one copy from the giver to the receiver, gated by the code.
///
/// Runs as one transaction holding the giver's row lock throughout, so two
/// transfers racing on the same code serialize and the loser fails the code
/// check. The code is cleared before the move (single use), the receiver is
/// granted before the giver is revoked so the total copy count never dips.
pub async fn execute_transfer(
    db: &PgPool,
    receiver: &User,
    giver_email: &str,
    card_id: Uuid,
    code: &str,
) -> Result<TransferOutcome, ApiError> {
    let giver = users::repo::find_by_email(db, giver_email)
        .await?
        .ok_or_else(|| ApiError::NotFound("giver not found".into()))?;

    let mut tx = db.begin().await?;

    let ownership = repo::lock(&mut tx, giver.id, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("giver does not own this card".into()))?;

    validate_code(&ownership, code, receiver.id, OffsetDateTime::now_utc())?;

    repo::clear_code(&mut tx, ownership.id).await?;
    let receiver_row = grant_card(&mut tx, receiver.id, card_id, 1).await?;
    let giver_row = revoke_one_card(&mut tx, giver.id, card_id).await?;

    tx.commit().await?;
    info!(
        giver_id = %giver.id,
        receiver_id = %receiver.id,
        %card_id,
        "card transferred"
    );
    Ok(TransferOutcome {
        giver: giver_row,
        receiver: receiver_row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    fn ownership(code: Option<&str>, valid_to: Option<OffsetDateTime>) -> Ownership {
        Ownership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_id: Uuid::new_v4(),
            quantity: 2,
            otp_value: code.map(String::from),
            otp_valid_to: valid_to,
            last_received_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[test]
    fn code_is_sixteen_lowercase_alphanumerics() {
        let mut rng = rng::seeded(7);
        for _ in 0..50 {
            let code = generate_code(&mut rng);
            assert_eq!(code.len(), CODE_LEN);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_differ_between_draws() {
        let mut rng = rng::seeded(7);
        let a = generate_code(&mut rng);
        let b = generate_code(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn mismatched_code_is_invalid_even_when_stale() {
        let own = ownership(Some("aaaaaaaaaaaaaaaa"), Some(now() - Duration::hours(1)));
        let err = validate_code(&own, "bbbbbbbbbbbbbbbb", Uuid::new_v4(), now()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCode));
    }

    #[test]
    fn missing_code_is_invalid() {
        let own = ownership(None, None);
        let err = validate_code(&own, "whatever12345678", Uuid::new_v4(), now()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCode));
    }

    #[test]
    fn matching_but_stale_code_is_expired_not_invalid() {
        let own = ownership(Some("aaaaaaaaaaaaaaaa"), Some(now() - Duration::seconds(1)));
        let err = validate_code(&own, "aaaaaaaaaaaaaaaa", Uuid::new_v4(), now()).unwrap_err();
        assert!(matches!(err, ApiError::Expired));
    }

    #[test]
    fn giver_cannot_transfer_to_themselves() {
        let own = ownership(Some("aaaaaaaaaaaaaaaa"), Some(now() + CODE_VALIDITY));
        let err = validate_code(&own, "aaaaaaaaaaaaaaaa", own.user_id, now()).unwrap_err();
        assert!(matches!(err, ApiError::SelfTransfer));
    }

    #[test]
    fn fresh_matching_code_for_another_user_passes() {
        let own = ownership(Some("aaaaaaaaaaaaaaaa"), Some(now() + CODE_VALIDITY));
        assert!(validate_code(&own, "aaaaaaaaaaaaaaaa", Uuid::new_v4(), now()).is_ok());
    }

    #[test]
    fn validity_boundary_is_inclusive() {
        let t = now();
        let own = ownership(Some("aaaaaaaaaaaaaaaa"), Some(t));
        assert!(validate_code(&own, "aaaaaaaaaaaaaaaa", Uuid::new_v4(), t).is_ok());
    }
}
