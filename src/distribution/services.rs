use rand::Rng;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::cards;
use crate::cards::repo_types::Card;
use crate::distribution::dto::ReceiverSet;
use crate::distribution::repo;
use crate::error::ApiError;
use crate::ownership;
use crate::users;
use crate::users::repo_types::User;

/// Draw `qty` card ids independently and uniformly, with replacement.
/// Duplicate draws are intentional; they accumulate quantity on grant.
pub fn pick_cards(catalog: &[Card], qty: i32, rng: &mut impl Rng) -> Vec<Uuid> {
    (0..qty)
        .map(|_| catalog[rng.gen_range(0..catalog.len())].id)
        .collect()
}

fn describe_receivers(set: &ReceiverSet) -> Result<String, ApiError> {
    match set {
        ReceiverSet::Keyword(k) if k == "all" => Ok("all".into()),
        ReceiverSet::Keyword(k) => Err(ApiError::InvalidRequest(format!(
            "unknown receiver keyword: {k}"
        ))),
        ReceiverSet::Emails(emails) if emails.is_empty() => {
            Err(ApiError::InvalidRequest("receiver list is empty".into()))
        }
        ReceiverSet::Emails(emails) => Ok(emails.join(",")),
    }
}

async fn resolve_receivers(db: &PgPool, set: &ReceiverSet) -> Result<Vec<User>, ApiError> {
    match set {
        ReceiverSet::Keyword(_) => Ok(users::repo::list_all(db).await?),
        ReceiverSet::Emails(emails) => {
            let mut receivers = Vec::with_capacity(emails.len());
            for email in emails {
                let email = email.trim().to_lowercase();
                let user = users::repo::find_by_email(db, &email)
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("user not found: {email}")))?;
                receivers.push(user);
            }
            Ok(receivers)
        }
    }
}

pub struct DistributionOutcome {
    pub receivers: usize,
    pub total_granted: i32,
}

/// Grant `qty` random catalog cards to every receiver, audited as a single
/// distribution event.
pub async fn distribute_random(
    db: &PgPool,
    admin: &User,
    receiver_set: &ReceiverSet,
    qty: i32,
    rng: &mut impl Rng,
) -> Result<DistributionOutcome, ApiError> {
    if qty < 1 {
        return Err(ApiError::InvalidRequest("quantity must be at least 1".into()));
    }
    let descriptor = describe_receivers(receiver_set)?;
    let receivers = resolve_receivers(db, receiver_set).await?;
    if receivers.is_empty() {
        return Err(ApiError::NotFound("no receivers found".into()));
    }
    let catalog = cards::repo::list_all(db).await?;
    if catalog.is_empty() {
        return Err(ApiError::NotFound("card catalog is empty".into()));
    }

    let mut tx = db.begin().await?;
    for user in &receivers {
        for card_id in pick_cards(&catalog, qty, rng) {
            ownership::services::grant_card(&mut tx, user.id, card_id, 1).await?;
        }
    }
    let total = qty * receivers.len() as i32;
    repo::insert(&mut tx, admin.id, total, &descriptor).await?;
    tx.commit().await?;

    info!(
        admin_id = %admin.id,
        receivers = receivers.len(),
        total,
        descriptor = %descriptor,
        "random cards distributed"
    );
    Ok(DistributionOutcome {
        receivers: receivers.len(),
        total_granted: total,
    })
}

/// Grant a member `qty` copies of the card portraying them.
pub async fn distribute_self_card(
    db: &PgPool,
    admin: &User,
    email: &str,
    qty: i32,
) -> Result<DistributionOutcome, ApiError> {
    if qty < 1 {
        return Err(ApiError::InvalidRequest("quantity must be at least 1".into()));
    }
    let user = users::repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {email}")))?;
    let card = cards::repo::find_self_card(db, email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no self-card for {email}")))?;

    let mut tx = db.begin().await?;
    ownership::services::grant_card(&mut tx, user.id, card.id, qty).await?;
    repo::insert(&mut tx, admin.id, qty, &format!("self:{email}")).await?;
    tx.commit().await?;

    info!(admin_id = %admin.id, user_id = %user.id, card_id = %card.id, qty, "self-card granted");
    Ok(DistributionOutcome {
        receivers: 1,
        total_granted: qty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use std::collections::HashSet;
    use time::OffsetDateTime;

    fn catalog(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card {
                id: Uuid::new_v4(),
                name: format!("Card {i}"),
                acronym: format!("C{i:02}"),
                job: None,
                start_date: None,
                wish_destination: None,
                wish_person: None,
                wish_skill: None,
                best_advice: None,
                image_key: None,
                owner_email: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn picks_exactly_qty_cards_from_the_catalog() {
        let cards = catalog(10);
        let ids: HashSet<Uuid> = cards.iter().map(|c| c.id).collect();
        let mut rng = rng::seeded(3);
        let picks = pick_cards(&cards, 25, &mut rng);
        assert_eq!(picks.len(), 25);
        assert!(picks.iter().all(|id| ids.contains(id)));
    }

    #[test]
    fn sampling_is_with_replacement() {
        // 25 draws from 10 cards must repeat by pigeonhole.
        let cards = catalog(10);
        let mut rng = rng::seeded(3);
        let picks = pick_cards(&cards, 25, &mut rng);
        let distinct: HashSet<Uuid> = picks.iter().copied().collect();
        assert!(distinct.len() < picks.len());
    }

    #[test]
    fn same_seed_picks_the_same_cards() {
        let cards = catalog(10);
        let a = pick_cards(&cards, 5, &mut rng::seeded(11));
        let b = pick_cards(&cards, 5, &mut rng::seeded(11));
        assert_eq!(a, b);
    }

    #[test]
    fn receiver_descriptor_shapes() {
        assert_eq!(
            describe_receivers(&ReceiverSet::Keyword("all".into())).unwrap(),
            "all"
        );
        assert_eq!(
            describe_receivers(&ReceiverSet::Emails(vec![
                "a@x.com".into(),
                "b@x.com".into()
            ]))
            .unwrap(),
            "a@x.com,b@x.com"
        );
        assert!(matches!(
            describe_receivers(&ReceiverSet::Keyword("everyone".into())),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            describe_receivers(&ReceiverSet::Emails(vec![])),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
