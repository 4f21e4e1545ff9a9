use std::cmp::Ordering;

use crate::overview::repo::UserStanding;

#[derive(Debug, Clone)]
pub struct RankedCollector {
    pub rank: usize,
    pub email: String,
    pub name: String,
    pub unique_cards: i64,
    pub total_cards: i64,
    pub duplicates: i64,
    pub last_unique_card_received_at: Option<time::OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct RankedScorer {
    pub rank: usize,
    pub email: String,
    pub name: String,
    pub quiz_score: i64,
}

/// Collection leaderboard: unique cards descending, earliest last-unique
/// acquisition first on ties (users who reached the count earlier rank
/// higher; missing timestamps sort last), then identity key. Ranks are
/// sequential even on equal sort keys.
pub fn rank_by_collection(mut standings: Vec<UserStanding>) -> Vec<RankedCollector> {
    standings.sort_by(|a, b| {
        b.unique_cards
            .cmp(&a.unique_cards)
            .then_with(|| {
                cmp_nulls_last(
                    a.last_unique_card_received_at,
                    b.last_unique_card_received_at,
                )
            })
            .then_with(|| a.email.cmp(&b.email))
    });
    standings
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedCollector {
            rank: i + 1,
            email: s.email,
            name: s.name,
            unique_cards: s.unique_cards,
            total_cards: s.total_quantity,
            duplicates: s.total_quantity - s.unique_cards,
            last_unique_card_received_at: s.last_unique_card_received_at,
        })
        .collect()
}

/// Quiz leaderboard: score descending, identity key on ties.
pub fn rank_by_score(mut standings: Vec<UserStanding>) -> Vec<RankedScorer> {
    standings.sort_by(|a, b| {
        b.quiz_score
            .cmp(&a.quiz_score)
            .then_with(|| a.email.cmp(&b.email))
    });
    standings
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedScorer {
            rank: i + 1,
            email: s.email,
            name: s.name,
            quiz_score: s.quiz_score,
        })
        .collect()
}

fn cmp_nulls_last(
    a: Option<time::OffsetDateTime>,
    b: Option<time::OffsetDateTime>,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
