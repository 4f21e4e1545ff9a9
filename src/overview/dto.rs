use serde::Serialize;
use time::OffsetDateTime;

use crate::overview::services::{RankedCollector, RankedScorer};

#[derive(Debug, Serialize)]
pub struct CollectorEntry {
    pub rank: usize,
    pub email: String,
    pub name: String,
    pub unique_cards: i64,
    pub total_cards: i64,
    pub duplicates: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_unique_card_received_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct ScorerEntry {
    pub rank: usize,
    pub email: String,
    pub name: String,
    pub quiz_score: i64,
}

#[derive(Debug, Serialize)]
pub struct OverviewTotals {
    pub users: usize,
    pub catalog_size: i64,
    pub copies_in_circulation: i64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub collection_ranking: Vec<CollectorEntry>,
    pub quiz_ranking: Vec<ScorerEntry>,
    pub totals: OverviewTotals,
}

impl From<RankedCollector> for CollectorEntry {
    fn from(r: RankedCollector) -> Self {
        Self {
            rank: r.rank,
            email: r.email,
            name: r.name,
            unique_cards: r.unique_cards,
            total_cards: r.total_cards,
            duplicates: r.duplicates,
            last_unique_card_received_at: r.last_unique_card_received_at,
        }
    }
}

impl From<RankedScorer> for ScorerEntry {
    fn from(r: RankedScorer) -> Self {
        Self {
            rank: r.rank,
            email: r.email,
            name: r.name,
            quiz_score: r.quiz_score,
        }
    }
}
