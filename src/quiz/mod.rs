//! Trivia over the card catalog: question generation from card attributes,
//! single-shot answers, and score bookkeeping.

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod rules;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::quiz_routes())
}
