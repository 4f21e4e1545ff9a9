pub mod attributes;
mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use dto::CardView;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::card_routes())
}
