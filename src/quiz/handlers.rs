use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::rng;
use crate::state::AppState;

use super::dto::{AnswerRequest, AnswerResponse, QuestionRequest, QuestionResponse};
use super::services;

pub fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/question", post(question))
        .route("/quiz/answer", post(answer))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn question(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let mut rng = rng::from_entropy();
    let response = services::generate_question(&state, &user, &payload, &mut rng).await?;
    Ok(Json(response))
}

#[instrument(skip_all, fields(user_id = %user.id, quiz_id = %payload.quiz_id))]
pub async fn answer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let outcome =
        services::submit_answer(&state.db, &user, payload.quiz_id, &payload.answer).await?;
    Ok(Json(AnswerResponse {
        quiz_id: payload.quiz_id,
        correct: outcome.correct,
        given_answer: outcome.given_answer,
        correct_answer: outcome.correct_answer,
        score_change: outcome.score_change,
        new_score: outcome.new_score,
    }))
}
