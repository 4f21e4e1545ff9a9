use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::attributes::Attribute;

/// A fixed attribute or the `"random"` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeChoice {
    Random,
    #[serde(untagged)]
    Fixed(Attribute),
}

fn default_choice() -> TypeChoice {
    TypeChoice::Random
}

fn default_option_count() -> i32 {
    4
}

/// Request body for `POST /quiz/question`.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default = "default_choice")]
    pub question_type: TypeChoice,
    #[serde(default = "default_choice")]
    pub answer_type: TypeChoice,
    #[serde(default = "default_option_count")]
    pub option_count: i32,
}

/// One offered answer. `value` is the stable comparable value submitted back
/// on answering; `image_url` is set (display only) when the answer type is
/// the card portrait.
#[derive(Debug, Serialize)]
pub struct QuizOption {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub quiz_id: Uuid,
    pub question_type: Attribute,
    pub answer_type: Attribute,
    pub question: String,
    /// The question attribute of the correct card: a signed URL for picture
    /// questions, the raw value otherwise.
    pub question_value: String,
    pub options: Vec<QuizOption>,
    pub points: i64,
}

/// Request body for `POST /quiz/answer`.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub quiz_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub quiz_id: Uuid,
    pub correct: bool,
    pub given_answer: String,
    pub correct_answer: String,
    pub score_change: i64,
    pub new_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_choice_parses_random_and_fixed() {
        let c: TypeChoice = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(c, TypeChoice::Random);
        let c: TypeChoice = serde_json::from_str("\"wish_skill\"").unwrap();
        assert_eq!(c, TypeChoice::Fixed(Attribute::WishSkill));
        assert!(serde_json::from_str::<TypeChoice>("\"favorite_color\"").is_err());
    }

    #[test]
    fn question_request_defaults() {
        let req: QuestionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.question_type, TypeChoice::Random);
        assert_eq!(req.answer_type, TypeChoice::Random);
        assert_eq!(req.option_count, 4);
    }

    #[test]
    fn options_omit_missing_image_urls() {
        let opt = QuizOption {
            value: "Analyst".into(),
            image_url: None,
        };
        let json = serde_json::to_string(&opt).unwrap();
        assert!(!json.contains("image_url"));
    }
}
