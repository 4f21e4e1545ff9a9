use std::collections::BTreeMap;

use anyhow::anyhow;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::cards;
use crate::cards::attributes::Attribute;
use crate::cards::repo_types::Card;
use crate::error::ApiError;
use crate::quiz::dto::{QuestionRequest, QuestionResponse, QuizOption, TypeChoice};
use crate::quiz::repo;
use crate::quiz::rules;
use crate::state::AppState;
use crate::storage::CARD_IMAGES;
use crate::users;
use crate::users::repo_types::User;

const MIN_OPTIONS: i32 = 2;
const MAX_OPTIONS: i32 = 8;
const IMAGE_URL_TTL_SECS: u64 = 60 * 60;

/// Resolve `random` sides of the requested pair against the compatibility
/// table. The fixed side constrains the draw; an unsupported fixed pair is
/// rejected outright.
pub fn resolve_types(
    question: TypeChoice,
    answer: TypeChoice,
    rng: &mut impl Rng,
) -> Result<(Attribute, Attribute), ApiError> {
    match (question, answer) {
        (TypeChoice::Fixed(q), TypeChoice::Fixed(a)) => {
            rules::rule_for(q, a)
                .map(|_| (q, a))
                .ok_or_else(|| ApiError::IllegalQuestionPair(format!("{q} -> {a}")))
        }
        (TypeChoice::Fixed(q), TypeChoice::Random) => {
            let answers = rules::answers_for(q);
            if answers.is_empty() {
                return Err(ApiError::IllegalQuestionPair(format!("{q} -> ?")));
            }
            Ok((q, answers[rng.gen_range(0..answers.len())]))
        }
        (TypeChoice::Random, TypeChoice::Fixed(a)) => {
            let questions = rules::questions_for(a);
            if questions.is_empty() {
                return Err(ApiError::IllegalQuestionPair(format!("? -> {a}")));
            }
            Ok((questions[rng.gen_range(0..questions.len())], a))
        }
        (TypeChoice::Random, TypeChoice::Random) => {
            let pairs = rules::all_pairs();
            Ok(pairs[rng.gen_range(0..pairs.len())])
        }
    }
}

/// Deduplicate candidates by answer value (one random representative per
/// value, so no two offered options read the same), shuffle, keep
/// `option_count`, and pick the correct card among the kept ones.
pub fn select_options(
    candidates: Vec<Card>,
    answer: Attribute,
    option_count: usize,
    rng: &mut impl Rng,
) -> Result<(Vec<(Card, String)>, usize), ApiError> {
    let mut by_value: BTreeMap<String, Vec<Card>> = BTreeMap::new();
    for card in candidates {
        if let Some(value) = answer.value_of(&card) {
            by_value.entry(value).or_default().push(card);
        }
    }

    let mut options: Vec<(Card, String)> = by_value
        .into_iter()
        .map(|(value, mut group)| {
            let idx = rng.gen_range(0..group.len());
            (group.swap_remove(idx), value)
        })
        .collect();

    if options.len() < option_count {
        return Err(ApiError::InvalidRequest(format!(
            "only {} distinct answers available for {} options",
            options.len(),
            option_count
        )));
    }

    options.shuffle(rng);
    options.truncate(option_count);
    let correct_idx = rng.gen_range(0..options.len());
    Ok((options, correct_idx))
}

/// Penalty for a wrong answer, tuned so a uniformly random guess has an
/// expected value of roughly zero. Callers guarantee `option_count >= 2`.
pub fn penalty(points: i64, option_count: i32) -> i64 {
    debug_assert!(option_count >= 2);
    -((points as f64 / (option_count as f64 - 1.0)).round() as i64)
}

pub async fn generate_question(
    state: &AppState,
    user: &User,
    req: &QuestionRequest,
    rng: &mut impl Rng,
) -> Result<QuestionResponse, ApiError> {
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&req.option_count) {
        return Err(ApiError::InvalidRequest(format!(
            "option_count must be between {MIN_OPTIONS} and {MAX_OPTIONS}"
        )));
    }

    let (question_type, answer_type) = resolve_types(req.question_type, req.answer_type, rng)?;
    let rule = rules::rule_for(question_type, answer_type)
        .ok_or_else(|| ApiError::IllegalQuestionPair(format!("{question_type} -> {answer_type}")))?;

    let candidates = cards::repo::with_attributes(&state.db, question_type, answer_type).await?;
    let (options, correct_idx) =
        select_options(candidates, answer_type, req.option_count as usize, rng)?;
    let (correct_card, _) = &options[correct_idx];

    let quiz = repo::insert(
        &state.db,
        user.id,
        question_type,
        answer_type,
        correct_card.id,
        req.option_count,
    )
    .await?;

    let raw_question_value = question_type
        .value_of(correct_card)
        .ok_or_else(|| ApiError::Internal(anyhow!("candidate lost its question attribute")))?;
    let question_value = if question_type == Attribute::Image {
        state
            .storage
            .signed_url(CARD_IMAGES, &raw_question_value, IMAGE_URL_TTL_SECS)
            .await?
    } else {
        raw_question_value.clone()
    };

    let mut rendered = Vec::with_capacity(options.len());
    for (card, value) in &options {
        let image_url = if answer_type == Attribute::Image {
            let key = card
                .image_key
                .as_deref()
                .ok_or_else(|| ApiError::Internal(anyhow!("candidate lost its image key")))?;
            Some(
                state
                    .storage
                    .signed_url(CARD_IMAGES, key, IMAGE_URL_TTL_SECS)
                    .await?,
            )
        } else {
            None
        };
        rendered.push(QuizOption {
            value: value.clone(),
            image_url,
        });
    }

    info!(
        user_id = %user.id,
        quiz_id = %quiz.id,
        question_type = %question_type,
        answer_type = %answer_type,
        options = options.len(),
        "quiz question generated"
    );

    Ok(QuestionResponse {
        quiz_id: quiz.id,
        question_type,
        answer_type,
        question: rules::render_question(rule.template, &raw_question_value),
        question_value,
        options: rendered,
        points: rule.points,
    })
}

pub struct AnswerOutcome {
    pub correct: bool,
    pub given_answer: String,
    pub correct_answer: String,
    pub score_change: i64,
    pub new_score: i64,
}

pub async fn submit_answer(
    db: &PgPool,
    user: &User,
    quiz_id: Uuid,
    given: &str,
) -> Result<AnswerOutcome, ApiError> {
    let mut tx = db.begin().await?;

    let quiz = repo::lock(&mut tx, quiz_id)
        .await?
        .filter(|q| q.user_id == user.id)
        .ok_or_else(|| ApiError::NotFound("quiz not found".into()))?;

    if quiz.answered_correctly.is_some() {
        return Err(ApiError::AlreadyAnswered);
    }

    let card = cards::repo::find_by_id(&mut tx, quiz.correct_card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("card not found".into()))?;

    // Image answers compare on the stable blob key; attribute answers on the
    // rendered value. Signed URLs are never compared.
    let correct_answer = quiz
        .answer_type
        .value_of(&card)
        .ok_or_else(|| ApiError::Internal(anyhow!("card lost its answer attribute")))?;
    let correct = given == correct_answer;

    let rule = rules::rule_for(quiz.question_type, quiz.answer_type).ok_or_else(|| {
        ApiError::IllegalQuestionPair(format!("{} -> {}", quiz.question_type, quiz.answer_type))
    })?;
    let score_change = if correct {
        rule.points
    } else {
        penalty(rule.points, quiz.option_count)
    };

    repo::mark_answered(&mut tx, quiz.id, correct, OffsetDateTime::now_utc()).await?;
    let new_score = users::repo::apply_score_delta(&mut tx, user.id, score_change).await?;
    tx.commit().await?;

    info!(
        user_id = %user.id,
        %quiz_id,
        correct,
        score_change,
        new_score,
        "quiz answered"
    );

    Ok(AnswerOutcome {
        correct,
        given_answer: given.to_string(),
        correct_answer,
        score_change,
        new_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use std::collections::HashSet;
    use time::OffsetDateTime;

    fn card(name: &str, acronym: &str, job: Option<&str>) -> Card {
        Card {
            id: Uuid::new_v4(),
            name: name.into(),
            acronym: acronym.into(),
            job: job.map(String::from),
            start_date: None,
            wish_destination: None,
            wish_person: None,
            wish_skill: None,
            best_advice: None,
            image_key: Some(format!("{acronym}.png")),
            owner_email: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn penalty_matches_the_zero_ev_formula() {
        assert_eq!(penalty(10, 4), -3);
        assert_eq!(penalty(10, 2), -10);
        assert_eq!(penalty(20, 5), -5);
        assert_eq!(penalty(25, 4), -8);
    }

    #[test]
    fn fixed_pair_resolution_checks_the_table() {
        let mut rng = rng::seeded(1);
        let (q, a) = resolve_types(
            TypeChoice::Fixed(Attribute::Name),
            TypeChoice::Fixed(Attribute::Job),
            &mut rng,
        )
        .unwrap();
        assert_eq!((q, a), (Attribute::Name, Attribute::Job));

        let err = resolve_types(
            TypeChoice::Fixed(Attribute::Image),
            TypeChoice::Fixed(Attribute::Image),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::IllegalQuestionPair(_)));
    }

    #[test]
    fn random_side_is_drawn_from_compatible_types() {
        let mut rng = rng::seeded(2);
        for _ in 0..20 {
            let (q, a) = resolve_types(
                TypeChoice::Fixed(Attribute::Image),
                TypeChoice::Random,
                &mut rng,
            )
            .unwrap();
            assert_eq!(q, Attribute::Image);
            assert!(rules::rule_for(q, a).is_some());
        }
        for _ in 0..20 {
            let (q, a) = resolve_types(TypeChoice::Random, TypeChoice::Random, &mut rng).unwrap();
            assert!(rules::rule_for(q, a).is_some());
        }
    }

    #[test]
    fn type_resolution_is_deterministic_under_a_seed() {
        let a = resolve_types(TypeChoice::Random, TypeChoice::Random, &mut rng::seeded(5)).unwrap();
        let b = resolve_types(TypeChoice::Random, TypeChoice::Random, &mut rng::seeded(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn options_are_deduplicated_by_answer_value() {
        // Two analysts: only one may appear, or the options would be
        // indistinguishable.
        let candidates = vec![
            card("Ada", "ADA", Some("Analyst")),
            card("Grace", "GRA", Some("Analyst")),
            card("Edsger", "EDS", Some("Theorist")),
            card("Barbara", "BAR", Some("Architect")),
        ];
        let mut rng = rng::seeded(9);
        let (options, _) = select_options(candidates, Attribute::Job, 3, &mut rng).unwrap();
        let values: HashSet<&str> = options.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn selection_fails_when_distinct_answers_run_short() {
        let candidates = vec![
            card("Ada", "ADA", Some("Analyst")),
            card("Grace", "GRA", Some("Analyst")),
        ];
        let mut rng = rng::seeded(9);
        let err = select_options(candidates, Attribute::Job, 2, &mut rng).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn correct_index_points_at_an_offered_option() {
        let candidates = vec![
            card("Ada", "ADA", Some("Analyst")),
            card("Edsger", "EDS", Some("Theorist")),
            card("Barbara", "BAR", Some("Architect")),
            card("Donald", "DON", Some("Author")),
        ];
        let mut rng = rng::seeded(4);
        let (options, correct_idx) =
            select_options(candidates, Attribute::Job, 3, &mut rng).unwrap();
        assert_eq!(options.len(), 3);
        assert!(correct_idx < options.len());
        let (correct_card, value) = &options[correct_idx];
        assert_eq!(Attribute::Job.value_of(correct_card).as_deref(), Some(value.as_str()));
    }

    #[test]
    fn selection_is_deterministic_under_a_seed() {
        let make = || {
            vec![
                card("Ada", "ADA", Some("Analyst")),
                card("Edsger", "EDS", Some("Theorist")),
                card("Barbara", "BAR", Some("Architect")),
                card("Donald", "DON", Some("Author")),
            ]
        };
        let (a, ai) = select_options(make(), Attribute::Job, 3, &mut rng::seeded(6)).unwrap();
        let (b, bi) = select_options(make(), Attribute::Job, 3, &mut rng::seeded(6)).unwrap();
        let values = |opts: &[(Card, String)]| {
            opts.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>()
        };
        assert_eq!(values(&a), values(&b));
        assert_eq!(ai, bi);
    }
}
