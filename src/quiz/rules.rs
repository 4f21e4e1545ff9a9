//! The static question/answer compatibility table. One lookup decides
//! whether a pair is legal, which sentence frames the question, and how many
//! points a correct answer is worth.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::cards::attributes::Attribute;

#[derive(Debug, Clone, Copy)]
pub struct QuizRule {
    /// Question sentence; `{}` is replaced with the correct card's question
    /// attribute where the sentence needs it.
    pub template: &'static str,
    pub points: i64,
}

use Attribute::*;

const RULES: &[(Attribute, Attribute, &str, i64)] = &[
    (Image, Name, "Whose card shows this picture?", 10),
    (Image, Acronym, "Which acronym belongs to the person in this picture?", 15),
    (Name, Image, "Which picture shows {}?", 10),
    (Name, Job, "What does {} work as?", 10),
    (Name, Acronym, "Which acronym does {} go by?", 10),
    (Name, StartDate, "When did {} start?", 20),
    (Name, WishDestination, "Where would {} like to travel someday?", 20),
    (Name, WishPerson, "Who would {} like to meet someday?", 20),
    (Name, WishSkill, "Which skill would {} like to master?", 20),
    (Name, BestAdvice, "What is the best advice {} ever received?", 20),
    (Acronym, Name, "Who goes by the acronym {}?", 10),
    (Job, Name, "Who works as {}?", 15),
    (StartDate, Name, "Who started on {}?", 25),
    (WishDestination, Name, "Whose dream destination is {}?", 25),
    (WishPerson, Name, "Who would like to meet {}?", 25),
    (WishSkill, Name, "Who would like to master {}?", 25),
    (BestAdvice, Name, "Who received the advice \"{}\"?", 25),
];

lazy_static! {
    static ref TABLE: HashMap<(Attribute, Attribute), QuizRule> = RULES
        .iter()
        .map(|&(q, a, template, points)| ((q, a), QuizRule { template, points }))
        .collect();
}

pub fn rule_for(question: Attribute, answer: Attribute) -> Option<QuizRule> {
    TABLE.get(&(question, answer)).copied()
}

/// Answer types that form a legal pair with the given question type,
/// in table order (stable for seeded sampling).
pub fn answers_for(question: Attribute) -> Vec<Attribute> {
    RULES
        .iter()
        .filter(|(q, _, _, _)| *q == question)
        .map(|(_, a, _, _)| *a)
        .collect()
}

pub fn questions_for(answer: Attribute) -> Vec<Attribute> {
    RULES
        .iter()
        .filter(|(_, a, _, _)| *a == answer)
        .map(|(q, _, _, _)| *q)
        .collect()
}

pub fn all_pairs() -> Vec<(Attribute, Attribute)> {
    RULES.iter().map(|(q, a, _, _)| (*q, *a)).collect()
}

pub fn render_question(template: &str, question_value: &str) -> String {
    template.replace("{}", question_value)
}
