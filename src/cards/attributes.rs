use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;

use crate::cards::repo_types::Card;

/// Typed card attributes the quiz engine can ask about or answer with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Attribute {
    Image,
    Name,
    Job,
    Acronym,
    StartDate,
    WishDestination,
    WishPerson,
    WishSkill,
    BestAdvice,
}

pub const ALL_ATTRIBUTES: [Attribute; 9] = [
    Attribute::Image,
    Attribute::Name,
    Attribute::Job,
    Attribute::Acronym,
    Attribute::StartDate,
    Attribute::WishDestination,
    Attribute::WishPerson,
    Attribute::WishSkill,
    Attribute::BestAdvice,
];

impl Attribute {
    /// Column backing this attribute in the `cards` table.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::Image => "image_key",
            Attribute::Name => "name",
            Attribute::Job => "job",
            Attribute::Acronym => "acronym",
            Attribute::StartDate => "start_date",
            Attribute::WishDestination => "wish_destination",
            Attribute::WishPerson => "wish_person",
            Attribute::WishSkill => "wish_skill",
            Attribute::BestAdvice => "best_advice",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Image => "image",
            Attribute::Name => "name",
            Attribute::Job => "job",
            Attribute::Acronym => "acronym",
            Attribute::StartDate => "start_date",
            Attribute::WishDestination => "wish_destination",
            Attribute::WishPerson => "wish_person",
            Attribute::WishSkill => "wish_skill",
            Attribute::BestAdvice => "best_advice",
        }
    }

    /// The comparable value of this attribute on a card. For `Image` this is
    /// the stable blob key, never a signed URL.
    pub fn value_of(self, card: &Card) -> Option<String> {
        match self {
            Attribute::Image => card.image_key.clone(),
            Attribute::Name => Some(card.name.clone()),
            Attribute::Job => card.job.clone(),
            Attribute::Acronym => Some(card.acronym.clone()),
            Attribute::StartDate => card.start_date.map(format_date),
            Attribute::WishDestination => card.wish_destination.clone(),
            Attribute::WishPerson => card.wish_person.clone(),
            Attribute::WishSkill => card.wish_skill.clone(),
            Attribute::BestAdvice => card.best_advice.clone(),
        }
    }
}

pub fn format_date(date: time::Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date.format(&fmt).unwrap_or_else(|_| date.to_string())
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ATTRIBUTES
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown attribute: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn card() -> Card {
        Card {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".into(),
            acronym: "ADA".into(),
            job: Some("Analyst".into()),
            start_date: Some(date!(2019 - 03 - 01)),
            wish_destination: None,
            wish_person: Some("Charles Babbage".into()),
            wish_skill: None,
            best_advice: Some("Write it down".into()),
            image_key: Some("ada.png".into()),
            owner_email: Some("ada@example.com".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn value_of_reads_the_matching_field() {
        let c = card();
        assert_eq!(Attribute::Name.value_of(&c).as_deref(), Some("Ada Lovelace"));
        assert_eq!(Attribute::Acronym.value_of(&c).as_deref(), Some("ADA"));
        assert_eq!(Attribute::Image.value_of(&c).as_deref(), Some("ada.png"));
        assert_eq!(
            Attribute::StartDate.value_of(&c).as_deref(),
            Some("2019-03-01")
        );
        assert_eq!(Attribute::WishDestination.value_of(&c), None);
    }

    #[test]
    fn serde_uses_snake_case_names() {
        assert_eq!(
            serde_json::to_string(&Attribute::StartDate).unwrap(),
            "\"start_date\""
        );
        let parsed: Attribute = serde_json::from_str("\"wish_person\"").unwrap();
        assert_eq!(parsed, Attribute::WishPerson);
    }

    #[test]
    fn from_str_round_trips_every_attribute() {
        for attr in ALL_ATTRIBUTES {
            assert_eq!(attr.as_str().parse::<Attribute>().unwrap(), attr);
        }
        assert!("favorite_color".parse::<Attribute>().is_err());
    }
}
