//! Deck catalog: which plays each offensive deck carries, the legal
//! defensive calls, and white-sign (goal-line) restrictions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    Run,
    Pass,
    Punt,
    FieldGoal,
}

impl CardType {
    /// Run and pass cards resolve through a matchup table.
    pub fn is_scrimmage(self) -> bool {
        matches!(self, CardType::Run | CardType::Pass)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCard {
    pub label: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deck {
    pub plays: Vec<PlayCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeckCatalog {
    pub decks: BTreeMap<String, Deck>,
    #[serde(default)]
    pub defenses: Vec<String>,
    /// Play label → distance-to-goal at or under which the play may not be called
    #[serde(default)]
    pub white_sign_restrictions: BTreeMap<String, i32>,
}

impl DeckCatalog {
    pub fn from_json(file: &str, json: &str) -> Result<Self, SchemaError> {
        let catalog: DeckCatalog =
            serde_json::from_str(json).map_err(|e| SchemaError::json(file, e))?;
        for (name, deck) in &catalog.decks {
            if deck.plays.is_empty() {
                return Err(SchemaError::field(file, format!("decks.{}.plays", name), "empty deck"));
            }
            for (i, card) in deck.plays.iter().enumerate() {
                if card.label.trim().is_empty() {
                    return Err(SchemaError::field(
                        file,
                        format!("decks.{}.plays[{}].label", name, i),
                        "empty label",
                    ));
                }
            }
        }
        Ok(catalog)
    }

    pub fn card_type(&self, deck: &str, play: &str) -> Option<CardType> {
        self.decks
            .get(deck)?
            .plays
            .iter()
            .find(|card| card.label == play)
            .map(|card| card.card_type)
    }

    pub fn has_defense(&self, label: &str) -> bool {
        self.defenses.iter().any(|d| d == label)
    }

    pub fn deck_names(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }
}
