//! Matchup tables: one 2d20 outcome map per (offense card, defense call).
//!
//! JSON is parsed into a loose raw form first, then validated into
//! `MatchupTable` so that every schema failure names the file and field path.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, SchemaError};

pub const DICE_NOTATION: &str = "2d20";
pub const MIN_SUM: u8 = 3;
pub const MAX_SUM: u8 = 39;
const DOUBLES_LOW: &str = "1";
const DOUBLES_HIGH: &str = "20";
const DOUBLES_PENALTY: &str = "2-19";

/// Clock runoff bucket authored per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockBucket {
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "30")]
    Thirty,
}

impl ClockBucket {
    pub fn seconds(self) -> u32 {
        match self {
            ClockBucket::Ten => 10,
            ClockBucket::Twenty => 20,
            ClockBucket::Thirty => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TurnoverKind {
    Int,
    Fum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnTo {
    #[serde(rename = "LOS")]
    LineOfScrimmage,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turnover {
    #[serde(rename = "type")]
    pub kind: TurnoverKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_yards: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<ReturnTo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceOutcome {
    pub yards: i32,
    pub clock: ClockBucket,
    /// Semantic labels; only "incomplete" is read by the engine
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<Turnover>,
    #[serde(default)]
    pub oob: bool,
}

impl DiceOutcome {
    pub const TAG_INCOMPLETE: &'static str = "incomplete";

    pub fn gain(yards: i32, clock: ClockBucket) -> Self {
        Self { yards, clock, tags: Vec::new(), turnover: None, oob: false }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoublesResult {
    #[serde(rename = "DEF_TD")]
    DefensiveTouchdown,
    #[serde(rename = "OFF_TD")]
    OffensiveTouchdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoublesRules {
    pub snake_eyes: DoublesResult,
    pub boxcars: DoublesResult,
    pub penalty_table_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupMeta {
    #[serde(default)]
    pub oob_bias: Option<f64>,
    /// Informational; the engine always clamps
    #[serde(default = "default_true")]
    pub field_pos_clamp: bool,
    #[serde(default)]
    pub risk_profile: Option<String>,
    #[serde(default)]
    pub explosive_start_sum: Option<u8>,
}

fn default_true() -> bool {
    true
}

impl Default for MatchupMeta {
    fn default() -> Self {
        Self { oob_bias: None, field_pos_clamp: true, risk_profile: None, explosive_start_sum: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupKey {
    pub deck: String,
    pub play: String,
    pub defense: String,
}

impl MatchupKey {
    pub fn new(deck: &str, play: &str, defense: &str) -> Self {
        Self { deck: deck.to_string(), play: play.to_string(), defense: defense.to_string() }
    }

    pub fn offense_card(&self) -> String {
        format!("{}/{}", self.deck, self.play)
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{} vs {}", self.deck, self.play, self.defense)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupTable {
    pub version: String,
    pub key: MatchupKey,
    pub(crate) entries: BTreeMap<u8, DiceOutcome>,
    pub doubles: DoublesRules,
    pub meta: MatchupMeta,
}

#[derive(Deserialize)]
struct RawOffenseCard {
    deck: String,
    play: String,
}

#[derive(Deserialize)]
struct RawMatchupTable {
    version: String,
    offense: RawOffenseCard,
    defense: String,
    dice: String,
    entries: BTreeMap<String, serde_json::Value>,
    doubles: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    meta: MatchupMeta,
}

#[derive(Deserialize)]
struct RawDoublesResult {
    result: DoublesResult,
}

#[derive(Deserialize)]
struct RawDoublesPenalty {
    penalty_table_ref: String,
}

impl MatchupTable {
    /// Parse and validate one matchup file.
    pub fn from_json(file: &str, json: &str) -> Result<Self, SchemaError> {
        let raw: RawMatchupTable =
            serde_json::from_str(json).map_err(|e| SchemaError::json(file, e))?;

        if raw.dice != DICE_NOTATION {
            return Err(SchemaError::field(
                file,
                "dice",
                format!("expected \"{}\", found \"{}\"", DICE_NOTATION, raw.dice),
            ));
        }

        let mut entries = BTreeMap::new();
        for (key, value) in raw.entries {
            let path = format!("entries.{}", key);
            let sum: u8 = key
                .parse()
                .ok()
                .filter(|s| (MIN_SUM..=MAX_SUM).contains(s))
                .ok_or_else(|| SchemaError::field(file, &path, "key is not a dice sum 3..39"))?;
            let outcome: DiceOutcome = serde_json::from_value(value)
                .map_err(|e| SchemaError::field(file, &path, e.to_string()))?;
            entries.insert(sum, outcome);
        }
        if let Some(missing) = (MIN_SUM..=MAX_SUM).find(|s| !entries.contains_key(s)) {
            return Err(SchemaError::field(
                file,
                format!("entries.{}", missing),
                "missing dice sum",
            ));
        }

        let doubles = Self::parse_doubles(file, &raw.doubles)?;

        Ok(Self {
            version: raw.version,
            key: MatchupKey {
                deck: raw.offense.deck,
                play: raw.offense.play,
                defense: raw.defense,
            },
            entries,
            doubles,
            meta: raw.meta,
        })
    }

    fn parse_doubles(
        file: &str,
        doubles: &BTreeMap<String, serde_json::Value>,
    ) -> Result<DoublesRules, SchemaError> {
        let field = |key: &str| {
            doubles
                .get(key)
                .cloned()
                .ok_or_else(|| SchemaError::field(file, format!("doubles.{}", key), "missing"))
        };
        let result = |key: &str| -> Result<DoublesResult, SchemaError> {
            let raw: RawDoublesResult = serde_json::from_value(field(key)?)
                .map_err(|e| SchemaError::field(file, format!("doubles.{}", key), e.to_string()))?;
            Ok(raw.result)
        };

        let snake_eyes = result(DOUBLES_LOW)?;
        if snake_eyes != DoublesResult::DefensiveTouchdown {
            return Err(SchemaError::field(file, "doubles.1.result", "1-1 must be DEF_TD"));
        }
        let boxcars = result(DOUBLES_HIGH)?;
        if boxcars != DoublesResult::OffensiveTouchdown {
            return Err(SchemaError::field(file, "doubles.20.result", "20-20 must be OFF_TD"));
        }
        let penalty: RawDoublesPenalty = serde_json::from_value(field(DOUBLES_PENALTY)?)
            .map_err(|e| SchemaError::field(file, "doubles.2-19", e.to_string()))?;

        Ok(DoublesRules { snake_eyes, boxcars, penalty_table_ref: penalty.penalty_table_ref })
    }

    /// Outcome for a non-double sum. A gap is a data-authoring defect.
    pub fn lookup(&self, sum: u8) -> Result<&DiceOutcome, EngineError> {
        self.entries.get(&sum).ok_or_else(|| EngineError::TableGap {
            offense: self.key.offense_card(),
            defense: self.key.defense.clone(),
            sum,
        })
    }

    /// Advisory only: marks commentary, never changes mechanics.
    pub fn is_explosive_sum(&self, sum: u8) -> bool {
        self.meta.explosive_start_sum.is_some_and(|start| sum >= start)
    }
}
