//! Per-action summary returned alongside the event list.

use serde::{Deserialize, Serialize};

use super::events::ScoreKind;
use crate::data::TurnoverKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub d1: u8,
    pub d2: u8,
}

impl DiceRoll {
    pub fn new(d1: u8, d2: u8) -> Self {
        Self { d1, d2 }
    }

    pub fn sum(self) -> u8 {
        self.d1 + self.d2
    }

    pub fn is_doubles(self) -> bool {
        self.d1 == self.d2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayKind {
    Snap,
    Kickoff,
    Punt,
    FieldGoal,
    ExtraPoint,
    TwoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyOn {
    Offense,
    Defense,
}

/// A resolved foul: who committed it and what enforcing it does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyInfo {
    pub on: PenaltyOn,
    pub yards: i32,
    pub first_down: bool,
    pub loss_of_down: bool,
    pub replay_down: bool,
    /// Rolled as offsetting fouls; `on` was picked at random
    pub offset: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayReport {
    pub kind: PlayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<DiceRoll>,
    /// Net yards for the offense, or kick distance for kicks
    pub yards: i32,
    pub runoff: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<TurnoverKind>,
    #[serde(default)]
    pub turnover_on_downs: bool,
    #[serde(default)]
    pub first_down: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<PenaltyInfo>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub explosive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreKind>,
    #[serde(default)]
    pub degraded: bool,
}

impl PlayReport {
    pub fn new(kind: PlayKind) -> Self {
        Self {
            kind,
            dice: None,
            yards: 0,
            runoff: 0,
            turnover: None,
            turnover_on_downs: false,
            first_down: false,
            penalty: None,
            tags: Vec::new(),
            explosive: false,
            score: None,
            degraded: false,
        }
    }

    /// Possession changed hands without a kick.
    pub fn changed_possession(&self) -> bool {
        self.turnover.is_some() || self.turnover_on_downs
    }
}
