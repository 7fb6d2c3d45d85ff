//! Events emitted by the game flow, in order, per call.
//!
//! Consumers subscribe to this list; the core never calls back into them.

use serde::{Deserialize, Serialize};

use super::report::{DiceRoll, PenaltyInfo};
use crate::state::{GameState, Score, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowEvent {
    /// State snapshot for display; always last in a committed action
    Hud { state: GameState },
    Log { line: String },
    #[serde(rename = "choice-required")]
    ChoiceRequired { choice: ChoiceKind, data: PenaltyChoice },
    Score(ScoreEvent),
    EndOfQuarter { quarter: u8 },
    Halftime,
    Final { score: Score },
}

impl FlowEvent {
    pub fn log(line: impl Into<String>) -> Self {
        FlowEvent::Log { line: line.into() }
    }

    pub fn hud(state: &GameState) -> Self {
        FlowEvent::Hud { state: state.clone() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    #[serde(rename = "penaltyAcceptDecline")]
    PenaltyAcceptDecline,
}

/// Both candidate states of a penalty. Exactly one is committed via
/// `GameFlow::finalize_penalty_decision`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyChoice {
    pub accepted: GameState,
    pub declined: GameState,
    pub meta: PenaltyChoiceMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyChoiceMeta {
    /// Matches the finalize call to this offer
    pub id: u64,
    pub penalty: PenaltyInfo,
    pub label: String,
    pub is_forced_override: bool,
    /// Side entitled to accept or decline (the offended team)
    pub decided_by: Side,
    pub dice: DiceRoll,
    pub d10: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreKind {
    Touchdown,
    FieldGoal,
    Safety,
    ExtraPoint,
    TwoPoint,
}

impl ScoreKind {
    pub fn points(self) -> u32 {
        match self {
            ScoreKind::Touchdown => 6,
            ScoreKind::FieldGoal => 3,
            ScoreKind::Safety => 2,
            ScoreKind::ExtraPoint => 1,
            ScoreKind::TwoPoint => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub side: Side,
    pub kind: ScoreKind,
    pub points: u32,
    /// Score after this event
    pub score: Score,
}
