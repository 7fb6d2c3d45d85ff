//! Game flow state machine.
//!
//! `Kickoff → Drive(down 1..4) → {turnover | score | punt | field goal |
//! turnover on downs} → (try after a touchdown) → kickoff | end of period`.
//!
//! Every entry point takes the current `GameState` by reference and returns a
//! new one plus the ordered events for that call. The only state the flow
//! itself carries between calls is the RNG and an offered penalty choice.

mod kicking;
mod penalty_choice;
mod snap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::close_out_period;
use super::config::EngineConfig;
use super::rng::{Lcg, RandomSource};
use crate::data::TableStore;
use crate::error::{ProtocolViolation, Result};
use crate::models::{
    DefensiveSelection, FlowEvent, PenaltyChoice, PenaltyChoiceMeta, PlayCall, PlayReport,
    ScoreEvent, ScoreKind, SpecialTeamsCall,
};
use crate::state::{GameState, Side, FIRST_DOWN_YARDS, PAT_SPOT_YARDS};

/// Outcome of one flow call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    pub state: GameState,
    pub events: Vec<FlowEvent>,
    /// Absent when the call only offered a penalty choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<PlayReport>,
}

impl FlowResult {
    pub fn two_minute(&self) -> bool {
        self.state.is_two_minute()
    }
}

/// One candidate outcome, not yet committed: period checks and the HUD
/// snapshot are added when it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub state: GameState,
    pub report: PlayReport,
    pub logs: Vec<String>,
    pub scores: Vec<ScoreEvent>,
}

impl Branch {
    pub(crate) fn new(state: GameState, report: PlayReport) -> Self {
        Self { state, report, logs: Vec::new(), scores: Vec::new() }
    }

    pub(crate) fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    /// Touchdown for `side`: six points, then the try from the 2.
    pub(crate) fn touchdown(&mut self, side: Side) {
        self.score(side, ScoreKind::Touchdown);
        let s = &mut self.state;
        s.possession = side;
        s.ball_on = side.absolute(100 - PAT_SPOT_YARDS);
        s.down = 1;
        s.to_go = PAT_SPOT_YARDS;
        s.awaiting_pat = true;
    }

    /// Set up a kickoff by `kicker` from its own `spot` yard line.
    pub(crate) fn kick_off_next(&mut self, kicker: Side, spot: i32) {
        let s = &mut self.state;
        s.possession = kicker;
        s.ball_on = kicker.absolute(spot);
        s.down = 1;
        s.to_go = FIRST_DOWN_YARDS;
        s.awaiting_pat = false;
        s.pending_kickoff = Some(kicker);
    }

    pub(crate) fn score(&mut self, side: Side, kind: ScoreKind) {
        let points = kind.points();
        self.state.score.add(side, points);
        self.report.score = Some(kind);
        self.scores.push(ScoreEvent { side, kind, points, score: self.state.score });
    }
}

/// A penalty offered to the caller and not yet finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPenalty {
    pub meta: PenaltyChoiceMeta,
    pub pre_snap: GameState,
    pub accepted: Branch,
    pub declined: Branch,
}

impl PendingPenalty {
    pub fn choice(&self) -> PenaltyChoice {
        PenaltyChoice {
            accepted: self.accepted.state.clone(),
            declined: self.declined.state.clone(),
            meta: self.meta.clone(),
        }
    }
}

pub struct GameFlow<'t, R: RandomSource = Lcg> {
    tables: &'t TableStore,
    config: EngineConfig,
    rng: R,
    pending: Option<PendingPenalty>,
    next_choice_id: u64,
}

impl<'t> GameFlow<'t, Lcg> {
    pub fn new(tables: &'t TableStore, config: EngineConfig, seed: u32) -> Self {
        Self::with_rng(tables, config, Lcg::new(seed))
    }
}

impl<'t, R: RandomSource> GameFlow<'t, R> {
    pub fn with_rng(tables: &'t TableStore, config: EngineConfig, rng: R) -> Self {
        Self { tables, config, rng, pending: None, next_choice_id: 1 }
    }

    /// Rebuild a flow from persisted parts, e.g. between JSON API calls.
    pub fn resume(
        tables: &'t TableStore,
        config: EngineConfig,
        rng: R,
        pending: Option<PendingPenalty>,
    ) -> Self {
        let next_choice_id = pending.as_ref().map_or(1, |p| p.meta.id + 1);
        Self { tables, config, rng, pending, next_choice_id }
    }

    pub fn into_parts(self) -> (R, Option<PendingPenalty>) {
        (self.rng, self.pending)
    }

    pub fn tables(&self) -> &'t TableStore {
        self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// The offered penalty, if one awaits `finalize_penalty_decision`.
    pub fn pending_choice(&self) -> Option<PenaltyChoice> {
        self.pending.as_ref().map(PendingPenalty::choice)
    }

    /// Dispatch any of the offensive call shapes.
    pub fn run_play(
        &mut self,
        state: &GameState,
        call: &PlayCall,
        defense: &DefensiveSelection,
    ) -> Result<FlowResult> {
        match call {
            PlayCall::Snap(offense) => self.resolve_snap(state, offense, defense),
            PlayCall::SpecialTeams(SpecialTeamsCall::FieldGoal { attempt_yards }) => {
                self.attempt_field_goal(state, *attempt_yards, state.possession)
            }
            PlayCall::SpecialTeams(SpecialTeamsCall::Punt) => self.punt(state),
        }
    }

    /// Rejects a scrimmage-down action in any state that does not allow one.
    fn guard_scrimmage(&self, state: &GameState) -> Result<()> {
        if self.pending.is_some() {
            return Err(ProtocolViolation::ChoicePending.into());
        }
        if state.game_over {
            return Err(ProtocolViolation::GameOver.into());
        }
        if state.awaiting_pat {
            return Err(ProtocolViolation::AwaitingPat.into());
        }
        if let Some(kicker) = state.pending_kickoff {
            return Err(ProtocolViolation::KickoffPending(kicker).into());
        }
        Ok(())
    }

    fn guard_idle(&self, state: &GameState) -> Result<()> {
        if self.pending.is_some() {
            return Err(ProtocolViolation::ChoicePending.into());
        }
        if state.game_over {
            return Err(ProtocolViolation::GameOver.into());
        }
        Ok(())
    }

    /// Close the period if due and emit the committed event list.
    fn commit(&self, branch: Branch) -> FlowResult {
        let Branch { mut state, report, logs, scores } = branch;
        let mut period_events = Vec::new();
        close_out_period(&mut state, &self.config.clock, &mut period_events);

        let mut events: Vec<FlowEvent> = logs.into_iter().map(FlowEvent::log).collect();
        events.extend(scores.into_iter().map(FlowEvent::Score));
        events.extend(period_events);
        events.push(FlowEvent::hud(&state));

        debug!(
            kind = ?report.kind,
            yards = report.yards,
            runoff = report.runoff,
            clock = %state.clock_label(),
            down = %state.down_label(),
            "action committed"
        );
        FlowResult { state, events, report: Some(report) }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::engine::rng::scripted::ScriptedRng;

    pub fn tables() -> TableStore {
        TableStore::embedded().unwrap()
    }

    pub fn scripted<'t>(tables: &'t TableStore, draws: Vec<f64>) -> GameFlow<'t, ScriptedRng> {
        GameFlow::with_rng(tables, EngineConfig::default(), ScriptedRng::new(&draws))
    }

    pub fn hud_count(events: &[FlowEvent]) -> usize {
        events.iter().filter(|e| matches!(e, FlowEvent::Hud { .. })).count()
    }
}
