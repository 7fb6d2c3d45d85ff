//! Driving whole games through the flow with pluggable play callers.
//!
//! The engine never calls consumer code; `run_game` is the loop that asks
//! each side's `PlayCaller` for decisions and feeds them back in.

mod baseline;

pub use baseline::BaselineCaller;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::data::{DeckCatalog, TableStore};
use crate::engine::config::EngineConfig;
use crate::engine::rng::RandomSource;
use crate::engine::{FlowResult, GameFlow};
use crate::error::{EngineError, Result};
use crate::models::{
    DefensiveSelection, FlowEvent, KickoffKind, PatKind, PenaltyChoice, PenaltyDecision, PlayCall,
    PlayReport,
};
use crate::state::{GameState, Score, Side};

/// Upper bound on flow calls in one game; a game that needs more is stuck.
pub const MAX_ACTIONS_PER_GAME: u32 = 5_000;

/// Decision callbacks for one side.
pub trait PlayCaller {
    fn call_offense(&mut self, state: &GameState, catalog: &DeckCatalog) -> PlayCall;

    fn call_defense(&mut self, state: &GameState, catalog: &DeckCatalog) -> DefensiveSelection;

    /// Called for the offended side only.
    fn decide_penalty(&mut self, choice: &PenaltyChoice, side: Side) -> PenaltyDecision;

    fn choose_pat(&mut self, _state: &GameState) -> PatKind {
        PatKind::Kick
    }

    fn choose_kickoff(&mut self, _state: &GameState) -> KickoffKind {
        KickoffKind::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub final_state: GameState,
    pub events: Vec<FlowEvent>,
    pub plays: Vec<PlayReport>,
    /// SHA-256 of the JSON event stream
    pub digest: String,
}

/// Per-game summary from a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u32,
    pub score: Score,
    pub actions: usize,
    pub digest: String,
}

fn caller_for<'a>(
    side: Side,
    player: &'a mut dyn PlayCaller,
    ai: &'a mut dyn PlayCaller,
) -> &'a mut dyn PlayCaller {
    match side {
        Side::Player => player,
        Side::Ai => ai,
    }
}

/// Play `state` to the final whistle. `player` and `ai` answer for their
/// respective sides. Errors from the flow are returned as-is; there are no
/// retries.
pub fn run_game<R: RandomSource>(
    flow: &mut GameFlow<'_, R>,
    mut state: GameState,
    player: &mut dyn PlayCaller,
    ai: &mut dyn PlayCaller,
) -> Result<GameRecord> {
    let catalog = flow.tables().catalog();
    let mut events = Vec::new();
    let mut plays = Vec::new();
    let mut actions = 0u32;

    while !state.game_over {
        actions += 1;
        if actions > MAX_ACTIONS_PER_GAME {
            return Err(EngineError::ActionLimit(MAX_ACTIONS_PER_GAME));
        }

        let result: FlowResult = if let Some(choice) = flow.pending_choice() {
            let side = choice.meta.decided_by;
            let decision = caller_for(side, player, ai).decide_penalty(&choice, side);
            let chosen = match decision {
                PenaltyDecision::Accept => &choice.accepted,
                PenaltyDecision::Decline => &choice.declined,
            };
            flow.finalize_penalty_decision(chosen, decision, &choice.meta)?
        } else if let Some(kicker) = state.pending_kickoff {
            let kind = caller_for(kicker, player, ai).choose_kickoff(&state);
            flow.perform_kickoff(&state, kind, kicker)?
        } else if state.awaiting_pat {
            let kind = caller_for(state.possession, player, ai).choose_pat(&state);
            flow.attempt_pat(&state, kind)?
        } else {
            let call = caller_for(state.possession, player, ai).call_offense(&state, catalog);
            let defense = caller_for(state.defense(), player, ai).call_defense(&state, catalog);
            flow.run_play(&state, &call, &defense)?
        };

        if let Some(report) = result.report {
            plays.push(report);
        }
        events.extend(result.events);
        state = result.state;
    }

    let digest = digest_events(&events);
    debug!(actions, plays = plays.len(), %digest, "game complete");
    Ok(GameRecord { final_state: state, events, plays, digest })
}

pub fn digest_events(events: &[FlowEvent]) -> String {
    let bytes = serde_json::to_vec(events).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

/// Run one game per seed in parallel with baseline callers on both sides.
/// Each game owns its RNG; the tables are shared read-only.
pub fn simulate_batch(
    tables: &TableStore,
    config: &EngineConfig,
    seeds: &[u32],
) -> Vec<Result<GameSummary>> {
    info!(games = seeds.len(), "batch simulation");
    seeds
        .par_iter()
        .map(|&seed| {
            let mut flow = GameFlow::new(tables, config.clone(), seed);
            let mut player = BaselineCaller::with_rules(seed ^ 0xA5A5, &config.rules);
            let mut ai = BaselineCaller::with_rules(seed ^ 0x5A5A, &config.rules);
            let opening_kicker = if seed % 2 == 0 { Side::Ai } else { Side::Player };
            let kickoff = GameState::new_game(opening_kicker, &config.clock);
            let record = run_game(&mut flow, kickoff, &mut player, &mut ai)?;
            Ok(GameSummary {
                seed,
                score: record.final_state.score,
                actions: record.plays.len(),
                digest: record.digest,
            })
        })
        .collect()
}
