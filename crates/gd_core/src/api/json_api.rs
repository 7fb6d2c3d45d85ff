//! Stateless string-in/string-out entry point for the browser UI.
//!
//! Each request carries everything the engine needs: state, RNG state, the
//! pending penalty offer (if any) and exactly one action. The response hands
//! back the updated state and RNG state for the next call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::TableStore;
use crate::engine::config::EngineConfig;
use crate::engine::rng::Lcg;
use crate::engine::{FlowResult, GameFlow, PendingPenalty};
use crate::error::EngineError;
use crate::models::{
    DefensiveSelection, FlowEvent, KickoffKind, PatKind, PenaltyDecision, PlayCall, PlayReport,
};
use crate::state::GameState;
use crate::SCHEMA_VERSION;

pub mod error_codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const UNSUPPORTED_SCHEMA: &str = "UNSUPPORTED_SCHEMA";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const ILLEGAL_PLAY: &str = "ILLEGAL_PLAY";
    pub const PROTOCOL: &str = "PROTOCOL";
    pub const ENGINE: &str = "ENGINE";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn engine_err(err: EngineError) -> String {
    let code = match &err {
        EngineError::IllegalPlay { .. } => error_codes::ILLEGAL_PLAY,
        EngineError::Protocol(_) => error_codes::PROTOCOL,
        _ => error_codes::ENGINE,
    };
    err_code(code, err)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StepAction {
    Play {
        offense: PlayCall,
        defense: DefensiveSelection,
    },
    Kickoff {
        #[serde(default)]
        kind: KickoffKind,
    },
    Pat {
        #[serde(default)]
        kind: PatKind,
    },
    /// Answer the pending penalty offer. `choice_id` must match its id.
    #[serde(rename_all = "camelCase")]
    PenaltyDecision {
        decision: PenaltyDecision,
        choice_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRequest {
    pub schema_version: u8,
    pub state: GameState,
    pub rng_state: u32,
    #[serde(default)]
    pub pending: Option<PendingPenalty>,
    /// Falls back to `EngineConfig::default()`
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    pub schema_version: u8,
    pub state: GameState,
    pub rng_state: u32,
    /// Present while a penalty decision is outstanding; echo it back.
    pub pending: Option<PendingPenalty>,
    pub events: Vec<FlowEvent>,
    pub report: Option<PlayReport>,
}

/// Apply one action. Errors are `"CODE: message"` strings.
pub fn step_json(tables: &TableStore, request_json: &str) -> Result<String, String> {
    let request: StepRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;
    let response = step(tables, request)?;
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::INVALID_JSON, e))
}

pub fn step(tables: &TableStore, request: StepRequest) -> Result<StepResponse, String> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA,
            format!("expected {}, got {}", SCHEMA_VERSION, request.schema_version),
        ));
    }

    let StepRequest { state, rng_state, pending, config, action, .. } = request;
    let config = config.unwrap_or_default();
    config.validate().map_err(|e| err_code(error_codes::INVALID_CONFIG, e))?;

    let mut flow = GameFlow::resume(tables, config, Lcg::new(rng_state), pending);
    let result: FlowResult = match action {
        StepAction::Play { offense, defense } => flow.run_play(&state, &offense, &defense),
        StepAction::Kickoff { kind } => {
            let kicker = state.pending_kickoff.unwrap_or(state.possession);
            flow.perform_kickoff(&state, kind, kicker)
        }
        StepAction::Pat { kind } => flow.attempt_pat(&state, kind),
        StepAction::PenaltyDecision { decision, choice_id } => match flow.pending_choice() {
            Some(choice) => {
                let chosen = match decision {
                    PenaltyDecision::Accept => &choice.accepted,
                    PenaltyDecision::Decline => &choice.declined,
                };
                let mut meta = choice.meta.clone();
                meta.id = choice_id;
                flow.finalize_penalty_decision(chosen, decision, &meta)
            }
            None => Err(crate::error::ProtocolViolation::NoPendingChoice.into()),
        },
    }
    .map_err(engine_err)?;

    let (rng, pending) = flow.into_parts();
    debug!(rng_state = rng.state(), pending = pending.is_some(), "step applied");
    Ok(StepResponse {
        schema_version: SCHEMA_VERSION,
        state: result.state,
        rng_state: rng.state(),
        pending,
        events: result.events,
        report: result.report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ClockConfig;
    use crate::state::Side;
    use serde_json::{json, Value};

    fn tables() -> TableStore {
        TableStore::embedded().unwrap()
    }

    fn request(state: &GameState, rng_state: u32, action: Value) -> String {
        json!({
            "schema_version": SCHEMA_VERSION,
            "state": state,
            "rng_state": rng_state,
            "action": action,
        })
        .to_string()
    }

    fn slant_vs_cover_2() -> Value {
        json!({
            "action": "play",
            "offense": {"deckName": "West Coast", "playLabel": "Quick Slant"},
            "defense": {"label": "Cover 2"},
        })
    }

    #[test]
    fn test_step_resolves_snap() {
        let tables = tables();
        let state = GameState::drive(Side::Player, 25, 1, 10);
        let out = step_json(&tables, &request(&state, 1337, slant_vs_cover_2())).unwrap();
        let response: StepResponse = serde_json::from_str(&out).unwrap();

        assert_eq!(response.state.ball_on, 35);
        assert_eq!((response.state.down, response.state.to_go), (1, 10));
        assert_eq!(response.state.clock, 880);
        assert!(response.pending.is_none());
        assert!(matches!(response.events.last(), Some(FlowEvent::Hud { .. })));

        let mut expected = Lcg::new(1337);
        crate::engine::rng::RandomSource::next_unit(&mut expected);
        crate::engine::rng::RandomSource::next_unit(&mut expected);
        assert_eq!(response.rng_state, expected.state());
    }

    #[test]
    fn test_step_is_repeatable() {
        let tables = tables();
        let state = GameState::drive(Side::Ai, 60, 2, 4);
        let req = request(&state, 99, slant_vs_cover_2());
        assert_eq!(step_json(&tables, &req), step_json(&tables, &req));
    }

    #[test]
    fn test_kickoff_action() {
        let tables = tables();
        let state = GameState::new_game(Side::Ai, &ClockConfig::default());
        let out =
            step_json(&tables, &request(&state, 5, json!({"action": "kickoff"}))).unwrap();
        let response: StepResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.state.pending_kickoff, None);
        assert_eq!(response.state.possession, Side::Player);
    }

    #[test]
    fn test_rejects_schema_version() {
        let tables = tables();
        let state = GameState::drive(Side::Player, 25, 1, 10);
        let mut value: Value =
            serde_json::from_str(&request(&state, 1, slant_vs_cover_2())).unwrap();
        value["schema_version"] = json!(9);
        let err = step_json(&tables, &value.to_string()).unwrap_err();
        assert!(err.starts_with(error_codes::UNSUPPORTED_SCHEMA), "{}", err);
    }

    #[test]
    fn test_illegal_play_error_code() {
        let tables = tables();
        let state = GameState::drive(Side::Player, 25, 2, 10);
        let punt = json!({"action": "play", "offense": {"kind": "punt"}, "defense": {"label": "Blitz"}});
        let err = step_json(&tables, &request(&state, 1, punt)).unwrap_err();
        assert!(err.starts_with(error_codes::ILLEGAL_PLAY), "{}", err);
        assert!(err.contains("PUNT_NOT_4TH"));
    }

    #[test]
    fn test_decision_without_offer() {
        let tables = tables();
        let state = GameState::drive(Side::Player, 25, 1, 10);
        let action = json!({"action": "penaltyDecision", "decision": "accept", "choiceId": 1});
        let err = step_json(&tables, &request(&state, 1, action)).unwrap_err();
        assert!(err.starts_with(error_codes::PROTOCOL), "{}", err);
    }

    #[test]
    fn test_malformed_request() {
        let err = step_json(&tables(), "{\"schema_version\": 1").unwrap_err();
        assert!(err.starts_with(error_codes::INVALID_JSON));
    }

    #[test]
    fn test_penalty_round_trip_through_api() {
        let tables = tables();
        // Scan seeds for a snap that produces a penalty offer, then answer it.
        let state = GameState::drive(Side::Player, 40, 3, 5);
        let offered = (0..20_000u32).find_map(|seed| {
            let out = step_json(&tables, &request(&state, seed, slant_vs_cover_2())).ok()?;
            let response: StepResponse = serde_json::from_str(&out).ok()?;
            response.pending.is_some().then_some(response)
        });
        let offered = offered.expect("some seed rolls a penalty");
        assert_eq!(offered.state, state, "state is unchanged until the decision");
        assert!(offered.events.iter().any(|e| matches!(e, FlowEvent::ChoiceRequired { .. })));

        let pending = offered.pending.clone().unwrap();
        let body = json!({
            "schema_version": SCHEMA_VERSION,
            "state": offered.state,
            "rng_state": offered.rng_state,
            "pending": pending,
            "action": {"action": "penaltyDecision", "decision": "decline", "choiceId": pending.meta.id},
        });
        let out = step_json(&tables, &body.to_string()).unwrap();
        let response: StepResponse = serde_json::from_str(&out).unwrap();
        assert!(response.pending.is_none());
        assert_eq!(response.state, pending.declined.state);
    }
}
