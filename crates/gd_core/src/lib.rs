//! # gd_core - Deterministic 2d20 Football Drive Engine
//!
//! This library resolves American-football snaps with a 2d20 dice engine
//! layered under a possession/down/clock state machine.
//!
//! ## Features
//! - 100% deterministic resolution (same seed + same calls = same states)
//! - Validated matchup, penalty and time-keeping tables behind one `TableStore`
//! - Closed event protocol (`FlowEvent`) for UI, AI and batch consumers
//! - JSON API for browser integration

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod sim;
pub mod state;

// Re-export main API functions
pub use api::{step_json, StepAction, StepRequest, StepResponse};
pub use error::{EngineError, ProtocolViolation, Result, SchemaError};

// Re-export engine entry points
pub use engine::config::EngineConfig;
pub use engine::rng::{Lcg, RandomSource};
pub use engine::validator::{validate_offense_play, Issue, IssueCode, ValidationContext};
pub use engine::{FlowResult, GameFlow, PendingPenalty};

// Re-export table types
pub use data::{
    CardType, DeckCatalog, DiceOutcome, MatchupKey, MatchupTable, PenaltyTable, TableStore,
    TimeKeeping,
};

// Re-export state and protocol types
pub use models::{
    DefensiveSelection, FlowEvent, KickoffKind, OffensivePlaySelection, PatKind, PenaltyChoice,
    PenaltyChoiceMeta, PenaltyDecision, PlayCall, PlayReport, ScoreEvent, ScoreKind,
};
pub use state::{GameState, Score, Side};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ClockConfig;
    use crate::sim::{run_game, BaselineCaller};

    fn play_full_game(seed: u32) -> sim::GameRecord {
        let tables = TableStore::embedded().unwrap();
        let mut flow = GameFlow::new(&tables, EngineConfig::default(), seed);
        let mut home = BaselineCaller::new(seed ^ 0xA5A5);
        let mut away = BaselineCaller::new(seed ^ 0x5A5A);
        let kickoff = GameState::new_game(Side::Ai, &ClockConfig::default());
        run_game(&mut flow, kickoff, &mut home, &mut away).unwrap()
    }

    #[test]
    fn test_full_game_reaches_final() {
        let record = play_full_game(42);
        assert!(record.final_state.game_over);
        assert!(matches!(record.events.last(), Some(FlowEvent::Hud { .. })));
        assert!(record.events.iter().any(|e| matches!(e, FlowEvent::Final { .. })));
        assert!(record.events.iter().any(|e| matches!(e, FlowEvent::Halftime)));
    }

    #[test]
    fn test_determinism() {
        let first = play_full_game(999);
        let second = play_full_game(999);
        assert_eq!(first.final_state, second.final_state);
        assert_eq!(first.events, second.events, "Same seed should produce same events");
    }

    #[test]
    fn test_event_stream_determinism_sha256() {
        let a = play_full_game(1337);
        let b = play_full_game(1337);
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.digest.len(), 64);

        let other = play_full_game(1338);
        assert_ne!(a.digest, other.digest, "Different seeds should diverge");
    }
}
