//! Minimal legal-play caller for batch runs and CLI games.

use rand::seq::SliceRandom;

use super::PlayCaller;
use crate::data::DeckCatalog;
use crate::engine::config::RulesConfig;
use crate::engine::rng::Lcg;
use crate::engine::validator::{validate_offense_play, ValidationContext};
use crate::models::{DefensiveSelection, PenaltyChoice, PenaltyDecision, PlayCall};
use crate::state::{GameState, Side};

/// Longest fourth down the baseline goes for
const GO_FOR_IT_MAX_TO_GO: i32 = 2;
/// Fourth-down tries only happen inside this distance to the goal
const GO_FOR_IT_MAX_DISTANCE: i32 = 50;

/// Points are worth far more than yards when comparing penalty outcomes.
const POINT_WEIGHT: i64 = 1_000;

#[derive(Debug, Clone)]
pub struct BaselineCaller {
    rng: Lcg,
    rules: RulesConfig,
}

impl BaselineCaller {
    pub fn new(seed: u32) -> Self {
        Self::with_rules(seed, &RulesConfig::default())
    }

    pub fn with_rules(seed: u32, rules: &RulesConfig) -> Self {
        Self { rng: Lcg::new(seed), rules: rules.clone() }
    }

    fn scrimmage_call(&mut self, state: &GameState, catalog: &DeckCatalog) -> Option<PlayCall> {
        let ctx = ValidationContext::new(state, &catalog.white_sign_restrictions, &self.rules);
        let legal: Vec<(&str, &str)> = catalog
            .decks
            .iter()
            .flat_map(|(deck, cards)| cards.plays.iter().map(move |c| (deck.as_str(), c)))
            .filter(|(_, card)| card.card_type.is_scrimmage())
            .filter(|(_, card)| {
                validate_offense_play(&ctx, &card.label, Some(card.card_type)).is_empty()
            })
            .map(|(deck, card)| (deck, card.label.as_str()))
            .collect();
        legal.choose(&mut self.rng).map(|(deck, play)| PlayCall::snap(deck, play))
    }

    fn fourth_down_call(&mut self, state: &GameState, catalog: &DeckCatalog) -> PlayCall {
        let attempt = self.rules.fg_attempt_yards(state.distance_to_goal());
        if attempt <= self.rules.fg_max_attempt_yards {
            return PlayCall::field_goal(attempt);
        }
        if state.to_go <= GO_FOR_IT_MAX_TO_GO
            && state.distance_to_goal() <= GO_FOR_IT_MAX_DISTANCE
        {
            if let Some(call) = self.scrimmage_call(state, catalog) {
                return call;
            }
        }
        PlayCall::punt()
    }
}

/// Rough worth of `state` to `side`: score margin first, then field position
/// and down for whoever has the ball.
fn situation_value(state: &GameState, side: Side) -> i64 {
    let margin = state.score.margin(side) * POINT_WEIGHT;
    if state.awaiting_pat || state.pending_kickoff.is_some() {
        return margin;
    }
    let position = state.distance_to_own_goal() as i64
        - (state.down as i64 - 1) * 8
        - state.to_go as i64;
    if state.possession == side {
        margin + position
    } else {
        margin - position
    }
}

impl PlayCaller for BaselineCaller {
    fn call_offense(&mut self, state: &GameState, catalog: &DeckCatalog) -> PlayCall {
        if state.down == 4 {
            return self.fourth_down_call(state, catalog);
        }
        self.scrimmage_call(state, catalog).unwrap_or_else(PlayCall::punt)
    }

    fn call_defense(&mut self, _state: &GameState, catalog: &DeckCatalog) -> DefensiveSelection {
        let label = catalog.defenses.choose(&mut self.rng).map(String::as_str).unwrap_or_default();
        DefensiveSelection::new(label)
    }

    fn decide_penalty(&mut self, choice: &PenaltyChoice, side: Side) -> PenaltyDecision {
        if choice.meta.is_forced_override {
            return PenaltyDecision::Accept;
        }
        let accepted = situation_value(&choice.accepted, side);
        let declined = situation_value(&choice.declined, side);
        if accepted >= declined {
            PenaltyDecision::Accept
        } else {
            PenaltyDecision::Decline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableStore;
    use crate::models::{DiceRoll, OffensivePlaySelection, PenaltyChoiceMeta, PenaltyInfo, PenaltyOn};

    fn catalog() -> DeckCatalog {
        TableStore::embedded().unwrap().catalog().clone()
    }

    #[test]
    fn test_fourth_down_kicks_in_range() {
        let state = GameState::drive(Side::Player, 80, 4, 7);
        let call = BaselineCaller::new(1).call_offense(&state, &catalog());
        assert_eq!(call, PlayCall::field_goal(37));
    }

    #[test]
    fn test_fourth_and_long_punts() {
        let state = GameState::drive(Side::Player, 30, 4, 9);
        let call = BaselineCaller::new(1).call_offense(&state, &catalog());
        assert_eq!(call, PlayCall::punt());
    }

    #[test]
    fn test_fourth_and_short_goes_for_it() {
        let state = GameState::drive(Side::Ai, 48, 4, 1);
        let call = BaselineCaller::new(9).call_offense(&state, &catalog());
        assert!(matches!(call, PlayCall::Snap(_)), "got {:?}", call);
    }

    #[test]
    fn test_never_calls_restricted_play() {
        let catalog = catalog();
        let mut caller = BaselineCaller::new(77);
        let state = GameState::drive(Side::Player, 95, 1, 5);
        for _ in 0..200 {
            match caller.call_offense(&state, &catalog) {
                PlayCall::Snap(OffensivePlaySelection { play_label, .. }) => {
                    assert_ne!(play_label, "Screen Pass");
                }
                PlayCall::SpecialTeams(call) => panic!("unexpected {:?}", call),
            }
        }
    }

    #[test]
    fn test_defense_comes_from_catalog() {
        let catalog = catalog();
        let mut caller = BaselineCaller::new(5);
        let state = GameState::drive(Side::Player, 25, 1, 10);
        for _ in 0..50 {
            let defense = caller.call_defense(&state, &catalog);
            assert!(catalog.has_defense(&defense.label));
        }
    }

    #[test]
    fn test_penalty_choice_prefers_better_field() {
        let accepted = GameState::drive(Side::Player, 45, 1, 10);
        let declined = GameState::drive(Side::Player, 39, 4, 6);
        let choice = PenaltyChoice {
            accepted,
            declined,
            meta: PenaltyChoiceMeta {
                id: 1,
                penalty: PenaltyInfo {
                    on: PenaltyOn::Defense,
                    yards: 5,
                    first_down: true,
                    loss_of_down: false,
                    replay_down: false,
                    offset: false,
                    label: "Pass interference".to_string(),
                },
                label: "Pass interference".to_string(),
                is_forced_override: false,
                decided_by: Side::Player,
                dice: DiceRoll::new(7, 7),
                d10: 4,
            },
        };
        let mut caller = BaselineCaller::new(3);
        assert_eq!(caller.decide_penalty(&choice, Side::Player), PenaltyDecision::Accept);

        let swapped = PenaltyChoice {
            accepted: choice.declined.clone(),
            declined: choice.accepted.clone(),
            meta: choice.meta.clone(),
        };
        assert_eq!(caller.decide_penalty(&swapped, Side::Player), PenaltyDecision::Decline);
    }
}
