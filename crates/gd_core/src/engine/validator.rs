//! Pure legality checks for an offensive call. Never mutates state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::CardType;
use crate::engine::config::RulesConfig;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    #[serde(rename = "PUNT_NOT_4TH")]
    PuntNot4th,
    WhiteSignRestricted,
    FgOutOfRange,
    UnknownLabel,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::PuntNot4th => "PUNT_NOT_4TH",
            IssueCode::WhiteSignRestricted => "WHITE_SIGN_RESTRICTED",
            IssueCode::FgOutOfRange => "FG_OUT_OF_RANGE",
            IssueCode::UnknownLabel => "UNKNOWN_LABEL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Situation the validator needs; borrowed from state, catalog and config.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub down: u8,
    pub distance_to_goal: i32,
    pub white_sign_restrictions: &'a BTreeMap<String, i32>,
    pub fg_snap_offset: i32,
    pub fg_max_attempt_yards: i32,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        state: &GameState,
        white_sign_restrictions: &'a BTreeMap<String, i32>,
        rules: &RulesConfig,
    ) -> Self {
        Self {
            down: state.down,
            distance_to_goal: state.distance_to_goal(),
            white_sign_restrictions,
            fg_snap_offset: rules.fg_snap_offset,
            fg_max_attempt_yards: rules.fg_max_attempt_yards,
        }
    }

    pub fn fg_attempt_yards(&self) -> i32 {
        self.distance_to_goal + self.fg_snap_offset
    }
}

/// `card_type` is `None` when the label is not in the named deck.
pub fn validate_offense_play(
    ctx: &ValidationContext<'_>,
    play_label: &str,
    card_type: Option<CardType>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let card_type = match card_type {
        Some(card_type) if !play_label.trim().is_empty() => card_type,
        _ => {
            issues.push(Issue::new(
                IssueCode::UnknownLabel,
                format!("unknown play '{}'", play_label),
            ));
            return issues;
        }
    };

    match card_type {
        CardType::Punt if ctx.down != 4 => {
            issues.push(Issue::new(
                IssueCode::PuntNot4th,
                format!("punt called on down {}", ctx.down),
            ));
        }
        CardType::Run | CardType::Pass => {
            if let Some(&threshold) = ctx.white_sign_restrictions.get(play_label) {
                if ctx.distance_to_goal <= threshold {
                    issues.push(Issue::new(
                        IssueCode::WhiteSignRestricted,
                        format!(
                            "'{}' not allowed within {} yards of the goal ({} to go)",
                            play_label, threshold, ctx.distance_to_goal
                        ),
                    ));
                }
            }
        }
        CardType::FieldGoal => {
            if let Some(issue) = check_field_goal_range(ctx, ctx.fg_attempt_yards()) {
                issues.push(issue);
            }
        }
        CardType::Punt => {}
    }

    issues
}

/// Check for an explicit `{kind: fieldGoal, attemptYards}` call: the stated
/// distance must be the kick from the current spot, and within range.
pub fn check_field_goal_call(ctx: &ValidationContext<'_>, attempt_yards: i32) -> Option<Issue> {
    let from_spot = ctx.fg_attempt_yards();
    if attempt_yards != from_spot {
        return Some(Issue::new(
            IssueCode::FgOutOfRange,
            format!(
                "{}-yard attempt called, but the kick from this spot is {} yards",
                attempt_yards, from_spot
            ),
        ));
    }
    check_field_goal_range(ctx, attempt_yards)
}

/// Range check on an attempt length.
pub fn check_field_goal_range(ctx: &ValidationContext<'_>, attempt_yards: i32) -> Option<Issue> {
    (attempt_yards > ctx.fg_max_attempt_yards).then(|| {
        Issue::new(
            IssueCode::FgOutOfRange,
            format!("{}-yard attempt exceeds {}", attempt_yards, ctx.fg_max_attempt_yards),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restrictions() -> BTreeMap<String, i32> {
        BTreeMap::from([("Screen Pass".to_string(), 10)])
    }

    fn ctx(restrictions: &BTreeMap<String, i32>, down: u8, distance: i32) -> ValidationContext<'_> {
        ValidationContext {
            down,
            distance_to_goal: distance,
            white_sign_restrictions: restrictions,
            fg_snap_offset: 17,
            fg_max_attempt_yards: 45,
        }
    }

    fn codes(issues: &[Issue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_punt_only_on_fourth() {
        let r = restrictions();
        assert_eq!(
            codes(&validate_offense_play(&ctx(&r, 3, 60), "Punt", Some(CardType::Punt))),
            vec![IssueCode::PuntNot4th]
        );
        assert!(validate_offense_play(&ctx(&r, 4, 60), "Punt", Some(CardType::Punt)).is_empty());
    }

    #[test]
    fn test_white_sign_threshold_is_inclusive() {
        let r = restrictions();
        let at = validate_offense_play(&ctx(&r, 1, 10), "Screen Pass", Some(CardType::Pass));
        assert_eq!(codes(&at), vec![IssueCode::WhiteSignRestricted]);
        assert!(validate_offense_play(&ctx(&r, 1, 11), "Screen Pass", Some(CardType::Pass)).is_empty());
        assert!(validate_offense_play(&ctx(&r, 1, 3), "Quick Slant", Some(CardType::Pass)).is_empty());
    }

    #[test]
    fn test_field_goal_range() {
        let r = restrictions();
        // 28 + 17 = 45: in range
        assert!(validate_offense_play(&ctx(&r, 4, 28), "Field Goal", Some(CardType::FieldGoal)).is_empty());
        // 29 + 17 = 46: out of range
        assert_eq!(
            codes(&validate_offense_play(&ctx(&r, 4, 29), "Field Goal", Some(CardType::FieldGoal))),
            vec![IssueCode::FgOutOfRange]
        );
        assert!(check_field_goal_range(&ctx(&r, 4, 10), 46).is_some());
    }

    #[test]
    fn test_field_goal_call_must_match_spot() {
        let r = restrictions();
        assert!(check_field_goal_call(&ctx(&r, 4, 20), 37).is_none());
        assert_eq!(check_field_goal_call(&ctx(&r, 4, 20), 30).map(|i| i.code), Some(IssueCode::FgOutOfRange));
        assert_eq!(check_field_goal_call(&ctx(&r, 4, 80), 20).map(|i| i.code), Some(IssueCode::FgOutOfRange));
        assert!(check_field_goal_call(&ctx(&r, 4, 80), 97).is_some());
    }

    #[test]
    fn test_unknown_label() {
        let r = restrictions();
        assert_eq!(
            codes(&validate_offense_play(&ctx(&r, 1, 50), "Hail Mary", None)),
            vec![IssueCode::UnknownLabel]
        );
        assert_eq!(
            codes(&validate_offense_play(&ctx(&r, 1, 50), "", Some(CardType::Run))),
            vec![IssueCode::UnknownLabel]
        );
    }

    #[test]
    fn test_issue_codes_serialize_like_as_str() {
        for code in [
            IssueCode::PuntNot4th,
            IssueCode::WhiteSignRestricted,
            IssueCode::FgOutOfRange,
            IssueCode::UnknownLabel,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), serde_json::json!(code.as_str()));
        }
    }
}
