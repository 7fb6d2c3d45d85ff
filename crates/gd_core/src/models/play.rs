use serde::{Deserialize, Serialize};

/// `{deckName, playLabel}` as returned by an offensive play caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffensivePlaySelection {
    pub deck_name: String,
    pub play_label: String,
}

impl OffensivePlaySelection {
    pub fn new(deck_name: &str, play_label: &str) -> Self {
        Self { deck_name: deck_name.to_string(), play_label: play_label.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefensiveSelection {
    pub label: String,
}

impl DefensiveSelection {
    pub fn new(label: &str) -> Self {
        Self { label: label.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpecialTeamsCall {
    FieldGoal {
        #[serde(rename = "attemptYards")]
        attempt_yards: i32,
    },
    Punt,
}

/// Any of the three shapes an offensive caller may return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayCall {
    SpecialTeams(SpecialTeamsCall),
    Snap(OffensivePlaySelection),
}

impl PlayCall {
    pub fn snap(deck_name: &str, play_label: &str) -> Self {
        PlayCall::Snap(OffensivePlaySelection::new(deck_name, play_label))
    }

    pub fn field_goal(attempt_yards: i32) -> Self {
        PlayCall::SpecialTeams(SpecialTeamsCall::FieldGoal { attempt_yards })
    }

    pub fn punt() -> Self {
        PlayCall::SpecialTeams(SpecialTeamsCall::Punt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KickoffKind {
    #[default]
    Normal,
    Onside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatKind {
    #[default]
    Kick,
    TwoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyDecision {
    Accept,
    Decline,
}

impl PenaltyDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            PenaltyDecision::Accept => "accept",
            PenaltyDecision::Decline => "decline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_play_call_shapes() {
        let snap: PlayCall =
            serde_json::from_value(json!({"deckName": "West Coast", "playLabel": "Quick Slant"}))
                .unwrap();
        assert_eq!(snap, PlayCall::snap("West Coast", "Quick Slant"));

        let fg: PlayCall =
            serde_json::from_value(json!({"kind": "fieldGoal", "attemptYards": 38})).unwrap();
        assert_eq!(fg, PlayCall::field_goal(38));

        let punt: PlayCall = serde_json::from_value(json!({"kind": "punt"})).unwrap();
        assert_eq!(punt, PlayCall::punt());
    }

    #[test]
    fn test_play_call_serializes_flat() {
        let value = serde_json::to_value(PlayCall::field_goal(40)).unwrap();
        assert_eq!(value, json!({"kind": "fieldGoal", "attemptYards": 40}));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(PatKind::TwoPoint).unwrap(), json!("twoPoint"));
        assert_eq!(serde_json::to_value(KickoffKind::Onside).unwrap(), json!("onside"));
        assert_eq!(serde_json::to_value(PenaltyDecision::Decline).unwrap(), json!("decline"));
    }
}
