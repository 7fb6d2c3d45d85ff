//! Game State
//!
//! `GameState` is a plain value: every resolver takes one and returns a new
//! one. Field positions are absolute yard lines measured from the player's
//! (home) goal line, so the player drives toward 100 and the AI toward 0.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::config::ClockConfig;

pub const FIELD_MIN: i32 = 0;
pub const FIELD_MAX: i32 = 100;
pub const QUARTER_SECONDS: u32 = 900;
pub const TWO_MINUTE_SECONDS: u32 = 120;
pub const FIRST_DOWN_YARDS: i32 = 10;
/// Ball spot for a try, measured from the goal line being attacked.
pub const PAT_SPOT_YARDS: i32 = 2;
/// Kicking team's own yard line for kickoffs.
pub const KICKOFF_SPOT_YARDS: i32 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Sign of forward movement on the absolute field.
    #[inline]
    pub fn direction(self) -> i32 {
        match self {
            Side::Player => 1,
            Side::Ai => -1,
        }
    }

    /// Absolute yard line of this side's own goal.
    #[inline]
    pub fn own_goal(self) -> i32 {
        match self {
            Side::Player => FIELD_MIN,
            Side::Ai => FIELD_MAX,
        }
    }

    /// Absolute yard line of the goal this side attacks.
    #[inline]
    pub fn target_goal(self) -> i32 {
        self.opponent().own_goal()
    }

    /// Convert a yard line in this side's frame ("own 25") to absolute.
    #[inline]
    pub fn absolute(self, own_yard_line: i32) -> i32 {
        self.own_goal() + self.direction() * own_yard_line
    }

    /// True when an unclamped spot lies in or beyond the goal this side attacks.
    #[inline]
    pub fn crossed_goal(self, raw_spot: i32) -> bool {
        (raw_spot - self.target_goal()) * self.direction() >= 0
    }

    /// True when an unclamped spot lies in or behind this side's own goal line.
    #[inline]
    pub fn in_own_end_zone(self, raw_spot: i32) -> bool {
        (raw_spot - self.own_goal()) * self.direction() <= 0
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub ai: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        }
    }

    pub fn add(&mut self, side: Side, points: u32) {
        match side {
            Side::Player => self.player += points,
            Side::Ai => self.ai += points,
        }
    }

    /// Points of `side` minus points of its opponent.
    pub fn margin(&self, side: Side) -> i64 {
        self.get(side) as i64 - self.get(side.opponent()) as i64
    }
}

#[inline]
pub fn clamp_field(raw: i32) -> i32 {
    raw.clamp(FIELD_MIN, FIELD_MAX)
}

/// Runtime game state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 1..=4
    pub quarter: u8,
    /// Seconds left in the quarter
    pub clock: u32,
    /// 1..=4
    pub down: u8,
    pub to_go: i32,
    /// Absolute yard line, 0..=100
    pub ball_on: i32,
    pub possession: Side,
    #[serde(rename = "awaitingPAT")]
    pub awaiting_pat: bool,
    pub game_over: bool,
    pub score: Score,
    /// Side that must kick off before the next snap
    #[serde(default)]
    pub pending_kickoff: Option<Side>,
    /// Side that kicked to open the game; the other side opens the second half
    pub opening_kicker: Side,
    /// A defensive foul on the period's last play extended it by one down
    #[serde(default)]
    pub untimed_down: bool,
}

impl GameState {
    /// Fresh game waiting for the opening kickoff, with a full quarter of
    /// the configured length on the clock.
    pub fn new_game(opening_kicker: Side, clock: &ClockConfig) -> Self {
        Self {
            quarter: 1,
            clock: clock.quarter_seconds,
            down: 1,
            to_go: FIRST_DOWN_YARDS,
            ball_on: opening_kicker.absolute(KICKOFF_SPOT_YARDS),
            possession: opening_kicker,
            awaiting_pat: false,
            game_over: false,
            score: Score::default(),
            pending_kickoff: Some(opening_kicker),
            opening_kicker,
            untimed_down: false,
        }
    }

    /// Mid-drive state at an absolute spot, first quarter with a full
    /// default-length clock. Use `with_clock` for other clock settings.
    pub fn drive(possession: Side, ball_on: i32, down: u8, to_go: i32) -> Self {
        Self {
            quarter: 1,
            clock: QUARTER_SECONDS,
            down,
            to_go,
            ball_on: clamp_field(ball_on),
            possession,
            awaiting_pat: false,
            game_over: false,
            score: Score::default(),
            pending_kickoff: None,
            opening_kicker: possession.opponent(),
            untimed_down: false,
        }
    }

    pub fn with_clock(mut self, quarter: u8, clock: u32) -> Self {
        self.quarter = quarter;
        self.clock = clock;
        self
    }

    pub fn defense(&self) -> Side {
        self.possession.opponent()
    }

    /// Yards between the ball and the goal the offense attacks.
    pub fn distance_to_goal(&self) -> i32 {
        (self.possession.target_goal() - self.ball_on) * self.possession.direction()
    }

    /// Yards between the ball and the offense's own goal line.
    pub fn distance_to_own_goal(&self) -> i32 {
        (self.ball_on - self.possession.own_goal()) * self.possession.direction()
    }

    pub fn is_goal_to_go(&self) -> bool {
        self.to_go >= self.distance_to_goal()
    }

    /// Late in a half; consumed by callers for clock management.
    pub fn is_two_minute(&self) -> bool {
        matches!(self.quarter, 2 | 4) && self.clock <= TWO_MINUTE_SECONDS
    }

    /// Yards needed for a fresh set of downs from the current spot.
    pub fn first_down_to_go(&self) -> i32 {
        FIRST_DOWN_YARDS.min(self.distance_to_goal()).max(1)
    }

    /// Start a new series for `side` at the current spot.
    pub(crate) fn new_series(&mut self, side: Side) {
        self.possession = side;
        self.down = 1;
        self.to_go = self.first_down_to_go();
    }

    /// Run `seconds` off the clock. Never goes below zero.
    pub(crate) fn run_clock(&mut self, seconds: u32) {
        self.clock = self.clock.saturating_sub(seconds);
    }

    /// Field position label from the offense's view ("own 25", "opp 40", "50").
    pub fn field_label(&self) -> String {
        let own = self.distance_to_own_goal();
        match own.cmp(&50) {
            std::cmp::Ordering::Less => format!("own {}", own),
            std::cmp::Ordering::Equal => "50".to_string(),
            std::cmp::Ordering::Greater => format!("opp {}", 100 - own),
        }
    }

    /// "3rd & 5" style label.
    pub fn down_label(&self) -> String {
        let ordinal = match self.down {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            _ => "4th",
        };
        if self.is_goal_to_go() {
            format!("{} & goal", ordinal)
        } else {
            format!("{} & {}", ordinal, self.to_go)
        }
    }

    pub fn clock_label(&self) -> String {
        format!("Q{} {}:{:02}", self.quarter, self.clock / 60, self.clock % 60)
    }

    /// SHA-256 of the canonical JSON form, for golden-master comparisons.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_frames() {
        assert_eq!(Side::Player.absolute(25), 25);
        assert_eq!(Side::Ai.absolute(25), 75);
        assert!(Side::Player.crossed_goal(100));
        assert!(Side::Player.crossed_goal(104));
        assert!(!Side::Player.crossed_goal(99));
        assert!(Side::Ai.crossed_goal(0));
        assert!(Side::Ai.crossed_goal(-3));
        assert!(Side::Player.in_own_end_zone(0));
        assert!(Side::Ai.in_own_end_zone(101));
        assert!(!Side::Ai.in_own_end_zone(99));
    }

    #[test]
    fn test_distance_to_goal_by_possession() {
        let player = GameState::drive(Side::Player, 25, 1, 10);
        assert_eq!(player.distance_to_goal(), 75);
        assert_eq!(player.distance_to_own_goal(), 25);
        assert_eq!(player.field_label(), "own 25");

        let ai = GameState::drive(Side::Ai, 25, 1, 10);
        assert_eq!(ai.distance_to_goal(), 25);
        assert_eq!(ai.field_label(), "opp 25");
    }

    #[test]
    fn test_goal_to_go_first_down_distance() {
        let state = GameState::drive(Side::Player, 94, 1, 6);
        assert_eq!(state.first_down_to_go(), 6);
        assert!(state.is_goal_to_go());
        assert_eq!(state.down_label(), "1st & goal");
    }

    #[test]
    fn test_two_minute_flag() {
        let state = GameState::drive(Side::Player, 50, 1, 10);
        assert!(!state.clone().with_clock(1, 100).is_two_minute());
        assert!(state.clone().with_clock(2, 120).is_two_minute());
        assert!(!state.clone().with_clock(4, 121).is_two_minute());
        assert!(state.with_clock(4, 5).is_two_minute());
    }

    #[test]
    fn test_new_game_waits_for_kickoff() {
        let state = GameState::new_game(Side::Ai, &ClockConfig::default());
        assert_eq!(state.pending_kickoff, Some(Side::Ai));
        assert_eq!(state.ball_on, 65);
        assert_eq!(state.clock, QUARTER_SECONDS);
    }

    #[test]
    fn test_new_game_uses_configured_quarter_length() {
        let clock = ClockConfig { quarter_seconds: 600 };
        let state = GameState::new_game(Side::Player, &clock);
        assert_eq!((state.quarter, state.clock), (1, 600));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(GameState::new_game(Side::Player, &ClockConfig::default())).unwrap();
        assert!(json.get("awaitingPAT").is_some());
        assert!(json.get("ballOn").is_some());
        assert!(json.get("toGo").is_some());
        assert_eq!(json["possession"], "player");
    }

    #[test]
    fn test_fingerprint_stable() {
        let a = GameState::drive(Side::Player, 25, 1, 10);
        let b = GameState::drive(Side::Player, 25, 1, 10);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), GameState::drive(Side::Player, 26, 1, 10).fingerprint());
    }
}
