//! d10 penalty resolver and enforcement.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::data::{PenaltyEntry, PenaltySide, PenaltyTable, TimeKeeping};
use crate::engine::config::RulesConfig;
use crate::error::Result;
use crate::models::{PenaltyInfo, PenaltyOn, PlayReport};
use crate::state::{clamp_field, GameState};

pub const PENALTY_DIE_SIDES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyResolution {
    pub penalty: PenaltyInfo,
    pub is_forced_override: bool,
    pub table_entry: PenaltyEntry,
    pub d10: u8,
}

/// Roll the d10 and build the foul. An absent slot is fatal.
pub fn resolve_penalty<R: RandomSource + ?Sized>(
    table: &PenaltyTable,
    rng: &mut R,
    rules: &RulesConfig,
) -> Result<PenaltyResolution> {
    let d10 = rng.roll(PENALTY_DIE_SIDES) as u8;
    let entry = table.entry(d10)?;

    let penalty = match entry.side {
        PenaltySide::Offset => PenaltyInfo {
            on: if rng.next_unit() < 0.5 { PenaltyOn::Offense } else { PenaltyOn::Defense },
            yards: rules.offset_penalty_yards,
            first_down: false,
            loss_of_down: false,
            replay_down: true,
            offset: true,
            label: entry.label.clone(),
        },
        side => PenaltyInfo {
            on: if side == PenaltySide::Offense { PenaltyOn::Offense } else { PenaltyOn::Defense },
            yards: entry.yards.unwrap_or(rules.default_penalty_yards),
            first_down: entry.auto_first_down,
            loss_of_down: entry.loss_of_down,
            replay_down: entry.replay_down,
            offset: false,
            label: entry.label.clone(),
        },
    };

    Ok(PenaltyResolution {
        penalty,
        is_forced_override: entry.override_play_result,
        table_entry: entry.clone(),
        d10,
    })
}

/// Result of enforcing an accepted foul.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforcement {
    pub state: GameState,
    /// Yards actually walked off after the half-distance cap
    pub yards: i32,
    pub first_down: bool,
    pub turnover_on_downs: bool,
    /// The snap's own result was thrown out
    pub play_nullified: bool,
}

/// Build the accepted-penalty state.
///
/// The play is nullified (enforced from the previous spot, down replayed or
/// lost) when the foul overrides the result, replays the down, or when the
/// base play scored or changed possession. Otherwise the yardage is added on
/// top of the base result.
pub fn enforce(
    pre_snap: &GameState,
    base: &GameState,
    base_report: &PlayReport,
    resolution: &PenaltyResolution,
    tk: &TimeKeeping,
    rules: &RulesConfig,
) -> Enforcement {
    let penalty = &resolution.penalty;
    let play_nullified = resolution.is_forced_override
        || penalty.replay_down
        || base_report.score.is_some()
        || base_report.changed_possession()
        || base.possession != pre_snap.possession
        || base.awaiting_pat
        || base.pending_kickoff.is_some();

    let mut state = if play_nullified {
        let mut s = pre_snap.clone();
        s.untimed_down = false;
        s.run_clock(tk.penalty);
        s
    } else {
        base.clone()
    };

    let offense = state.possession;
    let mut first_down = false;
    let mut turnover_on_downs = false;
    let yards;

    match penalty.on {
        PenaltyOn::Defense => {
            yards = capped(penalty.yards, state.distance_to_goal(), rules);
            state.ball_on = clamp_field(state.ball_on + offense.direction() * yards);
            state.to_go -= yards;
            // Offsetting fouls re-spot the ball but never move the chains
            if !penalty.offset && (penalty.first_down || state.to_go <= 0) {
                state.new_series(offense);
                first_down = true;
            }
        }
        PenaltyOn::Offense => {
            yards = capped(penalty.yards, state.distance_to_own_goal(), rules);
            state.ball_on = clamp_field(state.ball_on - offense.direction() * yards);
            state.to_go += yards;
            if penalty.loss_of_down {
                if state.down >= 4 {
                    state.new_series(offense.opponent());
                    turnover_on_downs = true;
                } else {
                    state.down += 1;
                }
            }
        }
    }
    if !first_down && !turnover_on_downs {
        state.to_go = state.to_go.min(state.distance_to_goal()).max(1);
    }

    // A defensive foul on the last play of a half extends it
    if penalty.on == PenaltyOn::Defense && state.clock == 0 && matches!(state.quarter, 2 | 4) {
        state.untimed_down = true;
    }

    Enforcement { state, yards, first_down, turnover_on_downs, play_nullified }
}

/// Half-the-distance cap against the goal line the ball is moving toward.
fn capped(yards: i32, distance: i32, rules: &RulesConfig) -> i32 {
    if rules.half_distance && yards > distance / 2 {
        distance / 2
    } else {
        yards
    }
}
