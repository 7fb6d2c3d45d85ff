//! Clock runoff and period transitions.

use tracing::info;

use crate::data::{DiceOutcome, TimeEvent, TimeKeeping, TurnoverKind};
use crate::engine::config::ClockConfig;
use crate::models::FlowEvent;
use crate::state::{GameState, FIRST_DOWN_YARDS, KICKOFF_SPOT_YARDS};

/// Seconds a scrimmage outcome takes off the clock.
///
/// Turnovers use their time-keeping event; out of bounds stops the clock at
/// the "10" bucket or less; incompletions use `incomplete`; everything else
/// runs the authored bucket.
pub fn snap_runoff(outcome: &DiceOutcome, tk: &TimeKeeping) -> u32 {
    if let Some(turnover) = &outcome.turnover {
        return match turnover.kind {
            TurnoverKind::Int => tk.seconds(TimeEvent::Interception),
            TurnoverKind::Fum => tk.seconds(TimeEvent::Fumble),
        };
    }
    if outcome.oob {
        return tk.seconds(TimeEvent::OutOfBounds).min(10);
    }
    if outcome.has_tag(DiceOutcome::TAG_INCOMPLETE) {
        return tk.seconds(TimeEvent::Incomplete);
    }
    outcome.clock.seconds()
}

/// Runoff by yardage class, for outcomes that carry no authored bucket.
pub fn classified_runoff(yards: i32, tk: &TimeKeeping) -> u32 {
    let event = match yards {
        y if y < 0 => TimeEvent::Loss,
        y if y < 20 => TimeEvent::Gain0to20,
        _ => TimeEvent::Gain20plus,
    };
    tk.seconds(event)
}

/// Advance the period if the clock has expired. Runs after the action's
/// result is applied, so a play that expires the clock still counts.
///
/// Held while a try is pending or an untimed down has been granted.
pub fn close_out_period(state: &mut GameState, clock: &ClockConfig, events: &mut Vec<FlowEvent>) {
    if state.game_over || state.clock > 0 || state.awaiting_pat || state.untimed_down {
        return;
    }

    let ended = state.quarter;
    events.push(FlowEvent::EndOfQuarter { quarter: ended });
    info!(quarter = ended, score = ?state.score, "end of quarter");

    match ended {
        2 => {
            events.push(FlowEvent::Halftime);
            let kicker = state.opening_kicker.opponent();
            state.quarter = 3;
            state.clock = clock.quarter_seconds;
            state.possession = kicker;
            state.ball_on = kicker.absolute(KICKOFF_SPOT_YARDS);
            state.down = 1;
            state.to_go = FIRST_DOWN_YARDS;
            state.pending_kickoff = Some(kicker);
        }
        q if q >= 4 => {
            state.game_over = true;
            state.pending_kickoff = None;
            events.push(FlowEvent::Final { score: state.score });
            info!(player = state.score.player, ai = state.score.ai, "final");
        }
        q => {
            state.quarter = q + 1;
            state.clock = clock.quarter_seconds;
        }
    }
}
