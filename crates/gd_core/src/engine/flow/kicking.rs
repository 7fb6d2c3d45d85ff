//! Kickoffs, punts, field goals and tries.

use tracing::debug;

use super::{Branch, FlowResult, GameFlow};
use crate::engine::rng::RandomSource;
use crate::engine::validator::{check_field_goal_call, Issue, IssueCode, ValidationContext};
use crate::error::{EngineError, ProtocolViolation, Result};
use crate::models::{KickoffKind, PatKind, PlayKind, PlayReport, ScoreKind};
use crate::state::{GameState, Side, KICKOFF_SPOT_YARDS};

impl<R: RandomSource> GameFlow<'_, R> {
    /// Kick off to start a half or after a score.
    ///
    /// Normal kicks roll a d20 on the return chart: low rolls are touchbacks,
    /// a natural 20 is a breakaway. Onside kicks are recovered by the kicking
    /// team with `onside_recovery_chance`; either way the ball is spotted at
    /// the kicking team's `onside_spot_yard_line`.
    pub fn perform_kickoff(
        &mut self,
        state: &GameState,
        kind: KickoffKind,
        kicking_side: Side,
    ) -> Result<FlowResult> {
        self.guard_idle(state)?;
        match state.pending_kickoff {
            None => return Err(ProtocolViolation::NoKickoffPending.into()),
            Some(expected) if expected != kicking_side => {
                return Err(ProtocolViolation::WrongKicker { expected, found: kicking_side }.into())
            }
            Some(_) => {}
        }

        let kicking = &self.config.kicking;
        let runoff = self.tables.timekeeping().kickoff;
        let receiver = kicking_side.opponent();

        let mut state = state.clone();
        state.pending_kickoff = None;
        state.untimed_down = false;
        state.run_clock(runoff);
        let mut report = PlayReport::new(PlayKind::Kickoff);
        report.runoff = runoff;
        let mut branch = Branch::new(state, report);

        match kind {
            KickoffKind::Normal => {
                let roll = self.rng.roll(20);
                let own_yard_line = if roll <= kicking.touchback_max_roll {
                    branch.log(format!("{} kicks off, touchback", kicking_side.name()));
                    kicking.touchback_yard_line
                } else if roll == 20 {
                    branch.log(format!("{} breaks the return to midfield", receiver.name()));
                    kicking.breakaway_yard_line
                } else {
                    let pips = (roll - kicking.touchback_max_roll - 1) as i32;
                    let spot = kicking.return_base_yard_line + pips * kicking.return_yards_per_pip;
                    branch.log(format!("{} returns the kick to the {}", receiver.name(), spot));
                    spot
                };
                branch.report.yards = own_yard_line;
                branch.state.ball_on = receiver.absolute(own_yard_line);
                branch.state.new_series(receiver);
            }
            KickoffKind::Onside => {
                let recovered = self.rng.next_unit() < kicking.onside_recovery_chance;
                branch.state.ball_on = kicking_side.absolute(kicking.onside_spot_yard_line);
                if recovered {
                    branch.state.new_series(kicking_side);
                    branch.log(format!("Onside kick recovered by {}", kicking_side.name()));
                } else {
                    branch.state.new_series(receiver);
                    branch.log(format!("Onside kick recovered by {}", receiver.name()));
                }
                branch.report.tags.push("onside".to_string());
            }
        }

        debug!(kicker = kicking_side.name(), ?kind, ball_on = branch.state.ball_on, "kickoff");
        Ok(self.commit(branch))
    }

    /// Fourth-down punt. Net distance is drawn uniformly from the configured
    /// range; a punt into the end zone is a touchback.
    pub fn punt(&mut self, state: &GameState) -> Result<FlowResult> {
        self.guard_scrimmage(state)?;
        if state.down != 4 {
            return Err(EngineError::IllegalPlay {
                issues: vec![Issue::new(
                    IssueCode::PuntNot4th,
                    format!("punt called on down {}", state.down),
                )],
            });
        }

        let kicking = &self.config.kicking;
        let runoff = self.tables.timekeeping().punt;
        let kicker = state.possession;
        let receiver = kicker.opponent();

        let span = (kicking.punt_net_max - kicking.punt_net_min + 1) as u32;
        let net = kicking.punt_net_min + self.rng.roll(span) as i32 - 1;
        let raw = state.ball_on + kicker.direction() * net;

        let mut next = state.clone();
        next.untimed_down = false;
        next.run_clock(runoff);
        let mut report = PlayReport::new(PlayKind::Punt);
        report.runoff = runoff;
        report.yards = net;
        let mut branch = Branch::new(next, report);

        if kicker.crossed_goal(raw) {
            branch.state.ball_on = receiver.absolute(kicking.punt_touchback_yard_line);
            branch.log(format!("{} punts {} yards into the end zone, touchback", kicker.name(), net));
        } else {
            branch.state.ball_on = raw;
            branch.log(format!("{} punts {} yards", kicker.name(), net));
        }
        branch.state.new_series(receiver);
        Ok(self.commit(branch))
    }

    /// Field-goal attempt by the team in possession. Success chance comes
    /// from the configured distance bands. A make scores 3 and the kicker
    /// kicks off; a miss gives the defense the ball at the spot.
    pub fn attempt_field_goal(
        &mut self,
        state: &GameState,
        attempt_yards: i32,
        kicking_side: Side,
    ) -> Result<FlowResult> {
        self.guard_scrimmage(state)?;
        if kicking_side != state.possession {
            return Err(ProtocolViolation::NotInPossession { found: kicking_side }.into());
        }
        let tables = self.tables;
        let ctx = ValidationContext::new(
            state,
            &tables.catalog().white_sign_restrictions,
            &self.config.rules,
        );
        if let Some(issue) = check_field_goal_call(&ctx, attempt_yards) {
            return Err(EngineError::IllegalPlay { issues: vec![issue] });
        }

        let chance = self.config.kicking.field_goal_chance(attempt_yards);
        let made = self.rng.next_unit() < chance;
        let runoff = tables.timekeeping().fieldgoal;

        let mut next = state.clone();
        next.untimed_down = false;
        next.run_clock(runoff);
        let mut report = PlayReport::new(PlayKind::FieldGoal);
        report.runoff = runoff;
        report.yards = attempt_yards;
        let mut branch = Branch::new(next, report);

        if made {
            branch.log(format!("{}-yard field goal is good", attempt_yards));
            branch.score(kicking_side, ScoreKind::FieldGoal);
            branch.kick_off_next(kicking_side, KICKOFF_SPOT_YARDS);
        } else {
            branch.log(format!("{}-yard field goal is no good", attempt_yards));
            branch.state.new_series(kicking_side.opponent());
        }
        debug!(attempt_yards, chance, made, "field goal");
        Ok(self.commit(branch))
    }

    /// The try after a touchdown: a kick for 1 or a two-point play. The
    /// scoring team then kicks off.
    pub fn attempt_pat(&mut self, state: &GameState, kind: PatKind) -> Result<FlowResult> {
        self.guard_idle(state)?;
        if !state.awaiting_pat {
            return Err(ProtocolViolation::NoPatPending.into());
        }

        let kicking = &self.config.kicking;
        let (chance, score_kind, play_kind) = match kind {
            PatKind::Kick => (kicking.pat_kick_success, ScoreKind::ExtraPoint, PlayKind::ExtraPoint),
            PatKind::TwoPoint => (kicking.two_point_success, ScoreKind::TwoPoint, PlayKind::TwoPoint),
        };
        let good = self.rng.next_unit() < chance;
        let runoff = self.tables.timekeeping().extra_point;
        let scorer = state.possession;

        let mut next = state.clone();
        next.run_clock(runoff);
        let mut report = PlayReport::new(play_kind);
        report.runoff = runoff;
        let mut branch = Branch::new(next, report);

        if good {
            branch.log(match kind {
                PatKind::Kick => "Extra point is good",
                PatKind::TwoPoint => "Two-point conversion is good",
            });
            branch.score(scorer, score_kind);
        } else {
            branch.log("Try fails");
        }
        branch.kick_off_next(scorer, KICKOFF_SPOT_YARDS);
        Ok(self.commit(branch))
    }
}
