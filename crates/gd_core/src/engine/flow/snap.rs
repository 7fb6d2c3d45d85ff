//! Scrimmage snaps: validation, dice, and applying the outcome.

use tracing::{debug, warn};

use super::{Branch, FlowResult, GameFlow};
use crate::data::{CardType, DiceOutcome, DoublesResult, ReturnTo, TurnoverKind};
use crate::engine::clock::{classified_runoff, snap_runoff};
use crate::engine::dice::{degraded_outcome, roll_snap, DiceResult};
use crate::engine::rng::RandomSource;
use crate::engine::validator::{validate_offense_play, Issue, IssueCode, ValidationContext};
use crate::error::{EngineError, Result};
use crate::models::{DefensiveSelection, OffensivePlaySelection, PlayKind, PlayReport, ScoreKind};
use crate::state::{clamp_field, GameState};

/// Own yard line after a touchback on a change of possession or punt.
const TOUCHBACK_YARD_LINE: i32 = 20;
/// Own yard line of the free kick after a safety.
const SAFETY_KICK_YARD_LINE: i32 = 20;

impl<R: RandomSource> GameFlow<'_, R> {
    /// Validate and resolve one offensive call against one defensive call.
    ///
    /// Illegal calls return `EngineError::IllegalPlay` without touching the
    /// RNG. Punt and field-goal cards are routed to their kicking resolvers.
    /// A penalty double returns the pre-snap state with a `choice-required`
    /// event; nothing is committed until `finalize_penalty_decision`.
    pub fn resolve_snap(
        &mut self,
        state: &GameState,
        offense: &OffensivePlaySelection,
        defense: &DefensiveSelection,
    ) -> Result<FlowResult> {
        self.guard_scrimmage(state)?;

        let tables = self.tables;
        let catalog = tables.catalog();
        let card_type = catalog.card_type(&offense.deck_name, &offense.play_label);
        let ctx = ValidationContext::new(state, &catalog.white_sign_restrictions, &self.config.rules);
        let mut issues = validate_offense_play(&ctx, &offense.play_label, card_type);
        if !catalog.has_defense(&defense.label) {
            issues.push(Issue::new(
                IssueCode::UnknownLabel,
                format!("unknown defense '{}'", defense.label),
            ));
        }
        if !issues.is_empty() {
            return Err(EngineError::IllegalPlay { issues });
        }

        match card_type {
            Some(CardType::Punt) => return self.punt(state),
            Some(CardType::FieldGoal) => {
                return self.attempt_field_goal(state, ctx.fg_attempt_yards(), state.possession)
            }
            _ => {}
        }

        let header = format!(
            "{} {} at {}: {} vs {}",
            state.clock_label(),
            state.down_label(),
            state.field_label(),
            offense.play_label,
            defense.label
        );

        let Some(table) = tables.matchup(&offense.deck_name, &offense.play_label, &defense.label)
        else {
            if !self.config.rules.degraded_mode {
                return Err(EngineError::MissingMatchup {
                    deck: offense.deck_name.clone(),
                    play: offense.play_label.clone(),
                    defense: defense.label.clone(),
                });
            }
            warn!(
                deck = %offense.deck_name,
                play = %offense.play_label,
                defense = %defense.label,
                "no matchup table; resolving in degraded mode"
            );
            let outcome = degraded_outcome(&mut self.rng);
            let mut report = PlayReport::new(PlayKind::Snap);
            report.degraded = true;
            let runoff = classified_runoff(outcome.yards, tables.timekeeping());
            let mut branch = self.apply_outcome(state, &outcome, runoff, report);
            branch.logs.insert(0, format!("{} (degraded)", header));
            return Ok(self.commit(branch));
        };

        let roll = roll_snap(&mut self.rng, table, tables, &self.config.rules)?;
        let mut report = PlayReport::new(PlayKind::Snap);
        report.dice = Some(roll.dice);
        report.explosive = roll.explosive;
        let header = format!("{}, rolls {}-{}", header, roll.dice.d1, roll.dice.d2);
        debug!(d1 = roll.dice.d1, d2 = roll.dice.d2, matchup = %table.key, "snap rolled");

        match roll.result {
            DiceResult::Play(outcome) => {
                let runoff = snap_runoff(&outcome, tables.timekeeping());
                let mut branch = self.apply_outcome(state, &outcome, runoff, report);
                branch.logs.insert(0, header);
                Ok(self.commit(branch))
            }
            DiceResult::Doubles(result) => {
                let branch = self.apply_doubles_touchdown(state, result, report, header);
                Ok(self.commit(branch))
            }
            DiceResult::Penalty { base, penalty } => {
                Ok(self.offer_penalty(state, roll.dice, &base, penalty, report, header))
            }
        }
    }

    fn apply_doubles_touchdown(
        &self,
        pre: &GameState,
        result: DoublesResult,
        report: PlayReport,
        header: String,
    ) -> Branch {
        let tk = self.tables.timekeeping();
        let mut state = pre.clone();
        state.untimed_down = false;
        let mut branch = Branch::new(state, report);
        branch.log(header);

        let (scorer, runoff) = match result {
            DoublesResult::OffensiveTouchdown => {
                branch.report.yards = pre.distance_to_goal();
                branch.report.tags.push("OFF_TD".to_string());
                branch.log(format!("Boxcars! {} goes the distance", pre.possession.name()));
                (pre.possession, tk.gain20plus)
            }
            DoublesResult::DefensiveTouchdown => {
                branch.report.turnover = Some(TurnoverKind::Fum);
                branch.report.tags.push("DEF_TD".to_string());
                branch.log(format!("Snake eyes! {} scoops and scores", pre.defense().name()));
                (pre.defense(), tk.fumble)
            }
        };
        branch.state.run_clock(runoff);
        branch.report.runoff = runoff;
        branch.touchdown(scorer);
        branch
    }

    /// Apply a table outcome to `pre`. No RNG draws; the clock runs before
    /// the result is placed so an expiring play still counts.
    pub(super) fn apply_outcome(
        &self,
        pre: &GameState,
        outcome: &DiceOutcome,
        runoff: u32,
        mut report: PlayReport,
    ) -> Branch {
        let mut state = pre.clone();
        state.untimed_down = false;
        state.run_clock(runoff);
        report.runoff = runoff;
        report.yards = outcome.yards;
        report.tags = outcome.tags.clone();
        let mut branch = Branch::new(state, report);

        let offense = pre.possession;
        let los = pre.ball_on;

        if let Some(turnover) = &outcome.turnover {
            let spot = match turnover.return_to {
                Some(ReturnTo::LineOfScrimmage) => los,
                None => clamp_field(los + offense.direction() * outcome.yards),
            };
            let new_offense = offense.opponent();
            let raw = spot + new_offense.direction() * turnover.return_yards.unwrap_or(0);
            branch.report.turnover = Some(turnover.kind);
            let what = match turnover.kind {
                TurnoverKind::Int => "Intercepted",
                TurnoverKind::Fum => "Fumble lost",
            };

            if new_offense.crossed_goal(raw) {
                branch.state.ball_on = clamp_field(raw);
                branch.log(format!("{}, returned for a touchdown by {}", what, new_offense.name()));
                branch.touchdown(new_offense);
            } else if new_offense.in_own_end_zone(raw) {
                branch.state.ball_on = new_offense.absolute(TOUCHBACK_YARD_LINE);
                branch.state.new_series(new_offense);
                branch.log(format!("{} in the end zone, touchback", what));
            } else {
                branch.state.ball_on = clamp_field(raw);
                branch.state.new_series(new_offense);
                branch.log(format!("{}! {} takes over at the {}", what, new_offense.name(), branch.state.field_label()));
            }
            return branch;
        }

        let raw = los + offense.direction() * outcome.yards;
        if offense.crossed_goal(raw) {
            branch.report.yards = pre.distance_to_goal();
            branch.state.ball_on = clamp_field(raw);
            branch.log(format!("Touchdown {}! {} yards", offense.name(), branch.report.yards));
            branch.touchdown(offense);
            return branch;
        }
        if offense.in_own_end_zone(raw) {
            branch.report.yards = -pre.distance_to_own_goal();
            branch.log(format!("Tackled in the end zone, safety for {}", offense.opponent().name()));
            branch.score(offense.opponent(), ScoreKind::Safety);
            branch.kick_off_next(offense, SAFETY_KICK_YARD_LINE);
            return branch;
        }

        branch.state.ball_on = raw;
        let gained = outcome.yards;
        if outcome.has_tag(DiceOutcome::TAG_INCOMPLETE) {
            branch.log("Incomplete");
        } else if outcome.oob {
            branch.log(format!("{:+} yards, out of bounds", gained));
        } else {
            branch.log(format!("{:+} yards", gained));
        }

        if gained >= pre.to_go {
            branch.state.new_series(offense);
            branch.report.first_down = true;
            branch.log(format!("First down at the {}", branch.state.field_label()));
        } else if pre.down >= 4 {
            branch.state.new_series(offense.opponent());
            branch.report.turnover_on_downs = true;
            branch.log(format!("Turnover on downs, {} takes over", offense.opponent().name()));
        } else {
            branch.state.down = pre.down + 1;
            branch.state.to_go = pre.to_go - gained;
        }
        branch
    }
}
