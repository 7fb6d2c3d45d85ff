//! Penalty doubles: offering both branches and committing the chosen one.

use tracing::info;

use super::{Branch, FlowResult, GameFlow, PendingPenalty};
use crate::data::DiceOutcome;
use crate::engine::clock::snap_runoff;
use crate::engine::penalty::{enforce, PenaltyResolution};
use crate::engine::rng::RandomSource;
use crate::error::{ProtocolViolation, Result};
use crate::models::{
    ChoiceKind, DiceRoll, FlowEvent, PenaltyChoiceMeta, PenaltyDecision, PenaltyOn, PlayReport,
};
use crate::state::GameState;

impl<R: RandomSource> GameFlow<'_, R> {
    /// Build the declined (base play stands) and accepted (foul enforced)
    /// branches, park them as the pending choice and return the pre-snap
    /// state with a `choice-required` event.
    pub(super) fn offer_penalty(
        &mut self,
        pre: &GameState,
        dice: DiceRoll,
        base: &DiceOutcome,
        resolution: PenaltyResolution,
        report: PlayReport,
        header: String,
    ) -> FlowResult {
        let tk = self.tables.timekeeping();
        let runoff = snap_runoff(base, tk);
        let mut declined = self.apply_outcome(pre, base, runoff, report.clone());
        declined.logs.insert(0, header.clone());

        let penalty = &resolution.penalty;
        let enforcement =
            enforce(pre, &declined.state, &declined.report, &resolution, tk, &self.config.rules);
        let signed = match penalty.on {
            PenaltyOn::Defense => enforcement.yards,
            PenaltyOn::Offense => -enforcement.yards,
        };

        let mut accepted_report = if enforcement.play_nullified {
            let mut r = report;
            r.runoff = tk.penalty;
            r.yards = signed;
            r
        } else {
            let mut r = declined.report.clone();
            r.yards += signed;
            r
        };
        accepted_report.penalty = Some(penalty.clone());
        accepted_report.first_down = enforcement.first_down || accepted_report.first_down;
        accepted_report.turnover_on_downs = enforcement.turnover_on_downs;

        let on = match penalty.on {
            PenaltyOn::Offense => pre.possession,
            PenaltyOn::Defense => pre.defense(),
        };
        let mut accepted = Branch::new(enforcement.state, accepted_report);
        accepted.log(header.clone());
        accepted.log(format!(
            "{} on {}, {} yards{}",
            penalty.label,
            on.name(),
            enforcement.yards,
            if enforcement.play_nullified { ", play nullified" } else { "" }
        ));
        if enforcement.turnover_on_downs {
            accepted.log(format!("Loss of down, {} takes over", pre.defense().name()));
        }

        let meta = PenaltyChoiceMeta {
            id: self.next_choice_id,
            penalty: penalty.clone(),
            label: penalty.label.clone(),
            is_forced_override: resolution.is_forced_override,
            decided_by: on.opponent(),
            dice,
            d10: resolution.d10,
        };
        self.next_choice_id += 1;

        let pending = PendingPenalty { meta: meta.clone(), pre_snap: pre.clone(), accepted, declined };
        let events = vec![
            FlowEvent::log(header),
            FlowEvent::log(format!(
                "Flag: {} on {}. {} to accept or decline",
                penalty.label,
                on.name(),
                meta.decided_by.name()
            )),
            FlowEvent::ChoiceRequired {
                choice: ChoiceKind::PenaltyAcceptDecline,
                data: pending.choice(),
            },
        ];
        info!(id = meta.id, label = %meta.label, d10 = meta.d10, "penalty offered");
        self.pending = Some(pending);

        FlowResult { state: pre.clone(), events, report: None }
    }

    /// Commit one branch of the pending penalty.
    ///
    /// `chosen` must equal the branch named by `decision`, and `meta` must be
    /// the offer being answered. Each offer is finalized exactly once; a
    /// second call fails with `NoPendingChoice`.
    pub fn finalize_penalty_decision(
        &mut self,
        chosen: &GameState,
        decision: PenaltyDecision,
        meta: &PenaltyChoiceMeta,
    ) -> Result<FlowResult> {
        let pending = self.pending.as_ref().ok_or(ProtocolViolation::NoPendingChoice)?;
        if meta.id != pending.meta.id {
            return Err(ProtocolViolation::StaleChoice { found: meta.id, expected: pending.meta.id }
                .into());
        }
        let candidate = match decision {
            PenaltyDecision::Accept => &pending.accepted,
            PenaltyDecision::Decline => &pending.declined,
        };
        if candidate.state != *chosen {
            return Err(ProtocolViolation::ChoiceMismatch {
                decision: decision.as_str().to_string(),
            }
            .into());
        }

        let pending = self.pending.take().ok_or(ProtocolViolation::NoPendingChoice)?;
        let decided_by = pending.meta.decided_by;
        let mut branch = match decision {
            PenaltyDecision::Accept => pending.accepted,
            PenaltyDecision::Decline => pending.declined,
        };
        branch.log(format!("{} {}s the penalty", decided_by.name(), decision.as_str()));
        info!(id = meta.id, decision = decision.as_str(), "penalty finalized");
        Ok(self.commit(branch))
    }
}
