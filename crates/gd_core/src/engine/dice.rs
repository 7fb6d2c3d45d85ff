//! 2d20 dice resolver.

use tracing::trace;

use super::penalty::{resolve_penalty, PenaltyResolution};
use super::rng::RandomSource;
use crate::data::{ClockBucket, DiceOutcome, DoublesResult, MatchupTable, TableStore};
use crate::engine::config::RulesConfig;
use crate::error::{EngineError, Result};
use crate::models::DiceRoll;

pub const DIE_SIDES: u32 = 20;

pub const TAG_DEGRADED: &str = "degraded";

#[derive(Debug, Clone, PartialEq)]
pub enum DiceResult {
    /// Table outcome for a non-double sum
    Play(DiceOutcome),
    /// Doubles 2..19: the base outcome plus the penalty it carries
    Penalty { base: DiceOutcome, penalty: PenaltyResolution },
    Doubles(DoublesResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapRoll {
    pub dice: DiceRoll,
    pub result: DiceResult,
    /// Commentary only
    pub explosive: bool,
}

pub fn roll_2d20<R: RandomSource + ?Sized>(rng: &mut R) -> DiceRoll {
    let d1 = rng.roll(DIE_SIDES) as u8;
    let d2 = rng.roll(DIE_SIDES) as u8;
    DiceRoll::new(d1, d2)
}

/// Roll and classify one snap against `table`. Penalty doubles also roll the
/// d10 table named by the matchup.
pub fn roll_snap<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &MatchupTable,
    tables: &TableStore,
    rules: &RulesConfig,
) -> Result<SnapRoll> {
    let dice = roll_2d20(rng);
    let sum = dice.sum();
    trace!(d1 = dice.d1, d2 = dice.d2, sum, matchup = %table.key, "2d20");

    let result = if dice.is_doubles() {
        match dice.d1 {
            1 => DiceResult::Doubles(table.doubles.snake_eyes),
            20 => DiceResult::Doubles(table.doubles.boxcars),
            _ => {
                let base = table.lookup(sum)?.clone();
                let penalty_table = tables.penalty_table(&table.doubles.penalty_table_ref)?;
                let penalty = resolve_penalty(penalty_table, rng, rules)?;
                DiceResult::Penalty { base, penalty }
            }
        }
    } else {
        // Two faces 1..=20 that differ always sum to 3..=39
        if !(crate::data::matchup::MIN_SUM..=crate::data::matchup::MAX_SUM).contains(&sum) {
            return Err(EngineError::DiceDomain { d1: dice.d1, d2: dice.d2 });
        }
        DiceResult::Play(table.lookup(sum)?.clone())
    };

    Ok(SnapRoll { dice, result, explosive: table.is_explosive_sum(sum) })
}

/// Stand-in result when no matchup table exists: a coin flip between a short
/// gain and a short loss.
pub fn degraded_outcome<R: RandomSource + ?Sized>(rng: &mut R) -> DiceOutcome {
    let yards = if rng.next_unit() < 0.5 {
        rng.roll(10) as i32
    } else {
        -(rng.roll(4) as i32 - 1)
    };
    let mut outcome = DiceOutcome::gain(yards, ClockBucket::Twenty);
    outcome.tags.push(TAG_DEGRADED.to_string());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matchup::fixtures::matchup_json;
    use crate::data::penalty::fixtures::penalty_json;
    use crate::data::{DeckCatalog, PenaltyTable, TimeKeeping};
    use crate::engine::rng::scripted::ScriptedRng;
    use crate::engine::rng::Lcg;
    use proptest::prelude::*;

    fn fixture() -> (MatchupTable, TableStore) {
        let table = MatchupTable::from_json(
            "m.json",
            &matchup_json("West Coast", "Quick Slant", "Cover 2").to_string(),
        )
        .unwrap();
        let mut store = TableStore::new(DeckCatalog::default(), TimeKeeping::default());
        store.insert_penalty_table(
            PenaltyTable::from_json("p.json", &penalty_json("standard").to_string()).unwrap(),
        );
        (table, store)
    }

    fn roll(draws: Vec<f64>) -> SnapRoll {
        let (table, store) = fixture();
        let mut rng = ScriptedRng::new(&draws);
        let roll = roll_snap(&mut rng, &table, &store, &RulesConfig::default()).unwrap();
        assert_eq!(rng.remaining(), 0, "unexpected leftover draws");
        roll
    }

    #[test]
    fn test_snake_eyes_is_defensive_td() {
        let roll = roll(ScriptedRng::dice(1, 1));
        assert_eq!(roll.result, DiceResult::Doubles(DoublesResult::DefensiveTouchdown));
    }

    #[test]
    fn test_boxcars_is_offensive_td() {
        let roll = roll(ScriptedRng::dice(20, 20));
        assert_eq!(roll.result, DiceResult::Doubles(DoublesResult::OffensiveTouchdown));
    }

    #[test]
    fn test_other_doubles_route_through_penalty_table() {
        for face in 2..=19u32 {
            let mut draws = ScriptedRng::dice(face, face);
            draws.push(ScriptedRng::face(7, 10)); // d10 → Defensive Holding
            let roll = roll(draws);
            match roll.result {
                DiceResult::Penalty { base, penalty } => {
                    assert_eq!(base.yards, (face * 2) as i32 - 20);
                    assert_eq!(penalty.d10, 7);
                    assert_eq!(penalty.penalty.label, "Defensive Holding");
                }
                other => panic!("face {}: expected penalty, got {:?}", face, other),
            }
        }
    }

    #[test]
    fn test_non_double_reads_entry() {
        let roll = roll(ScriptedRng::dice(6, 8));
        assert_eq!(roll.dice.sum(), 14);
        assert_eq!(roll.result, DiceResult::Play(DiceOutcome::gain(-6, ClockBucket::Twenty)));
        assert!(!roll.explosive);

        let roll = self::roll(ScriptedRng::dice(19, 17));
        assert!(roll.explosive);
    }

    #[test]
    fn test_table_gap_is_fatal() {
        let (mut table, store) = fixture();
        table.entries.remove(&14);
        let mut rng = ScriptedRng::new(&ScriptedRng::dice(6, 8));
        let err = roll_snap(&mut rng, &table, &store, &RulesConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::TableGap { sum: 14, .. }));
    }

    #[test]
    fn test_missing_penalty_table() {
        let (mut table, store) = fixture();
        table.doubles.penalty_table_ref = "nope".into();
        let mut rng = ScriptedRng::new(&ScriptedRng::dice(5, 5));
        let err = roll_snap(&mut rng, &table, &store, &RulesConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::MissingPenaltyTable(ref name) if name == "nope"));
    }

    proptest! {
        #[test]
        fn prop_every_seed_resolves(seed in any::<u32>()) {
            let (table, store) = fixture();
            let mut rng = Lcg::new(seed);
            for _ in 0..32 {
                prop_assert!(roll_snap(&mut rng, &table, &store, &RulesConfig::default()).is_ok());
            }
        }

        #[test]
        fn prop_degraded_is_short(seed in any::<u32>()) {
            let outcome = degraded_outcome(&mut Lcg::new(seed));
            prop_assert!((-3..=10).contains(&outcome.yards));
            prop_assert!(outcome.has_tag(TAG_DEGRADED));
        }
    }
}
