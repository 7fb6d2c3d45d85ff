//! Benchmarks for snap resolution and whole-game simulation

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gd_core::sim::{run_game, simulate_batch, BaselineCaller};
use gd_core::{
    DefensiveSelection, EngineConfig, GameFlow, GameState, OffensivePlaySelection, Side,
    TableStore,
};

fn bench_resolve_snap(c: &mut Criterion) {
    let tables = TableStore::embedded().expect("embedded tables load");
    let state = GameState::drive(Side::Player, 25, 2, 7);
    let offense = OffensivePlaySelection::new("West Coast", "Quick Slant");
    let defense = DefensiveSelection::new("Cover 2");
    let mut flow = GameFlow::new(&tables, EngineConfig::default(), 42);

    c.bench_function("resolve_snap", |b| {
        b.iter(|| {
            let result = flow.resolve_snap(black_box(&state), &offense, &defense);
            if let Some(choice) = flow.pending_choice() {
                let _ = flow.finalize_penalty_decision(
                    &choice.declined,
                    gd_core::PenaltyDecision::Decline,
                    &choice.meta,
                );
            }
            black_box(result)
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let tables = TableStore::embedded().expect("embedded tables load");

    c.bench_function("full_game_baseline", |b| {
        b.iter(|| {
            let config = EngineConfig::default();
            let kickoff = GameState::new_game(Side::Ai, &config.clock);
            let mut flow = GameFlow::new(&tables, config, black_box(7));
            let mut player = BaselineCaller::new(1);
            let mut ai = BaselineCaller::new(2);
            black_box(run_game(&mut flow, kickoff, &mut player, &mut ai))
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let tables = TableStore::embedded().expect("embedded tables load");
    let config = EngineConfig::default();
    let seeds: Vec<u32> = (0..64).collect();

    c.bench_function("simulate_batch_64", |b| {
        b.iter(|| black_box(simulate_batch(&tables, &config, &seeds)))
    });
}

criterion_group!(benches, bench_resolve_snap, bench_full_game, bench_batch);
criterion_main!(benches);
