use criterion::{criterion_group, criterion_main, Criterion};
use flexport_core::prelude::*;
use flexport_logic::config::{GameMode, SimConfig};
use std::hint::black_box;

fn running_engine(mode: GameMode) -> GameEngine {
    let mut engine = GameEngine::new(SimConfig::seeded(7));
    engine.start_game(mode);
    engine.set_game_speed(10.0).expect("speed in range");
    // Let rivals buy ships and take contracts so the tick has real work
    for _ in 0..300 {
        engine.update(0.1);
    }
    engine
}

fn benchmark_tick(c: &mut Criterion) {
    c.bench_function("update_quick_mode", |b| {
        let mut engine = running_engine(GameMode::Quick);
        b.iter(|| {
            engine.update(black_box(1.0 / 60.0));
            black_box(engine.state.game_time)
        });
    });

    c.bench_function("update_campaign_mode", |b| {
        let mut engine = running_engine(GameMode::Campaign);
        b.iter(|| {
            engine.update(black_box(1.0 / 60.0));
            black_box(engine.state.game_time)
        });
    });

    c.bench_function("snapshot_to_json", |b| {
        let engine = running_engine(GameMode::Campaign);
        b.iter(|| {
            let json = engine.snapshot().to_json().expect("snapshot serializes");
            black_box(json.len())
        });
    });
}

criterion_group!(benches, benchmark_tick);
criterion_main!(benches);
