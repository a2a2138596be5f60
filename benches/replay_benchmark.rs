//! Performance benchmarks for replay execution
//!
//! Measures how fast the execution controller replays a fixed-length run,
//! with and without a state-hash trace, and how expensive state hashing is on
//! its own. Build with `--no-default-features` to compile out per-tick logging.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use replay_harness::game::{
    compute_state_hash, ConfigBuilder, ExecutionContext, ExecutionController, IdleActionSource,
    ReplayActionSource, RunLogger, SimulationConfig, VerbosityLevel,
};
use replay_harness::loader::{BuiltinAssets, WorldInitializer};
use replay_harness::replay::{ActionEvent, ActionKind};
use replay_harness::supervisor::CancelSignal;
use std::sync::Arc;

const BENCH_TICKS: u64 = 3_000;

fn config(seed: u64) -> Arc<SimulationConfig> {
    let assets = BuiltinAssets::new();
    let raw = serde_json::json!({
        "version": 1,
        "seed": seed,
        "colonies": 2,
        "creep_bases": 4,
        "creep_difficulty": 2,
        "max_ticks": BENCH_TICKS,
    });
    let config = ConfigBuilder::new(&assets)
        .build(raw.as_object().expect("object literal"))
        .expect("benchmark config is valid");
    Arc::new(config)
}

fn silent_context() -> ExecutionContext {
    ExecutionContext::headless(RunLogger::with_verbosity(VerbosityLevel::Silent))
}

fn scripted_actions() -> Vec<ActionEvent> {
    (0..50)
        .map(|i| {
            let kind = if i % 2 == 0 {
                ActionKind::SetPriorities {
                    gather: 5,
                    build: 2,
                    attack: 3,
                }
            } else {
                ActionKind::BuildDrone
            };
            ActionEvent::new(i * 40, (i % 2) as u32, kind)
        })
        .collect()
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.throughput(Throughput::Elements(BENCH_TICKS));

    for seed in [42u64, 7] {
        let config = config(seed);

        group.bench_with_input(BenchmarkId::new("idle", seed), &config, |b, config| {
            b.iter(|| {
                let mut ctl = ExecutionController::new(
                    silent_context(),
                    Arc::clone(config),
                    Box::new(IdleActionSource),
                    1,
                );
                black_box(ctl.run(&CancelSignal::never()))
            })
        });

        let actions: Arc<[ActionEvent]> = scripted_actions().into();
        group.bench_with_input(BenchmarkId::new("scripted", seed), &config, |b, config| {
            b.iter(|| {
                let mut ctl = ExecutionController::new(
                    silent_context(),
                    Arc::clone(config),
                    Box::new(ReplayActionSource::new(Arc::clone(&actions))),
                    1,
                );
                black_box(ctl.run(&CancelSignal::never()))
            })
        });

        group.bench_with_input(BenchmarkId::new("traced", seed), &config, |b, config| {
            b.iter(|| {
                let ctx = silent_context().with_trace_every(Some(1));
                let mut ctl =
                    ExecutionController::new(ctx, Arc::clone(config), Box::new(IdleActionSource), 1);
                black_box(ctl.run(&CancelSignal::never()))
            })
        });
    }

    group.finish();
}

fn bench_state_hash(c: &mut Criterion) {
    let config = config(42);
    let state = WorldInitializer::new(&config)
        .init_state()
        .expect("world builds");

    c.bench_function("state_hash", |b| {
        b.iter(|| black_box(compute_state_hash(black_box(&state))))
    });
}

criterion_group!(benches, bench_replay, bench_state_hash);
criterion_main!(benches);
