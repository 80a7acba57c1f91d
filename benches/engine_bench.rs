use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;

use seamguard::agent::CaptureAgent;
use seamguard::board::{load_layout, Direction, DistanceOracle, Layout, Side, Snapshot};
use seamguard::config::AgentConfig;
use seamguard::strategy::Strategy;

fn default_layout() -> Layout {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("layouts")
        .join("default_capture.lay");
    load_layout(&path).unwrap()
}

fn registered(strategy: Strategy, state: &Snapshot) -> CaptureAgent {
    let mut agent = CaptureAgent::from_config(0, Side::Left, &AgentConfig::new(strategy).with_seed(1));
    agent.register_initial_state(state);
    agent
}

fn bench_oracle_precompute(c: &mut Criterion) {
    let layout = default_layout();
    c.bench_function("oracle_precompute_default", |b| {
        b.iter(|| DistanceOracle::precompute(black_box(&layout.grid)))
    });
}

fn bench_oracle_lookup(c: &mut Criterion) {
    let layout = default_layout();
    let oracle = DistanceOracle::precompute(&layout.grid);
    let cells = oracle.cells().to_vec();
    c.bench_function("oracle_all_pairs_lookup", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for &a in &cells {
                for &z in &cells {
                    total += oracle.distance(black_box(a), black_box(z)) as u64;
                }
            }
            total
        })
    });
}

fn bench_extract_symmetric(c: &mut Criterion) {
    let state = Snapshot::from_layout(&default_layout());
    let agent = registered(Strategy::Symmetric, &state);
    c.bench_function("extract_symmetric_east", |b| {
        b.iter(|| agent.features(black_box(&state), Direction::East).unwrap())
    });
}

fn bench_choose_action(c: &mut Criterion) {
    let state = Snapshot::from_layout(&default_layout());
    for strategy in [Strategy::Symmetric, Strategy::Sentinel, Strategy::Ledger] {
        let mut agent = registered(strategy, &state);
        c.bench_function(&format!("choose_action_{}", strategy), |b| {
            b.iter(|| agent.choose_action(black_box(&state)).unwrap())
        });
    }
}

fn bench_snapshot_successor(c: &mut Criterion) {
    use seamguard::board::CaptureState;
    let state = Snapshot::from_layout(&default_layout());
    c.bench_function("snapshot_successor", |b| {
        b.iter(|| black_box(&state).successor(0, Direction::East))
    });
}

criterion_group!(
    benches,
    bench_oracle_precompute,
    bench_oracle_lookup,
    bench_extract_symmetric,
    bench_choose_action,
    bench_snapshot_successor,
);
criterion_main!(benches);
