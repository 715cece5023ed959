//! Benchmarks for lattice-reactivity
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_reactivity::{Object, Runtime};
use serde_json::json;

// =============================================================================
// PROXY BENCHMARKS
// =============================================================================

fn bench_untracked_get(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.reactive(json!({ "count": 0 })).unwrap();
    c.bench_function("untracked_get", |b| b.iter(|| black_box(state.get("count"))));
}

fn bench_set_without_dependents(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.reactive(json!({ "count": 0 })).unwrap();
    c.bench_function("set_without_dependents", |b| {
        b.iter(|| state.set("count", black_box(1)).unwrap())
    });
}

fn bench_nested_get(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.reactive(json!({ "nested": { "x": 1 } })).unwrap();
    c.bench_function("nested_get", |b| b.iter(|| black_box(state.get("nested"))));
}

fn bench_wrap(c: &mut Criterion) {
    let runtime = Runtime::new();
    c.bench_function("wrap_fresh_object", |b| {
        b.iter(|| black_box(runtime.reactive(Object::new()).unwrap()))
    });
}

// =============================================================================
// EFFECT BENCHMARKS
// =============================================================================

fn bench_effect_create(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.reactive(json!({ "count": 0 })).unwrap();
    c.bench_function("effect_create", |b| {
        b.iter(|| {
            let state = state.clone();
            black_box(
                runtime
                    .effect(move || {
                        state.get("count");
                    })
                    .unwrap(),
            )
        })
    });
}

fn bench_trigger_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger_fanout");
    for dependents in [1usize, 10, 100] {
        let runtime = Runtime::new();
        let state = runtime.reactive(json!({ "count": 0 })).unwrap();
        for _ in 0..dependents {
            let state = state.clone();
            runtime
                .effect(move || {
                    state.get("count");
                })
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(dependents), &dependents, |b, _| {
            b.iter(|| state.set("count", black_box(1)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    proxy_benches,
    bench_untracked_get,
    bench_set_without_dependents,
    bench_nested_get,
    bench_wrap,
);

criterion_group!(effect_benches, bench_effect_create, bench_trigger_fanout);

criterion_main!(proxy_benches, effect_benches);
