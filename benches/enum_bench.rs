//! Enumeration benchmarks using Criterion.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the core loop: hashcons interning, refinement
//! of a frontier candidate, and whole enumeration sessions over the demo
//! grammars.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use sygen::enumerator::enumerate_concrete;
use sygen::expr::{ExprAttr, ExprId, ExprStore};
use sygen::grammar::Grammar;

fn andnot_grammar(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("not", nt, ExprAttr::NONE);
    let and = store.fun2("and", nt, nt, ExprAttr::NONE);

    let mut grammar = Grammar::new();
    grammar.add(nt, not);
    grammar.add(nt, and);
    for i in 0..vars {
        let var = store.fun0(&format!("x{}", i));
        grammar.add(nt, var);
    }
    (grammar, nt)
}

fn ltl_grammar(store: &ExprStore, vars: usize) -> (Grammar, ExprId) {
    let nt = store.fun0("_N");
    let not = store.fun1("!", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let and = store.fun2("&", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);
    let or = store.fun2("|", nt, nt, ExprAttr::IDEMPOTENT | ExprAttr::COMMUTATIVE);
    let globally = store.fun1("G", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let eventually = store.fun1("F", nt, ExprAttr::NO_DOUBLE_APPLICATION);
    let next = store.fun1("X", nt, ExprAttr::NONE);
    let until = store.fun2("U", nt, nt, ExprAttr::IDEMPOTENT);

    let mut grammar = Grammar::new();
    for replacement in [not, and, or, globally, eventually, next, until] {
        grammar.add(nt, replacement);
    }
    for i in 0..vars {
        let var = store.fun0(&format!("x{}", i));
        grammar.add(nt, var);
    }
    (grammar, nt)
}

/// Build a tall not-tower: not(not(...not(x0)...)).
fn build_tower(n: u32, store: &ExprStore) -> ExprId {
    let mut result = store.fun0("x0");
    for _ in 0..n {
        result = store.fun1("not", result, ExprAttr::NONE);
    }
    result
}

fn bench_interning(c: &mut Criterion) {
    let mut group = c.benchmark_group("interning");
    for depth in [16u32, 64, 256] {
        group.bench_with_input(BenchmarkId::new("tower", depth), &depth, |b, &depth| {
            b.iter(|| {
                let store = ExprStore::new();
                black_box(build_tower(depth, &store))
            });
        });
        group.bench_with_input(BenchmarkId::new("tower_hit", depth), &depth, |b, &depth| {
            // Interning an already-present tree is pure lookup.
            let store = ExprStore::new();
            build_tower(depth, &store);
            b.iter(|| black_box(build_tower(depth, &store)));
        });
    }
    group.finish();
}

fn bench_counting(c: &mut Criterion) {
    c.bench_function("count_nodes_memoized", |b| {
        let store = ExprStore::new();
        let tower = build_tower(256, &store);
        store.count_nodes(tower);
        b.iter(|| black_box(store.count_nodes(tower)));
    });
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumeration");

    group.bench_function("andnot_v2_c4", |b| {
        b.iter(|| {
            let store = Arc::new(ExprStore::new());
            let (grammar, seed) = andnot_grammar(&store, 2);
            black_box(enumerate_concrete(&store, grammar, seed, 4))
        });
    });

    group.bench_function("ltl_v2_c3", |b| {
        b.iter(|| {
            let store = Arc::new(ExprStore::new());
            let (grammar, seed) = ltl_grammar(&store, 2);
            black_box(enumerate_concrete(&store, grammar, seed, 3))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_interning, bench_counting, bench_enumeration);
criterion_main!(benches);
