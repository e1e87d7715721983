//! Criteria compiler benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strata_core::{CriteriaMap, CriteriaQuery, SortDirection};

fn query_with_groups(groups: usize) -> CriteriaQuery {
    let mut query = CriteriaQuery::new();
    for index in 0..groups {
        query = query.group(
            CriteriaMap::new()
                .with("status", index as i64)
                .with("owner", format!("owner {index}"))
                .with("isComplete", index % 2 == 0),
        );
    }
    query
}

/// Benchmark compiling a representative query.
fn bench_compile_simple(c: &mut Criterion) {
    c.bench_function("compile_one_group", |b| {
        let query = CriteriaQuery::new()
            .group(CriteriaMap::new().with("title", "report").with("isComplete", false))
            .sort_by("title", SortDirection::Ascending)
            .limit(50);

        b.iter(|| {
            let compiled = black_box(&query).compile();
            black_box(compiled);
        });
    });
}

/// Benchmark compiling with a growing number of OR-groups.
fn bench_compile_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_groups");

    for groups in [1, 4, 16, 64].iter() {
        group.throughput(Throughput::Elements(*groups as u64));
        group.bench_with_input(BenchmarkId::from_parameter(groups), groups, |b, &groups| {
            let query = query_with_groups(groups);
            b.iter(|| {
                let compiled = black_box(&query).compile();
                black_box(compiled);
            });
        });
    }

    group.finish();
}

/// Benchmark compiling with a growing exclusion list.
fn bench_compile_exclusions(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_exclusions");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let query = CriteriaQuery::new()
                .group(CriteriaMap::new().with("isComplete", false))
                .exclude(0..count as i64);
            b.iter(|| {
                let compiled = black_box(&query).compile();
                black_box(compiled);
            });
        });
    }

    group.finish();
}

/// Benchmark the trailing ORDER BY / LIMIT rendering.
fn bench_tail_sql(c: &mut Criterion) {
    c.bench_function("tail_sql", |b| {
        let query = CriteriaQuery::new()
            .sort_by("dueDate", SortDirection::Descending)
            .limit(25);

        b.iter(|| {
            let tail = black_box(&query).tail_sql();
            black_box(tail);
        });
    });
}

criterion_group!(
    benches,
    bench_compile_simple,
    bench_compile_groups,
    bench_compile_exclusions,
    bench_tail_sql,
);

criterion_main!(benches);
