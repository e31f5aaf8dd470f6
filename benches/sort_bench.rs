//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tournament_sort::*;

fn descending(len: usize) -> Vec<i64> {
    (0..len as i64).rev().collect()
}

fn benchmark_runtimes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for len in [16usize, 64, 256] {
        let input = descending(len);
        for runtime in [RuntimeKind::Lockstep, RuntimeKind::Threaded] {
            let sorter = Sorter::new(SortConfig::balanced_for(len).with_runtime(runtime));
            group.bench_with_input(BenchmarkId::new(runtime.to_string(), len), &input, |b, input| {
                b.iter(|| black_box(sorter.run(input).expect("sort succeeds")));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_runtimes);
criterion_main!(benches);
