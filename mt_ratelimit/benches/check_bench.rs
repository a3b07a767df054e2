use std::hint::black_box;
use std::time::Duration;

use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use mt_ratelimit::MemoryStore;
use mt_ratelimit::RateLimitBackend;
use mt_ratelimit::RateLimitPolicy;

fn bench_check_hot_identifier(c: &mut Criterion) {
    c.bench_function("check_hot_identifier", |b| {
        let store = MemoryStore::new();
        // Large allowance so the bench measures the check path, not rejection
        let policy = RateLimitPolicy::new(u32::MAX, Duration::from_secs(60));

        b.iter(|| store.check(black_box("user:42"), black_box(&policy)));
    });
}

fn bench_check_many_identifiers(c: &mut Criterion) {
    c.bench_function("check_many_identifiers", |b| {
        let store = MemoryStore::new();
        let policy = RateLimitPolicy::new(1_000, Duration::from_secs(60));
        let keys: Vec<String> = (0..4_096).map(|i| format!("ip:10.0.{}.{}", i / 256, i % 256)).collect();
        let mut i = 0usize;

        b.iter(|| {
            i = (i + 1) % keys.len();
            store.check(black_box(&keys[i]), &policy)
        });
    });
}

fn bench_exhausted_identifier(c: &mut Criterion) {
    c.bench_function("check_exhausted_identifier", |b| {
        let store = MemoryStore::new();
        let policy = RateLimitPolicy::new(1, Duration::from_secs(3_600));
        store.check("drained", &policy);

        b.iter(|| store.check(black_box("drained"), black_box(&policy)));
    });
}

criterion_group!(benches, bench_check_hot_identifier, bench_check_many_identifiers, bench_exhausted_identifier);
criterion_main!(benches);
