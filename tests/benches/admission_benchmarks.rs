//! # Feedloop Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | fl-01 `allow` on a hot key | O(1), one shard lock |
//! | fl-01 `allow` over many keys | flat as the map grows |
//! | fl-01 `sweep` | linear in tracked keys |
//! | fl-02 `list` | linear in project size |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use fl_01_admission::{derive_key, AdmissionConfig, AdmissionController, KeyStrategy};
use fl_02_feedback::{
    FeedbackApi, FeedbackFilter, FeedbackService, InMemoryFeedbackStore, NewFeedback, SortKey,
    Visibility,
};
use shared_types::{CallerIdentity, CallerRole, ManualTimeSource, TeamRole};
use uuid::Uuid;

// ============================================================================
// FL-01: Admission
// ============================================================================

fn controller(limit: u32) -> (Arc<ManualTimeSource>, AdmissionController<Arc<ManualTimeSource>>) {
    let clock = Arc::new(ManualTimeSource::new(0));
    let controller = AdmissionController::with_time_source(
        AdmissionConfig::new(limit, Duration::from_secs(60)),
        Arc::clone(&clock),
    );
    (clock, controller)
}

fn bench_allow(c: &mut Criterion) {
    let mut group = c.benchmark_group("fl-01-allow");
    group.measurement_time(Duration::from_secs(5));

    let (_clock, hot) = controller(u32::MAX);
    group.bench_function("hot_key", |b| {
        b.iter(|| black_box(hot.allow("user:hot").allowed))
    });

    for keys in [1_000usize, 10_000, 100_000] {
        let (_clock, ctl) = controller(100);
        let names: Vec<String> = (0..keys)
            .map(|i| format!("ip:10.{}.{}.{}", i / 65_536, (i / 256) % 256, i % 256))
            .collect();
        for name in &names {
            ctl.allow(name);
        }

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("random_key", keys), &names, |b, names| {
            let mut rng = rand::thread_rng();
            b.iter(|| {
                let key = &names[rng.gen_range(0..names.len())];
                black_box(ctl.allow(key).remaining)
            })
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("fl-01-sweep");

    for keys in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(keys as u64));
        group.bench_with_input(BenchmarkId::new("all_expired", keys), &keys, |b, &keys| {
            b.iter_batched(
                || {
                    let (clock, ctl) = controller(10);
                    for i in 0..keys {
                        ctl.allow(&format!("user:{i}"));
                    }
                    clock.advance_secs(61);
                    ctl
                },
                |ctl| black_box(ctl.sweep()),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_derive_key(c: &mut Criterion) {
    let identity = CallerIdentity::user(Uuid::new_v4());
    let ip: Option<std::net::IpAddr> = Some("203.0.113.7".parse().unwrap());

    c.bench_function("fl-01-derive-key", |b| {
        b.iter(|| black_box(derive_key(KeyStrategy::Identity, Some(&identity), ip).to_string()))
    });
}

// ============================================================================
// FL-02: Feedback listing
// ============================================================================

fn bench_list(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("fl-02-list");

    for size in [100usize, 1_000] {
        let store = Arc::new(InMemoryFeedbackStore::new());
        let service = FeedbackService::new(Arc::clone(&store), store);
        let project = Uuid::new_v4();
        runtime.block_on(async {
            for i in 0..size {
                let mut new = NewFeedback::new(format!("item {i}"));
                new.visibility = Some(if i % 2 == 0 {
                    Visibility::Community
                } else {
                    Visibility::TeamOnly
                });
                service.submit(project, new, None).await.unwrap();
            }
        });

        let filter = FeedbackFilter {
            sort: Some(SortKey::Votes),
            ..FeedbackFilter::default()
        };
        for (label, role) in [
            ("team", CallerRole::Team(TeamRole::Member)),
            ("community", CallerRole::Community),
        ] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    let page = runtime
                        .block_on(service.list(project, &filter, role))
                        .unwrap();
                    black_box(page.total)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(admission, bench_allow, bench_sweep, bench_derive_key);
criterion_group!(feedback, bench_list);
criterion_main!(admission, feedback);
