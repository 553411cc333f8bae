//! # Trust Pipeline Benchmarks
//!
//! | Component | Path | Expectation |
//! |-----------|------|-------------|
//! | Sanitizer | `sanitize_name`, `sanitize_attribute_value` | microseconds per field |
//! | Rate Limiter | `check_rate_limit` across many identities | no contention collapse |
//! | Pipeline | full `evaluate` on a HomeKit record | well under a scan interval |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hk_01_discovery_trust::test_utils::FixedTimeSource;
use hk_01_discovery_trust::{
    sanitize_attribute_value, sanitize_name, RateLimitConfig, RateLimiter, TrustConfig,
    TrustPipeline, TrustPipelineApi, WindowedRateLimiter,
};
use hk_tests::support::homekit_record;
use rand::Rng;
use std::sync::Arc;

// ============================================================================
// Sanitizer
// ============================================================================

fn bench_sanitizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitizer");

    let benign = "Living Room Lamp 1A2B";
    let hostile = "<script>alert(1)</script>{{x}}${y}`z`".repeat(6);
    let mut rng = rand::thread_rng();
    let random: String = (0..255).map(|_| rng.gen_range(' '..='~')).collect();

    for (label, input) in [("benign", benign), ("hostile", hostile.as_str()), ("random", random.as_str())] {
        group.bench_with_input(BenchmarkId::new("sanitize_name", label), input, |b, input| {
            b.iter(|| black_box(sanitize_name(input)))
        });
        group.bench_with_input(BenchmarkId::new("sanitize_attribute_value", label), input, |b, input| {
            b.iter(|| black_box(sanitize_attribute_value(input)))
        });
    }
    group.finish();
}

// ============================================================================
// Rate Limiter
// ============================================================================

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate-limiter");

    for identities in [1usize, 100, 10_000] {
        let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
        let limiter = WindowedRateLimiter::new(
            &RateLimitConfig::default().with_max_announcements(u32::MAX),
            clock,
        );
        let keys: Vec<String> = (0..identities).map(|i| format!("device-{i}|_hap._tcp")).collect();

        group.throughput(Throughput::Elements(identities as u64));
        group.bench_with_input(BenchmarkId::new("check", identities), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(limiter.check_rate_limit(key));
                }
            })
        });
    }
    group.finish();
}

// ============================================================================
// Pipeline
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
    let config = TrustConfig {
        rate_limit: RateLimitConfig::default().with_max_announcements(u32::MAX),
        ..Default::default()
    };
    let pipeline = TrustPipeline::from_config(&config, clock);
    let record = homekit_record("Eve Energy 1A2B", "192.168.1.20");

    c.bench_function("pipeline/evaluate", |b| {
        b.iter(|| black_box(pipeline.evaluate(&record, &[])))
    });
}

criterion_group!(benches, bench_sanitizer, bench_rate_limiter, bench_pipeline);
criterion_main!(benches);
