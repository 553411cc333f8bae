//! Tests for the windowed rate limiter

use super::*;
use crate::test_utils::FixedTimeSource;

const START_SECS: u64 = 1_700_000_000;

fn limiter(config: RateLimitConfig) -> (WindowedRateLimiter, Arc<FixedTimeSource>) {
    let clock = Arc::new(FixedTimeSource::from_secs(START_SECS));
    let limiter = WindowedRateLimiter::new(&config, clock.clone());
    (limiter, clock)
}

// =============================================================================
// Window rules
// =============================================================================

#[test]
fn test_hundred_allowed_then_denied() {
    let (limiter, _clock) = limiter(RateLimitConfig::default());

    for i in 0..100 {
        assert!(limiter.check_rate_limit("Lamp|_hap._tcp"), "call {i} should pass");
    }
    assert!(!limiter.check_rate_limit("Lamp|_hap._tcp"));

    let entry = limiter.entry("Lamp|_hap._tcp").unwrap();
    assert_eq!(entry.count, 100);
}

#[test]
fn test_denial_does_not_consume_budget() {
    let (limiter, _clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..10 {
        limiter.check_rate_limit("Lamp");
    }
    assert_eq!(limiter.entry("Lamp").unwrap().count, 3);
}

#[test]
fn test_window_rolls_over_after_expiry() {
    let (limiter, clock) = limiter(RateLimitConfig::default());
    for _ in 0..100 {
        limiter.check_rate_limit("Lamp");
    }
    assert!(!limiter.check_rate_limit("Lamp"));

    clock.advance(Duration::from_secs(61));
    assert!(limiter.check_rate_limit("Lamp"));

    let entry = limiter.entry("Lamp").unwrap();
    assert_eq!(entry.count, 1);
    assert_eq!(entry.window_start, clock.now());
}

#[test]
fn test_window_boundary_is_exclusive() {
    let (limiter, clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..3 {
        limiter.check_rate_limit("Lamp");
    }

    // Exactly one window later is still the same window.
    clock.advance(Duration::from_secs(10));
    assert!(!limiter.check_rate_limit("Lamp"));

    clock.advance(Duration::from_millis(1));
    assert!(limiter.check_rate_limit("Lamp"));
}

#[test]
fn test_keys_are_independent() {
    let (limiter, _clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..3 {
        assert!(limiter.check_rate_limit("a"));
    }
    assert!(!limiter.check_rate_limit("a"));
    assert!(limiter.check_rate_limit("b"));
}

#[test]
fn test_reset_forgets_all_windows() {
    let (limiter, _clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..3 {
        limiter.check_rate_limit("a");
    }
    limiter.check_rate_limit("b");

    limiter.reset();

    assert_eq!(limiter.stats().tracked_identities, 0);
    assert!(limiter.entry("a").is_none());
    assert!(limiter.check_rate_limit("a"));
}

#[test]
fn test_clock_going_backwards_keeps_window() {
    let (limiter, clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..3 {
        limiter.check_rate_limit("a");
    }
    clock.set(0);
    assert!(!limiter.check_rate_limit("a"));
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn test_least_recent_identity_evicted() {
    let config = RateLimitConfig::for_testing()
        .with_shard_count(1)
        .with_max_tracked_identities(2);
    let (limiter, _clock) = limiter(config);

    limiter.check_rate_limit("a");
    limiter.check_rate_limit("b");
    limiter.check_rate_limit("a");
    limiter.check_rate_limit("c");

    assert!(limiter.entry("a").is_some());
    assert!(limiter.entry("b").is_none());
    assert!(limiter.entry("c").is_some());
    assert_eq!(limiter.stats().evicted, 1);
}

#[test]
fn test_tracked_identities_bounded() {
    let config = RateLimitConfig::default()
        .with_shard_count(4)
        .with_max_tracked_identities(40);
    let (limiter, _clock) = limiter(config);

    for i in 0..1_000 {
        limiter.check_rate_limit(&format!("device-{i}"));
    }
    assert!(limiter.stats().tracked_identities <= 40);
}

#[test]
fn test_stats_count_decisions() {
    let (limiter, _clock) = limiter(RateLimitConfig::for_testing());
    for _ in 0..5 {
        limiter.check_rate_limit("a");
    }
    let stats = limiter.stats();
    assert_eq!(stats.allowed, 3);
    assert_eq!(stats.denied, 2);
    assert_eq!(stats.tracked_identities, 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_callers_never_exceed_ceiling() {
    let (limiter, _clock) = limiter(RateLimitConfig::default());
    let allowed = AtomicU64::new(0);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    if limiter.check_rate_limit("shared") {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(allowed.load(Ordering::Relaxed), 100);
    assert_eq!(limiter.entry("shared").unwrap().count, 100);
}

#[test]
fn test_concurrent_distinct_keys() {
    let (limiter, _clock) = limiter(RateLimitConfig::for_testing());

    std::thread::scope(|scope| {
        for t in 0..8 {
            let limiter = &limiter;
            scope.spawn(move || {
                let key = format!("device-{t}");
                for _ in 0..3 {
                    assert!(limiter.check_rate_limit(&key));
                }
                assert!(!limiter.check_rate_limit(&key));
            });
        }
    });

    assert_eq!(limiter.stats().tracked_identities, 8);
}

#[test]
fn test_noop_always_allows() {
    let limiter = NoOpRateLimiter::new();
    for _ in 0..1_000 {
        assert!(limiter.check_rate_limit("a"));
    }
    limiter.reset();
}
