//! # Announcement Rate Limiting
//!
//! Fixed-window counters keyed by device identity.
//!
//! ## Table Layout
//!
//! The counter table is split into shards, each a `parking_lot::Mutex` around
//! an `LruCache`. A key always hashes to the same shard, so the whole
//! check-and-update for one key runs under one lock, while different keys
//! rarely contend. Each shard holds at most `max_tracked_identities / shards`
//! entries (rounded up); the least recently seen identity is evicted first.
//!
//! ## Window Rules
//!
//! | State | Action | Result |
//! |-------|--------|--------|
//! | no entry | insert `(1, now)` | allow |
//! | `now - start > window` | reset to `(1, now)` | allow |
//! | `count >= ceiling` | none | deny |
//! | otherwise | `count += 1` | allow |

use crate::adapters::time::SystemTimeSource;
use crate::domain::{RateLimitConfig, Timestamp};
use crate::ports::{RateLimiter, TimeSource};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// NO-OP
// =============================================================================

/// Always allows. For tests and operator override.
#[derive(Debug, Default)]
pub struct NoOpRateLimiter;

impl NoOpRateLimiter {
    pub fn new() -> Self {
        Self
    }
}

impl RateLimiter for NoOpRateLimiter {
    fn check_rate_limit(&self, _key: &str) -> bool {
        true
    }

    fn reset(&self) {}
}

// =============================================================================
// WINDOWED
// =============================================================================

/// Counter state for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindowEntry {
    /// Announcements counted in the current window
    pub count: u32,
    /// When the current window opened
    pub window_start: Timestamp,
}

/// Snapshot of limiter counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimiterStats {
    pub tracked_identities: usize,
    pub allowed: u64,
    pub denied: u64,
    pub evicted: u64,
}

type Shard = Mutex<LruCache<String, RateWindowEntry>>;

/// Production rate limiter.
pub struct WindowedRateLimiter {
    shards: Box<[Shard]>,
    hasher: RandomState,
    max_announcements: u32,
    window: Duration,
    time_source: Arc<dyn TimeSource>,
    allowed: AtomicU64,
    denied: AtomicU64,
    evicted: AtomicU64,
}

impl std::fmt::Debug for WindowedRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedRateLimiter")
            .field("shards", &self.shards.len())
            .field("max_announcements", &self.max_announcements)
            .field("window", &self.window)
            .field("time_source", &"<dyn TimeSource>")
            .finish()
    }
}

impl WindowedRateLimiter {
    /// Create a limiter reading time from `time_source`.
    pub fn new(config: &RateLimitConfig, time_source: Arc<dyn TimeSource>) -> Self {
        let shard_count = config.shard_count.max(1);
        let per_shard = config.max_tracked_identities.div_ceil(shard_count);
        let capacity = NonZeroUsize::new(per_shard).unwrap_or(NonZeroUsize::MIN);

        let shards = (0..shard_count)
            .map(|_| Mutex::new(LruCache::new(capacity)))
            .collect();

        Self {
            shards,
            hasher: RandomState::new(),
            max_announcements: config.max_announcements,
            window: config.window,
            time_source,
            allowed: AtomicU64::new(0),
            denied: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    /// Create a limiter on the system clock.
    pub fn with_system_clock(config: &RateLimitConfig) -> Self {
        Self::new(config, Arc::new(SystemTimeSource::new()))
    }

    /// Current window state for `key`, without touching recency.
    pub fn entry(&self, key: &str) -> Option<RateWindowEntry> {
        self.shard_for(key).lock().peek(key).copied()
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            tracked_identities: self.shards.iter().map(|shard| shard.lock().len()).sum(),
            allowed: self.allowed.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }

    fn shard_for(&self, key: &str) -> &Shard {
        let index = self.hasher.hash_one(key) as usize % self.shards.len();
        &self.shards[index]
    }

    fn decide(&self, shard: &mut LruCache<String, RateWindowEntry>, key: &str, now: Timestamp) -> bool {
        if let Some(entry) = shard.get_mut(key) {
            if now.elapsed_since(entry.window_start) > self.window {
                *entry = RateWindowEntry {
                    count: 1,
                    window_start: now,
                };
                return true;
            }
            if entry.count >= self.max_announcements {
                return false;
            }
            entry.count += 1;
            return true;
        }

        let fresh = RateWindowEntry {
            count: 1,
            window_start: now,
        };
        if let Some((evicted, _)) = shard.push(key.to_string(), fresh) {
            tracing::debug!(identity = %evicted, "rate window evicted");
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        true
    }
}

impl RateLimiter for WindowedRateLimiter {
    fn check_rate_limit(&self, key: &str) -> bool {
        let now = self.time_source.now();
        let allowed = {
            let mut shard = self.shard_for(key).lock();
            self.decide(&mut shard, key, now)
        };

        if allowed {
            self.allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.denied.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(identity = %key, "announcement rate limit exceeded");
        }
        allowed
    }

    fn reset(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
        tracing::debug!("rate limiter reset");
    }
}

#[cfg(test)]
mod tests;
