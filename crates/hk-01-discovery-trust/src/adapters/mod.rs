//! # Adapters
//!
//! | Port | Test | Production |
//! |------|------|------------|
//! | `RateLimiter` | `NoOpRateLimiter` | `WindowedRateLimiter` |
//! | `TimeSource` | `FixedTimeSource` | `SystemTimeSource` |
//! | `ConfigProvider` | `StaticConfigProvider` | `TomlConfigProvider` |

pub mod config;
pub mod rate_limit;
pub mod time;

pub use config::{StaticConfigProvider, TomlConfigProvider};
pub use rate_limit::{NoOpRateLimiter, RateLimiterStats, RateWindowEntry, WindowedRateLimiter};
pub use time::SystemTimeSource;
