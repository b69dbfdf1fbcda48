//! Rate limiting for tool calls
//!
//! Two independent token buckets guard the server: one for every tool call and
//! one for workflow runs that are not dry runs. Tokens are kept as `f64` so
//! that fractional refill carries across calls. Checks never block.

use crate::{ConductorError, Result};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Capacity of the call bucket, refilled over one minute
pub const DEFAULT_CALL_LIMIT: u32 = 100;

/// Capacity of the run bucket, refilled over one minute
pub const DEFAULT_RUN_LIMIT: u32 = 10;

/// Trait for rate limiting functionality
///
/// Allows tests to inject limiters with different capacities or that always
/// deny.
pub trait RateLimitChecker: Send + Sync {
    /// Take one token from the call bucket
    fn check_call(&self) -> Result<()>;

    /// Take one token from the run bucket
    fn check_run(&self) -> Result<()>;
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// A token bucket with fractional tokens
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket that refills `capacity` tokens every `period`
    pub fn new(capacity: u32, period: Duration) -> Self {
        let capacity = f64::from(capacity);
        let seconds = period.as_secs_f64().max(f64::EPSILON);
        Self {
            capacity,
            refill_rate: capacity / seconds,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take one token now
    pub fn try_take(&self) -> bool {
        self.try_take_at(Instant::now())
    }

    /// Try to take one token, refilling as of `now`
    pub fn try_take_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut state, now);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens available as of `now`, after refill
    pub fn available_at(&self, now: Instant) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut state, now);
        state.tokens
    }

    /// Bucket capacity
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        // Instants earlier than the last refill add nothing
        let elapsed = now.saturating_duration_since(state.last_refill);
        state.tokens = (state.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.capacity);
        if now > state.last_refill {
            state.last_refill = now;
        }
    }
}

/// The server's pair of buckets
#[derive(Debug)]
pub struct RateLimiter {
    calls: TokenBucket,
    runs: TokenBucket,
}

/// Configuration for rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Tool calls per window
    pub call_limit: u32,
    /// Non-dry workflow runs per window
    pub run_limit: u32,
    /// Refill window
    pub window_duration: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            call_limit: DEFAULT_CALL_LIMIT,
            run_limit: DEFAULT_RUN_LIMIT,
            window_duration: Duration::from_secs(60),
        }
    }
}

impl RateLimiter {
    /// Create a new rate limiter with default configuration
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Create a new rate limiter with custom configuration
    pub fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            calls: TokenBucket::new(config.call_limit, config.window_duration),
            runs: TokenBucket::new(config.run_limit, config.window_duration),
        }
    }

    /// True if a call token was taken
    pub fn allow_call(&self) -> bool {
        self.calls.try_take()
    }

    /// True if a run token was taken
    pub fn allow_run(&self) -> bool {
        self.runs.try_take()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitChecker for RateLimiter {
    fn check_call(&self) -> Result<()> {
        if self.allow_call() {
            Ok(())
        } else {
            Err(ConductorError::rate_limited(
                "tool calls",
                format!(
                    "at most {} calls per minute are accepted; retry later",
                    self.calls.capacity()
                ),
            ))
        }
    }

    fn check_run(&self) -> Result<()> {
        if self.allow_run() {
            Ok(())
        } else {
            Err(ConductorError::rate_limited(
                "workflow runs",
                format!(
                    "at most {} non-dry runs per minute are accepted; retry later or plan with dry_run=true",
                    self.runs.capacity()
                ),
            ))
        }
    }
}
