//! Token-bucket admission control for API requests.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use sirocco_core::error::ConfigError;

/// Unit the configured refill rate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefillRateUnit {
    /// Tokens per second
    #[default]
    Second,
    /// Tokens per minute
    Minute,
    /// Tokens per hour
    Hour,
}

impl RefillRateUnit {
    /// Normalizes a rate in this unit to tokens per second.
    ///
    /// Integer division truncates: a per-minute or per-hour rate below one
    /// token per second normalizes to zero and the bucket never refills.
    /// See [`Throttler::new`].
    #[must_use]
    pub const fn normalize(&self, rate: u32) -> u32 {
        match self {
            Self::Second => rate,
            Self::Minute => rate / 60,
            Self::Hour => rate / (60 * 60),
        }
    }
}

/// Bucket state, guarded as one unit so refill-check-debit is atomic
/// with respect to sibling callers.
#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket throttler.
///
/// Each unit of work debits tokens from a capped pool that replenishes
/// over time; callers suspend while the pool is short. One instance is
/// shared by all requests issued through one endpoint client.
///
/// # Refill truncation
///
/// The refill rate is normalized to tokens per second by integer
/// division. Rates below one token per second in a larger unit (e.g.
/// 59 per minute) truncate to zero: the bucket serves its capacity and
/// then never refills. This mirrors the upstream limiter configuration
/// semantics and is intentional, not a rounding artifact.
#[derive(Debug)]
pub struct Throttler {
    capacity: u32,
    refill_rate_s: u32,
    bucket: Mutex<Bucket>,
}

impl Throttler {
    /// Creates a throttler with a full bucket.
    ///
    /// `refill_rate` is given in `unit` and normalized to per-second
    /// internally (see the type-level note on truncation).
    #[must_use]
    pub fn new(capacity: u32, refill_rate: u32, unit: RefillRateUnit) -> Self {
        Self {
            capacity,
            refill_rate_s: unit.normalize(refill_rate),
            bucket: Mutex::new(Bucket {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Returns the bucket capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the normalized refill rate in tokens per second.
    #[must_use]
    pub const fn refill_rate_per_second(&self) -> u32 {
        self.refill_rate_s
    }

    /// Acquires `weight` tokens, suspending until they are available.
    ///
    /// The refill, availability check, and debit happen under one lock so
    /// two callers can never both observe sufficient tokens and overdraw.
    /// When the bucket is short, the caller sleeps for the deficit rounded
    /// up to whole seconds and then re-runs the entire acquisition - the
    /// sleep alone is not assumed to cover the deficit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ThrottleWeightExceedsCapacity` if `weight`
    /// exceeds the bucket capacity; such a request can never be satisfied.
    pub async fn acquire(&self, weight: u32) -> Result<(), ConfigError> {
        if weight > self.capacity {
            return Err(ConfigError::ThrottleWeightExceedsCapacity {
                weight,
                capacity: self.capacity,
            });
        }

        loop {
            let deficit = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * f64::from(self.refill_rate_s))
                    .min(f64::from(self.capacity));
                bucket.last_refill = now;

                if bucket.tokens >= f64::from(weight) {
                    bucket.tokens -= f64::from(weight);
                    return Ok(());
                }
                f64::from(weight) - bucket.tokens
            };

            if self.refill_rate_s == 0 {
                // Drained bucket that never refills: the request can only
                // complete if the caller is cancelled.
                std::future::pending::<()>().await;
                unreachable!();
            }

            let wait = (deficit / f64::from(self.refill_rate_s)).ceil() as u64;
            tokio::time::sleep(Duration::from_secs(wait)).await;
        }
    }
}
