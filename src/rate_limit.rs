use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const APP_RATE_LIMIT_HEADER: &str = "x-app-rate-limit";
pub const APP_RATE_LIMIT_COUNT_HEADER: &str = "x-app-rate-limit-count";

/// The upstream does not send a reset time for the short window, so the
/// bucket assumes the window ends one second after the last response.
pub const APPROXIMATE_WINDOW: Duration = Duration::from_secs(1);

/// Fraction of the short-window budget after which usage is logged as a warning.
const WARN_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub count: u32,
    pub limit: u32,
    pub reset_at: Instant,
}

impl Bucket {
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }
}

/// Last observed rate-limit state per endpoint, owned by one client.
///
/// The state is advisory only: it lets the client hold back a request it
/// already knows would be throttled.
#[derive(Debug, Default)]
pub struct RateLimitStore {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: &str) -> Option<Bucket> {
        self.lock().get(endpoint).copied()
    }

    /// How long a request to `endpoint` must wait, if its bucket is spent
    /// and the window has not rolled over yet.
    pub fn wait_time(&self, endpoint: &str, now: Instant) -> Option<Duration> {
        let bucket = self.get(endpoint)?;
        if bucket.is_exhausted() && bucket.reset_at > now {
            Some(bucket.reset_at - now)
        } else {
            None
        }
    }

    pub fn record(&self, endpoint: &str, count: u32, limit: u32, now: Instant) {
        let bucket = Bucket {
            count,
            limit,
            reset_at: now + APPROXIMATE_WINDOW,
        };

        debug!("Rate limit for {}: {}/{}", endpoint, count, limit);
        if f64::from(count) > f64::from(limit) * WARN_THRESHOLD {
            warn!("Approaching rate limit for {}: {}/{}", endpoint, count, limit);
        }

        self.lock().insert(endpoint.to_string(), bucket);
    }

    /// Updates the bucket from response headers. Responses without both
    /// telemetry headers leave the bucket untouched.
    pub fn record_headers<'a, F>(&self, endpoint: &str, header: F, now: Instant)
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let limit = header(APP_RATE_LIMIT_HEADER).and_then(parse_short_window);
        let count = header(APP_RATE_LIMIT_COUNT_HEADER).and_then(parse_short_window);

        if let (Some(limit), Some(count)) = (limit, count) {
            self.record(endpoint, count, limit, now);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bucket>> {
        // A poisoned map still holds valid hints.
        self.buckets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Extracts the first number of the first window from a header such as
/// `"20:1,100:120"`.
pub fn parse_short_window(value: &str) -> Option<u32> {
    value
        .split(',')
        .next()?
        .split(':')
        .next()?
        .trim()
        .parse()
        .ok()
}
