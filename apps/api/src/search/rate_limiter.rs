//! Fixed-window request counter per identity.
//!
//! A burst straddling a window boundary can admit up to twice the cap; accepted for a
//! low-traffic tool. State is in-memory and lost on restart.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

#[derive(Debug, Clone)]
struct RateRecord {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    records: Mutex<HashMap<String, RateRecord>>,
}

impl RateLimiter {
    pub fn new(window_ms: i64, max_requests: u32) -> Self {
        Self {
            window: Duration::milliseconds(window_ms),
            max_requests,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when the request is allowed.
    pub fn check(&self, identity: &str) -> bool {
        self.check_at(identity, Utc::now())
    }

    pub fn check_at(&self, identity: &str, now: DateTime<Utc>) -> bool {
        // A poisoned lock only means another request panicked mid-update; the map is
        // still a valid set of counters.
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(record) = records.get_mut(identity) {
            if now <= record.window_reset_at {
                if record.count >= self.max_requests {
                    debug!("Rate limit hit for identity {identity}");
                    return false;
                }
                record.count += 1;
                return true;
            }
        }

        // First request, or the previous window has passed
        records.insert(
            identity.to_string(),
            RateRecord {
                count: 1,
                window_reset_at: now + self.window,
            },
        );
        true
    }
}
