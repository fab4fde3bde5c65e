use parking_lot::RwLock;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

struct Attempt {
    count: u32,
    last_attempt: Instant,
}

/// Failed-login counter, keyed by caller identifier (ip).
///
/// Process local and best effort: counters reset on restart and are not
/// shared across instances. The rolling window starts over at every failed
/// attempt; a successful login clears the counter.
pub struct LoginGuard {
    max_attempts: u32,
    window: Duration,
    attempts: RwLock<HashMap<String, Attempt>>,
}

impl LoginGuard {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: RwLock::new(HashMap::new()),
        }
    }

    /// Whether the identifier may attempt a login right now.
    pub fn check(&self, identifier: &str) -> bool {
        let mut attempts = self.attempts.write();
        if let Some(attempt) = attempts.get(identifier) {
            if attempt.last_attempt.elapsed() >= self.window {
                attempts.remove(identifier);
                return true;
            }
            return attempt.count < self.max_attempts;
        }
        true
    }

    /// Record the outcome of a login attempt.
    pub fn record(&self, identifier: &str, success: bool) {
        let mut attempts = self.attempts.write();
        if success {
            attempts.remove(identifier);
            return;
        }
        let entry = attempts.entry(identifier.to_owned()).or_insert(Attempt {
            count: 0,
            last_attempt: Instant::now(),
        });
        if entry.last_attempt.elapsed() >= self.window {
            entry.count = 0;
        }
        entry.count += 1;
        entry.last_attempt = Instant::now();
    }

    /// Seconds left in the lockout window for a limited identifier.
    pub fn retry_after(&self, identifier: &str) -> u64 {
        let attempts = self.attempts.read();
        attempts
            .get(identifier)
            .map(|a| self.window.saturating_sub(a.last_attempt.elapsed()).as_secs())
            .unwrap_or(0)
    }
}
