use std::time::Duration;

/// Maximum number of delivery attempts before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Deadline for a single delivery attempt, measured from the start of that
/// attempt.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between a failed attempt and the next one.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Uniform fixed-count retry configuration.
///
/// There is no backoff growth and no classification of transport failures:
/// every failed attempt is retried identically until the attempts are spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least one attempt is always
    /// made, even when this is zero.
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            attempt_timeout: ATTEMPT_TIMEOUT,
            retry_delay: RETRY_DELAY,
        }
    }
}
