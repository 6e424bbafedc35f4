//! Retry policy for rate-limited calls.
//!
//! The default mirrors the remote API's published guidance: wait a fixed two
//! minutes after a 429 and try the identical request again, with no cap on the
//! number of attempts. Sustained rate limiting therefore retries forever;
//! [`RetryPolicy::with_max_retries`] bounds it.

use std::time::Duration;

use crate::error::{ApiError, RATE_LIMITED_CODE};

/// Fixed wait applied after a rate-limit response.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(120);

/// Backoff strategy between retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`, optionally jittered by +/- 50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Fixed {
            delay: RATE_LIMIT_BACKOFF,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                let capped = if seconds.is_finite() {
                    seconds.min(max.as_secs_f64())
                } else {
                    max.as_secs_f64()
                };
                let delay = Duration::try_from_secs_f64(capped.max(0.0)).unwrap_or(max);

                if !jitter {
                    return delay;
                }

                let half = u64::try_from(delay.as_millis() / 2).unwrap_or(u64::MAX / 4);
                let offset = fastrand::u64(0..=half.saturating_mul(2));
                let total = u64::try_from(delay.as_millis())
                    .unwrap_or(u64::MAX / 2)
                    .saturating_add(offset)
                    .saturating_sub(half);
                Duration::from_millis(total)
            }
        }
    }
}

/// Decides whether a failed call is retried and how long to wait first.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Remote error codes that trigger a retry.
    pub retry_on: Vec<u16>,
    pub backoff: Backoff,
    /// `None` retries without limit.
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_on: vec![RATE_LIMITED_CODE],
            backoff: Backoff::default(),
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            retry_on: Vec::new(),
            max_retries: Some(0),
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// `attempt` counts retries already performed for this request.
    ///
    /// Transport failures and malformed responses are never retried.
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        if self.max_retries.is_some_and(|max| attempt >= max) {
            return false;
        }

        error
            .remote_code()
            .is_some_and(|code| self.retry_on.contains(&code))
    }

    pub fn backoff_duration(&self, _error: &ApiError, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpError;

    #[test]
    fn default_policy_retries_only_rate_limits() {
        let policy = RetryPolicy::default();

        assert!(policy.should_retry(&ApiError::remote("Too Many Requests", 429), 0));
        assert!(!policy.should_retry(&ApiError::remote("Unauthorized", 401), 0));
        assert!(!policy.should_retry(&ApiError::remote("Server Error", 500), 0));
        assert!(!policy.should_retry(&ApiError::from(HttpError::new("reset")), 0));
        assert!(!policy.should_retry(&ApiError::malformed("no results"), 0));
    }

    #[test]
    fn default_policy_is_unbounded() {
        let policy = RetryPolicy::default();

        assert!(policy.should_retry(&ApiError::remote("Too Many Requests", 429), 10_000));
    }

    #[test]
    fn default_backoff_is_fixed_two_minutes() {
        let policy = RetryPolicy::default();
        let error = ApiError::remote("Too Many Requests", 429);

        assert_eq!(policy.backoff_duration(&error, 0), Duration::from_secs(120));
        assert_eq!(policy.backoff_duration(&error, 7), Duration::from_secs(120));
    }

    #[test]
    fn max_retries_bounds_attempts() {
        let policy = RetryPolicy::default().with_max_retries(2);
        let error = ApiError::remote("Too Many Requests", 429);

        assert!(policy.should_retry(&error, 0));
        assert!(policy.should_retry(&error, 1));
        assert!(!policy.should_retry(&error, 2));
    }

    #[test]
    fn no_retry_policy_never_retries() {
        let policy = RetryPolicy::no_retry();

        assert!(!policy.should_retry(&ApiError::remote("Too Many Requests", 429), 0));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(10),
            jitter: false,
        };

        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(3), Duration::from_secs(8));
        assert_eq!(backoff.delay(4), Duration::from_secs(10));
        assert_eq!(backoff.delay(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn exponential_backoff_saturates_at_duration_max() {
        let backoff = Backoff::Exponential {
            base: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::MAX,
            jitter: false,
        };

        assert_eq!(backoff.delay(200), Duration::MAX);
    }

    #[test]
    fn policy_uses_configured_backoff() {
        let policy = RetryPolicy::default().with_backoff(Backoff::Exponential {
            base: Duration::from_secs(5),
            factor: 3.0,
            max: Duration::from_secs(60),
            jitter: false,
        });
        let error = ApiError::remote("Too Many Requests", 429);

        assert_eq!(policy.backoff_duration(&error, 0), Duration::from_secs(5));
        assert_eq!(policy.backoff_duration(&error, 2), Duration::from_secs(45));
        assert_eq!(policy.backoff_duration(&error, 3), Duration::from_secs(60));
    }

    #[test]
    fn exponential_jitter_stays_within_half() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(800),
            factor: 1.0,
            max: Duration::from_secs(5),
            jitter: true,
        };

        for attempt in 0..20 {
            let delay = backoff.delay(attempt).as_millis();
            assert!((400..=1200).contains(&delay), "delay {delay}ms out of range");
        }
    }
}
