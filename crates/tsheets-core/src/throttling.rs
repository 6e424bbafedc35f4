use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use governor::clock::Clock;
use governor::middleware::NoOpMiddleware;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use tracing::debug;

use crate::clock::{Sleeper, SleeperClock, TokioSleeper};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, SleeperClock, NoOpMiddleware<Instant>>;

/// Request budget shared by every traversal issued through one client.
///
/// The remote rate limit is account-wide, so pacing lives here rather than in
/// individual traversals. Cloning shares the same budget. The budget is
/// measured and waited out on one [`Sleeper`].
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<DirectRateLimiter>,
    clock: SleeperClock,
}

impl Throttle {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self::with_sleeper(quota_window, quota_limit, Arc::new(TokioSleeper))
    }

    pub fn per_minute(quota_limit: u32) -> Self {
        Self::new(Duration::from_secs(60), quota_limit)
    }

    pub fn with_sleeper(quota_window: Duration, quota_limit: u32, sleeper: Arc<dyn Sleeper>) -> Self {
        let clock = SleeperClock::new(sleeper);
        let limiter = RateLimiter::direct_with_clock(quota_from_window(quota_window, quota_limit), &clock);

        Self {
            limiter: Arc::new(limiter),
            clock,
        }
    }

    /// Takes one unit of budget, or returns how long to wait before asking again.
    pub fn acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Waits until one unit of budget is available and takes it.
    pub async fn until_ready(&self) {
        while let Err(wait) = self.acquire() {
            debug!(wait_ms = wait.as_millis() as u64, "request budget exhausted; waiting");
            self.clock.sleeper().sleep(wait).await;
        }
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle").finish_non_exhaustive()
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let burst = NonZeroU32::new(quota_limit.max(1)).unwrap_or(NonZeroU32::MIN);
    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(burst.get())).max(0.001);

    Quota::with_period(Duration::from_secs_f64(seconds_per_cell))
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}
