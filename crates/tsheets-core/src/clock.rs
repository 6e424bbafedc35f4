use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Time source and suspension capability used for backoff and throttling.
///
/// Injected so tests can observe waits without spending wall-clock time.
/// Implementations must advance [`now`](Sleeper::now) by at least the slept
/// duration, since the throttle measures its budget on the same clock.
pub trait Sleeper: Send + Sync {
    fn now(&self) -> Instant;

    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Sleeps on the tokio timer and reads tokio's clock, so paused test time
/// applies to both.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Adapts a [`Sleeper`] to governor's clock so rate budgets are measured on
/// the injected time source.
#[derive(Clone)]
pub(crate) struct SleeperClock(Arc<dyn Sleeper>);

impl SleeperClock {
    pub(crate) fn new(sleeper: Arc<dyn Sleeper>) -> Self {
        Self(sleeper)
    }

    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.0.as_ref()
    }
}

impl governor::clock::Clock for SleeperClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        self.0.now()
    }
}
