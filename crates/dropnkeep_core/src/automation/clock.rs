//! Timer abstraction and bounded polling waits.
//!
//! # Invariants
//! - `bounded_wait` never sleeps past its timeout.
//! - Waits yield through `Clock::sleep`; nothing busy-waits.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time source plus a cooperative delay.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Resolves after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Polling cadence and hard deadline for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

/// Returned when a bounded wait exhausts its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout {
    pub waited: Duration,
}

/// Outcome of a probe-driven wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitError<E> {
    Timeout(WaitTimeout),
    Probe(E),
}

/// Polls `probe` every `policy.interval` until it yields a value.
///
/// The probe runs immediately, then after each interval; the final sleep
/// is shortened so the total wait never exceeds `policy.timeout`, and the
/// probe gets one last look at the deadline.
pub async fn bounded_wait<C, T, E, F>(
    clock: &C,
    policy: WaitPolicy,
    mut probe: F,
) -> Result<T, WaitError<E>>
where
    C: Clock,
    F: FnMut() -> Result<Option<T>, E>,
{
    let started = clock.now();
    loop {
        if let Some(found) = probe().map_err(WaitError::Probe)? {
            return Ok(found);
        }

        let waited = clock.now().saturating_sub(started);
        if waited >= policy.timeout {
            return Err(WaitError::Timeout(WaitTimeout { waited }));
        }

        let remaining = policy.timeout - waited;
        clock.sleep(policy.interval.min(remaining)).await;
    }
}

/// Virtual clock for tests and simulations: every sleep advances time
/// instantly instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    sleeps: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward without a sleep call.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Total virtual time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.now.get()
    }

    /// Number of `sleep` calls observed.
    pub fn sleep_count(&self) -> u32 {
        self.sleeps.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        self.advance(duration);
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::{bounded_wait, Clock, ManualClock, WaitError, WaitPolicy};
    use futures::executor::block_on;
    use std::time::Duration;

    const POLICY: WaitPolicy = WaitPolicy {
        interval: Duration::from_millis(100),
        timeout: Duration::from_millis(3000),
    };

    #[test]
    fn returns_immediately_when_probe_succeeds() {
        let clock = ManualClock::new();
        let found: Result<u8, WaitError<()>> =
            block_on(bounded_wait(&clock, POLICY, || Ok(Some(7))));
        assert_eq!(found, Ok(7));
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn succeeds_after_a_few_polls() {
        let clock = ManualClock::new();
        let observer = clock.clone();
        let found: Result<Duration, WaitError<()>> = block_on(bounded_wait(&clock, POLICY, || {
            let now = observer.now();
            Ok((now >= Duration::from_millis(300)).then_some(now))
        }));
        assert_eq!(found, Ok(Duration::from_millis(300)));
        assert_eq!(clock.sleep_count(), 3);
    }

    #[test]
    fn times_out_exactly_at_deadline() {
        let clock = ManualClock::new();
        let mut probes = 0;
        let result: Result<(), WaitError<()>> = block_on(bounded_wait(&clock, POLICY, || {
            probes += 1;
            Ok(None)
        }));
        match result {
            Err(WaitError::Timeout(timeout)) => {
                assert_eq!(timeout.waited, Duration::from_millis(3000))
            }
            other => panic!("unexpected wait result: {other:?}"),
        }
        assert_eq!(clock.elapsed(), Duration::from_millis(3000));
        assert_eq!(probes, 31);
    }

    #[test]
    fn uneven_interval_is_clamped_to_deadline() {
        let clock = ManualClock::new();
        let policy = WaitPolicy {
            interval: Duration::from_millis(700),
            timeout: Duration::from_millis(1000),
        };
        let result: Result<(), WaitError<()>> = block_on(bounded_wait(&clock, policy, || Ok(None)));
        assert!(matches!(result, Err(WaitError::Timeout(_))));
        assert_eq!(clock.elapsed(), Duration::from_millis(1000));
    }

    #[test]
    fn probe_error_stops_the_wait() {
        let clock = ManualClock::new();
        let result: Result<(), WaitError<&str>> =
            block_on(bounded_wait(&clock, POLICY, || Err("detached")));
        assert_eq!(result, Err(WaitError::Probe("detached")));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }
}
