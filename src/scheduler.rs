//! Delayed background scripts.
//!
//! A script is plain data: an ordered list of [`Step`]s, each pairing a delay
//! with an action. [`Scheduler::run`] spawns a task that sleeps for each delay
//! (scaled by the configured time scale) and hands the action to a callback.
//! Scripts are never cancelled; the callback may stop one early by returning
//! `false`.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// One entry of a timed script: wait `delay`, then perform `action`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<A> {
    pub delay: Duration,
    pub action: A,
}

impl<A> Step<A> {
    pub fn after_ms(delay_ms: u64, action: A) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            action,
        }
    }
}

/// Largest accepted time scale; anything above is clamped to it.
pub const MAX_TIME_SCALE: f64 = 1000.0;

/// Runs simulated latencies and scripts on the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    time_scale: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl Scheduler {
    /// A negative or non-finite scale is treated as 0 (no waiting).
    pub fn new(time_scale: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale.min(MAX_TIME_SCALE)
        } else {
            0.0
        };
        Self { time_scale }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.time_scale).unwrap_or(Duration::MAX)
    }

    /// Sleep for a simulated latency.
    pub async fn delay(&self, delay: Duration) {
        let scaled = self.scaled(delay);
        if !scaled.is_zero() {
            sleep(scaled).await;
        }
    }

    pub async fn delay_ms(&self, delay_ms: u64) {
        self.delay(Duration::from_millis(delay_ms)).await;
    }

    /// Spawn `steps` on a background task, calling `apply` after each delay.
    pub fn run<A, F, Fut>(&self, steps: Vec<Step<A>>, mut apply: F) -> JoinHandle<()>
    where
        A: Send + 'static,
        F: FnMut(A) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let scheduler = *self;
        tokio::spawn(async move {
            for step in steps {
                scheduler.delay(step.delay).await;
                if !apply(step.action).await {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[test]
    fn scale_multiplies_delays() {
        let scheduler = Scheduler::new(0.5);
        assert_eq!(
            scheduler.scaled(Duration::from_millis(3000)),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn huge_scale_is_clamped_and_never_overflows() {
        let scheduler = Scheduler::new(1e20);
        assert_eq!(scheduler.time_scale(), MAX_TIME_SCALE);
        assert_eq!(
            scheduler.scaled(Duration::from_millis(500)),
            Duration::from_millis(500_000)
        );
        assert_eq!(scheduler.scaled(Duration::MAX), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_scale_delay_does_not_panic() {
        let scheduler = Scheduler::new(1e20);
        let finished = tokio::time::timeout(
            Duration::from_secs(1),
            scheduler.delay(Duration::from_millis(500)),
        )
        .await;
        assert!(finished.is_err());
    }

    #[test]
    fn invalid_scale_means_instant() {
        assert_eq!(Scheduler::new(-2.0).time_scale(), 0.0);
        assert_eq!(Scheduler::new(f64::NAN).time_scale(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_run_in_order_after_their_delays() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let steps = vec![Step::after_ms(100, "a"), Step::after_ms(200, "b")];

        let log = Arc::clone(&seen);
        Scheduler::default()
            .run(steps, move |action| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push((action, start.elapsed()));
                    true
                }
            })
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], ("a", Duration::from_millis(100)));
        assert_eq!(seen[1], ("b", Duration::from_millis(300)));
    }

    #[tokio::test(start_paused = true)]
    async fn returning_false_stops_the_script() {
        let count = Arc::new(Mutex::new(0));
        let steps = vec![Step::after_ms(10, ()), Step::after_ms(10, ()), Step::after_ms(10, ())];

        let counter = Arc::clone(&count);
        Scheduler::default()
            .run(steps, move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    *counter.lock().unwrap() += 1;
                    false
                }
            })
            .await
            .unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
