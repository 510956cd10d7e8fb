use crate::error::Error;
use crate::model::{RetryCondition, RetryEvent};
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Re-runs an operation on a recognised failure, waiting between attempts
/// according to a fixed schedule.
///
/// A schedule of `k` waits allows `k` retries, `k + 1` attempts in total.
/// Each retryable failure is published on the events channel before the
/// schedule is consulted.
#[derive(Debug, Clone)]
pub struct Retrier {
    wait_times: Vec<Duration>,
    events: broadcast::Sender<RetryEvent>,
}

impl Retrier {
    pub fn new(wait_times: Vec<Duration>, events: broadcast::Sender<RetryEvent>) -> Self {
        Self { wait_times, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RetryEvent> {
        self.events.subscribe()
    }

    /// Run `operation` until it succeeds, fails with an error `condition`
    /// does not recognise, or the schedule runs out.
    pub async fn retry<T, F, Fut>(
        &self,
        condition: RetryCondition,
        mut operation: F,
    ) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 0;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if condition.is_retryable(&error) => error,
                Err(error) => return Err(error),
            };

            let delay = self.wait_times.get(attempt).copied();
            self.notify(RetryEvent {
                condition,
                attempt,
                delay,
                error: error.clone(),
            });

            let Some(delay) = delay else {
                warn!(?condition, attempts = attempt + 1, "Retries exhausted");
                return Err(Error::MaxRetriesReached {
                    attempts: attempt + 1,
                    source: Box::new(error),
                });
            };

            warn!(?condition, attempt, ?delay, error = %error, "Retryable error, backing off");
            sleep(delay).await;
            attempt += 1;
        }
    }

    fn notify(&self, event: RetryEvent) {
        // Fails only when nobody is subscribed
        if self.events.send(event).is_err() {
            debug!("No retry event subscribers");
        }
    }
}
