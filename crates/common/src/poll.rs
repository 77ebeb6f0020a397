//! Polling of long-running vendor jobs
//!
//! Vendor tasks (Replicate predictions, Runway generations) are started
//! with one request and then polled until they settle. [`poll_until`]
//! sleeps according to a [`Backoff`] before every check and gives up
//! after [`PollPolicy::max_attempts`] checks.

use std::future::Future;
use std::time::Duration;

/// Delay schedule between polls.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Same delay before every check.
    Fixed(Duration),
    /// `(attempts_below, delay)` thresholds checked in order, then `otherwise`.
    Stepped {
        steps: Vec<(u32, Duration)>,
        otherwise: Duration,
    },
    /// `initial + step * attempt`, clamped to `max`.
    Linear {
        initial: Duration,
        step: Duration,
        max: Duration,
    },
}

impl Backoff {
    /// Delay before check number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Stepped { steps, otherwise } => steps
                .iter()
                .find(|(below, _)| attempt < *below)
                .map(|(_, delay)| *delay)
                .unwrap_or(*otherwise),
            Backoff::Linear { initial, step, max } => {
                let grown = initial.saturating_add(step.saturating_mul(attempt));
                grown.min(*max)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl PollPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Upper bound on the total time spent sleeping.
    pub fn max_wait(&self) -> Duration {
        (0..self.max_attempts)
            .map(|attempt| self.backoff.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    Ready(T),
    /// Still running; carries the vendor's status string for logging.
    Pending(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<T> {
    pub value: T,
    /// Number of checks performed, including the successful one.
    pub attempts: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    #[error("{label} still pending after {attempts} attempts (last status: {last_status})")]
    Exhausted {
        label: String,
        attempts: u32,
        last_status: String,
    },

    #[error("{0}")]
    Check(E),
}

/// Poll `check` until it reports [`PollStatus::Ready`], fails, or the
/// policy runs out of attempts.
pub async fn poll_until<T, E, F, Fut>(
    policy: &PollPolicy,
    label: &str,
    mut check: F,
) -> Result<PollOutcome<T>, PollError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, E>>,
{
    let mut last_status = String::from("unknown");

    for attempt in 0..policy.max_attempts {
        let delay = policy.backoff.delay_for(attempt);
        tokio::time::sleep(delay).await;

        match check(attempt).await.map_err(PollError::Check)? {
            PollStatus::Ready(value) => {
                tracing::debug!(label, attempts = attempt + 1, "Poll finished");
                return Ok(PollOutcome {
                    value,
                    attempts: attempt + 1,
                });
            }
            PollStatus::Pending(status) => {
                tracing::debug!(
                    label,
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    status = %status,
                    delay_ms = delay.as_millis() as u64,
                    "Still waiting"
                );
                last_status = status;
            }
        }
    }

    tracing::warn!(label, attempts = policy.max_attempts, "Polling gave up");
    Err(PollError::Exhausted {
        label: label.to_string(),
        attempts: policy.max_attempts,
        last_status,
    })
}
