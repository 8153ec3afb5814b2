//! Retry policy for node execution.

use std::time::Duration;

/// How a failed node execution should be retried.
///
/// Set via [`super::StateGraph::with_retry_policy`]; applied by
/// [`super::CompiledStateGraph::invoke`] around each `Node::run`/`run_with_context` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetryPolicy {
    /// No retries: the first error is returned immediately.
    None,
    /// Exponential backoff: `max_attempts` total tries (including the first),
    /// starting at `initial_delay` and multiplying by `multiplier` each retry,
    /// capped at `max_delay`.
    Exponential {
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    /// Builds an exponential backoff policy.
    pub fn exponential(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Self {
        RetryPolicy::Exponential {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Delay before the given retry attempt (1-indexed: the first retry is `attempt = 1`).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Exponential {
                initial_delay,
                max_delay,
                multiplier,
                ..
            } => {
                let scaled = initial_delay.as_secs_f64() * multiplier.powi(attempt.saturating_sub(1) as i32);
                Duration::from_secs_f64(scaled).min(*max_delay)
            }
        }
    }

    /// Maximum number of attempts (including the first), or 1 for `None`.
    pub fn max_attempts(&self) -> u32 {
        match self {
            RetryPolicy::None => 1,
            RetryPolicy::Exponential { max_attempts, .. } => *max_attempts,
        }
    }
}
