//! Cooperative cancellation for estimation requests.
//!
//! Stages never look at the token; the estimator checks it between stages,
//! so a partially extracted cloud or half-fitted plane is never observed.
use crate::error::{EstimationError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancel flag plus an optional deadline for the whole request.
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `Err` once the request was cancelled or its deadline passed.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(EstimationError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(EstimationError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert_eq!(token.check(), Ok(()));
        other.cancel();
        assert_eq!(token.check(), Err(EstimationError::Cancelled));
    }

    #[test]
    fn expired_deadline_is_reported() {
        let token = CancellationToken::with_deadline(Instant::now());
        assert_eq!(token.check(), Err(EstimationError::DeadlineExceeded));
        let roomy = CancellationToken::with_timeout(Duration::from_secs(3600));
        assert_eq!(roomy.check(), Ok(()));
    }
}
