//! Retry schedules for injection and activation.

use std::time::Duration;

use stylescope_config::{HandshakeConfig, InjectionConfig};

/// How the wait grows with the attempt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `attempt * step`
    Linear { step: Duration },
    /// `min(attempt * step, max)`
    Capped { step: Duration, max: Duration },
}

/// Bounded retry schedule. Attempts are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Linear { step },
        }
    }

    pub fn capped(max_attempts: u32, step: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Capped { step, max },
        }
    }

    /// Wait associated with `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Linear { step } => step.saturating_mul(attempt),
            Backoff::Capped { step, max } => step.saturating_mul(attempt).min(max),
        }
    }

    /// Whether another attempt may follow `attempt`.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&InjectionConfig::default())
    }
}

impl From<&InjectionConfig> for RetryPolicy {
    fn from(config: &InjectionConfig) -> Self {
        Self::linear(config.max_attempts, config.base_delay())
    }
}

impl From<&HandshakeConfig> for RetryPolicy {
    fn from(config: &HandshakeConfig) -> Self {
        Self::capped(
            config.max_attempts,
            Duration::from_millis(config.step_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_schedule() {
        let policy = RetryPolicy::from(&InjectionConfig::default());
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay(1), Duration::from_millis(500));
        assert_eq!(policy.delay(2), Duration::from_millis(1000));
        assert_eq!(policy.delay(3), Duration::from_millis(1500));
    }

    #[test]
    fn test_handshake_schedule_is_capped() {
        let policy = RetryPolicy::from(&HandshakeConfig::default());
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(3), Duration::from_millis(300));
        assert_eq!(policy.delay(10), Duration::from_millis(1000));
        assert_eq!(policy.delay(50), Duration::from_millis(1000));
    }

    #[test]
    fn test_has_next() {
        let policy = RetryPolicy::linear(3, Duration::from_millis(1));
        assert!(policy.has_next(1));
        assert!(policy.has_next(2));
        assert!(!policy.has_next(3));
    }
}
