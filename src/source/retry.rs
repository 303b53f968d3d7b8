//! Retry strategies with configurable backoff
//!
//! Downloads are retried on transport and HTTP status failures only. The
//! default policy is three attempts with a fixed 1.5 s pause between them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration with backoff strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first one
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffStrategy,

    /// Delay before the second attempt
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,

    /// Upper bound for any computed delay
    #[serde(default = "default_max_delay", with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            backoff: BackoffStrategy::default(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
        }
    }
}

impl RetryConfig {
    /// Same attempt count, no sleeping. Used by tests.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            backoff: BackoffStrategy::Fixed,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(Error::Config("retry attempts must be at least 1".to_string()));
        }
        if let BackoffStrategy::Exponential { base } = self.backoff {
            if !base.is_finite() || base < 1.0 {
                return Err(Error::Config(format!(
                    "exponential backoff base {base} must be a finite number >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// Backoff strategies for retry delays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Same delay between every attempt
    #[default]
    Fixed,
    /// Linear increase in delay
    Linear {
        #[serde(with = "humantime_serde")]
        increment: Duration,
    },
    /// Exponential increase in delay
    Exponential {
        #[serde(default = "default_exponential_base")]
        base: f64,
    },
}

/// Runs a fallible synchronous operation under a [`RetryConfig`]
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation, retrying retryable errors until the attempt
    /// budget is spent. The last error is returned unchanged.
    pub fn execute_with_retry<F, T>(&self, mut operation: F, context: &str) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation() {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", context, attempt);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.attempts {
                        return Err(err);
                    }

                    let delay = self.calculate_delay(attempt);
                    warn!(
                        "Retrying {} (attempt {}/{}) after {:?}: {}",
                        context, attempt, self.config.attempts, delay, err
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
            }
        }
    }

    /// Delay to wait after the given (1-based) failed attempt. Any delay
    /// that overflows or cannot be represented becomes `max_delay`.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let max_delay = self.config.max_delay;
        let base_delay = match &self.config.backoff {
            BackoffStrategy::Fixed => Some(self.config.initial_delay),
            BackoffStrategy::Linear { increment } => increment
                .checked_mul(attempt - 1)
                .and_then(|extra| self.config.initial_delay.checked_add(extra)),
            BackoffStrategy::Exponential { base } => {
                let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
                let secs = self.config.initial_delay.as_secs_f64() * base.powi(exponent);
                if secs.is_finite() && secs >= 0.0 {
                    Duration::try_from_secs_f64(secs.min(max_delay.as_secs_f64())).ok()
                } else {
                    None
                }
            }
        };

        base_delay.unwrap_or(max_delay).min(max_delay)
    }
}

fn default_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(1500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_exponential_base() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_first_try() {
        let executor = RetryExecutor::new(RetryConfig::immediate(3));
        let mut calls = 0;
        let result = executor.execute_with_retry(
            || {
                calls += 1;
                Ok::<_, Error>(42)
            },
            "test",
        );
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let executor = RetryExecutor::new(RetryConfig::immediate(3));
        let mut calls = 0;
        let result = executor.execute_with_retry(
            || {
                calls += 1;
                if calls < 3 {
                    Err(Error::HttpStatus("503 Service Unavailable".to_string()))
                } else {
                    Ok("body")
                }
            },
            "test",
        );
        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhaustion_returns_last_error() {
        let executor = RetryExecutor::new(RetryConfig::immediate(3));
        let mut calls = 0;
        let result: Result<()> = executor.execute_with_retry(
            || {
                calls += 1;
                Err(Error::HttpStatus(format!("failure {calls}")))
            },
            "test",
        );
        assert_eq!(calls, 3);
        match result {
            Err(Error::HttpStatus(msg)) => assert_eq!(msg, "failure 3"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_non_retryable_fails_fast() {
        let executor = RetryExecutor::new(RetryConfig::immediate(3));
        let mut calls = 0;
        let result: Result<()> = executor.execute_with_retry(
            || {
                calls += 1;
                Err(Error::Config("bad".to_string()))
            },
            "test",
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_backoff_fixed() {
        let executor = RetryExecutor::new(RetryConfig::default());
        assert_eq!(executor.calculate_delay(1), Duration::from_millis(1500));
        assert_eq!(executor.calculate_delay(2), Duration::from_millis(1500));
    }

    #[test]
    fn test_backoff_linear() {
        let executor = RetryExecutor::new(RetryConfig {
            backoff: BackoffStrategy::Linear {
                increment: Duration::from_millis(500),
            },
            initial_delay: Duration::from_secs(1),
            ..Default::default()
        });
        assert_eq!(executor.calculate_delay(1), Duration::from_secs(1));
        assert_eq!(executor.calculate_delay(3), Duration::from_secs(2));
    }

    #[test]
    fn test_backoff_exponential_capped() {
        let executor = RetryExecutor::new(RetryConfig {
            backoff: BackoffStrategy::Exponential { base: 2.0 },
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            ..Default::default()
        });
        assert_eq!(executor.calculate_delay(1), Duration::from_secs(1));
        assert_eq!(executor.calculate_delay(3), Duration::from_secs(4));
        assert_eq!(executor.calculate_delay(4), Duration::from_secs(5));
    }

    #[test]
    fn test_exponential_delay_saturates_at_high_attempts() {
        let executor = RetryExecutor::new(RetryConfig {
            backoff: BackoffStrategy::Exponential { base: 2.0 },
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            ..Default::default()
        });
        assert_eq!(executor.calculate_delay(65), Duration::from_secs(60));
        assert_eq!(executor.calculate_delay(70), Duration::from_secs(60));
        assert_eq!(executor.calculate_delay(2000), Duration::from_secs(60));
        assert_eq!(executor.calculate_delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_many_exponential_attempts_exhaust_without_panicking() {
        let executor = RetryExecutor::new(RetryConfig {
            attempts: 100,
            backoff: BackoffStrategy::Exponential { base: 2.0 },
            initial_delay: Duration::from_nanos(1),
            max_delay: Duration::ZERO,
        });
        let mut calls = 0;
        let result: Result<()> = executor.execute_with_retry(
            || {
                calls += 1;
                Err(Error::HttpStatus("503 Service Unavailable".to_string()))
            },
            "test",
        );
        assert!(result.is_err());
        assert_eq!(calls, 100);
    }

    #[test]
    fn test_negative_exponential_base_is_rejected_and_never_panics() {
        let config: RetryConfig =
            toml::from_str("backoff = { exponential = { base = -2.0 } }").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let executor = RetryExecutor::new(config);
        assert_eq!(executor.calculate_delay(2), default_max_delay());
        assert_eq!(executor.calculate_delay(4), default_max_delay());
    }

    #[test]
    fn test_validate_rejects_bad_retry_settings() {
        assert!(RetryConfig::default().validate().is_ok());
        assert!(RetryConfig::immediate(0).validate().is_err());
        for base in [0.5, f64::NAN, f64::INFINITY] {
            let config = RetryConfig {
                backoff: BackoffStrategy::Exponential { base },
                ..Default::default()
            };
            assert!(config.validate().is_err(), "base {base} accepted");
        }
    }

    #[test]
    fn test_linear_delay_overflow_saturates() {
        let executor = RetryExecutor::new(RetryConfig {
            backoff: BackoffStrategy::Linear {
                increment: Duration::MAX,
            },
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            ..Default::default()
        });
        assert_eq!(executor.calculate_delay(1), Duration::from_secs(1));
        assert_eq!(executor.calculate_delay(2), Duration::from_secs(30));
        assert_eq!(executor.calculate_delay(5), Duration::from_secs(30));
    }
}
