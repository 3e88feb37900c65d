//! Integration tests for retry policies through the public API.

use actionpack::prelude::*;
use actionpack::testing::Scripted;
use actionpack::{assert_failure_matches, RetryConfig, RetryExhausted};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Succeeds once it has been called `needed` times.
#[derive(Debug)]
struct Warmup {
    calls: AtomicU32,
    needed: u32,
}

impl Action for Warmup {
    type Output = u32;
    type Error = String;

    fn invoke(&self) -> Result<u32, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.needed {
            Ok(n)
        } else {
            Err(format!("cold after {} calls", n))
        }
    }
}

#[test]
fn test_retry_until_warm() {
    let policy = Warmup {
        calls: AtomicU32::new(0),
        needed: 3,
    }
    .retry(5);

    assert_eq!(policy.perform().into_result(), Ok(3));
    assert_eq!(policy.retries(), Some(2));
}

#[test]
fn test_exhaustion_reports_final_error() {
    let policy = Warmup {
        calls: AtomicU32::new(0),
        needed: 10,
    }
    .retry(2);

    match policy.perform().into_result() {
        Err(RetryError::Expired(RetryExhausted {
            final_error,
            attempts,
            max_retries,
            ..
        })) => {
            assert_eq!(final_error.as_deref(), Some("cold after 3 calls"));
            assert_eq!(attempts, 3);
            assert_eq!(max_retries, 2);
        }
        other => panic!("Expected expiry, got {:?}", other),
    }
    assert_eq!(policy.retries(), Some(2));
}

#[test]
fn test_policy_is_single_use() {
    let policy = Scripted::<_, ()>::always(Ok(1)).retry(3);
    assert_eq!(policy.perform().into_result(), Ok(1));
    assert_failure_matches!(policy.perform(), RetryError::Enacted { retries: 0 });
}

#[test]
fn test_linear_backoff_waits_between_attempts() {
    let config = RetryConfig::new(2)
        .with_delay(Duration::from_millis(10))
        .with_backoff(Backoff::Linear)
        .with_jitter_percentage(0);
    let policy = RetryPolicy::with_config(Scripted::<(), _>::always(Err("x")), config).unwrap();

    let start = std::time::Instant::now();
    policy.perform();

    // 10ms after the first failure, 20ms after the second, nothing after the third
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_max_delay_caps_backoff() {
    let config = RetryConfig::new(3)
        .with_delay(Duration::from_secs(2))
        .with_backoff(Backoff::Exponential)
        .with_max_delay(Duration::from_millis(1))
        .with_jitter_percentage(0);
    let policy = RetryPolicy::with_config(Scripted::<(), _>::always(Err("x")), config).unwrap();

    let start = std::time::Instant::now();
    policy.perform();

    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(policy.expired());
}

#[test]
fn test_retry_inside_reaction_chain() {
    let audit = Arc::new(Scripted::<_, String>::always(Ok(())));
    let policy = Scripted::failing(1, "flaky".to_string(), 5)
        .with_reaction(Arc::clone(&audit))
        .retry(2);

    assert_eq!(policy.perform().into_result(), Ok(5));
    // One reaction per inner attempt
    assert_eq!(audit.calls(), 2);
}

#[test]
fn test_retry_error_displays_cause() {
    let policy = Scripted::<(), _>::always(Err("disk full")).retry(1);
    let err = policy.try_perform().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("2 attempts"));
    assert!(message.contains("disk full"));
}

#[test]
fn test_parse_backoff_names() {
    let parsed: Vec<Backoff> = ["constant", "LINEAR", "Exponential"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(
        parsed,
        vec![Backoff::Constant, Backoff::Linear, Backoff::Exponential]
    );
}
