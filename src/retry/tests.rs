//! Behavioral tests for retry policies.

use super::*;
use crate::action::{Action, ActionExt};
use crate::clock::Timestamp;
use crate::testing::{ManualClock, Scripted};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_test::traced_test;

#[test]
fn test_always_failing_spends_every_retry() {
    let action = Arc::new(Scripted::<(), _>::always(Err("down")));
    let policy = RetryPolicy::new(action.clone(), 3);

    let outcome = policy.perform();

    match outcome.into_result() {
        Err(RetryError::Expired(exhausted)) => {
            assert_eq!(exhausted.final_error, Some("down"));
            assert_eq!(exhausted.attempts, 4);
            assert_eq!(exhausted.max_retries, 3);
        }
        other => panic!("Expected expiry, got {:?}", other),
    }
    assert_eq!(action.calls(), 4);
    assert_eq!(policy.retries(), Some(3));
    assert!(policy.expired());
}

#[test]
fn test_success_after_failures() {
    let action = Arc::new(Scripted::failing(2, "busy", 42));
    let policy = RetryPolicy::new(action.clone(), 5);

    assert_eq!(policy.perform().into_result(), Ok(42));
    assert_eq!(action.calls(), 3);
    assert_eq!(policy.retries(), Some(2));
    assert!(policy.enacted());
    assert!(!policy.expired());
}

#[test]
fn test_immediate_success() {
    let policy = Scripted::<_, ()>::always(Ok("first")).retry(3);

    assert_eq!(policy.perform().into_result(), Ok("first"));
    assert_eq!(policy.retries(), Some(0));
}

#[test]
fn test_zero_retries_is_single_attempt() {
    let config = RetryConfig::new(0).with_delay(Duration::from_secs(10));
    let action = Arc::new(Scripted::<(), _>::always(Err("nope")));
    let policy = RetryPolicy::with_config(action.clone(), config).unwrap();

    let start = Instant::now();
    assert!(!policy.perform().successful());

    // No sleep after the last failed attempt
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(action.calls(), 1);
    assert!(policy.expired());
}

#[test]
fn test_fresh_policy_state() {
    let policy = Scripted::<(), ()>::always(Ok(())).retry(2);

    assert_eq!(policy.retries(), None);
    assert!(!policy.enacted());
    assert!(!policy.expired());
    assert!(policy.attempts().is_empty());
    assert!(policy.validate().is_ok());
}

#[test]
fn test_second_perform_is_rejected_after_success() {
    let action = Arc::new(Scripted::failing(1, "once", 1));
    let policy = RetryPolicy::new(action.clone(), 3);

    assert!(policy.perform().successful());
    let second = policy.perform();

    assert_eq!(
        second.into_result(),
        Err(RetryError::Enacted { retries: 1 })
    );
    assert_eq!(action.calls(), 2);
}

#[test]
fn test_second_perform_is_rejected_after_expiry() {
    let action = Arc::new(Scripted::<(), _>::always(Err("x")));
    let policy = RetryPolicy::new(action.clone(), 1);

    policy.perform();
    let second = policy.perform();

    match second.into_result() {
        Err(RetryError::Expired(exhausted)) => {
            assert_eq!(exhausted.final_error, None);
            assert_eq!(exhausted.attempts, 2);
        }
        other => panic!("Expected expiry, got {:?}", other),
    }
    assert_eq!(action.calls(), 2);
}

#[test]
fn test_try_perform_raises_retry_error() {
    let policy = Scripted::<(), _>::always(Err("boom")).retry(0);
    let err = policy.try_perform().unwrap_err();
    assert!(err.is_expired());
    assert_eq!(err.final_error(), Some(&"boom"));
}

#[test]
fn test_recording_keeps_every_attempt() {
    let clock = Arc::new(ManualClock::new(Timestamp::from_micros(0)).with_tick(Duration::from_micros(1)));
    let policy = Scripted::failing(2, "flaky", "done")
        .retry(4)
        .recording()
        .with_clock(clock);

    assert!(policy.should_record());
    assert_eq!(policy.perform().into_result(), Ok("done"));

    let attempts = policy.attempts();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[0].error(), Some(&"flaky"));
    assert_eq!(attempts[1].error(), Some(&"flaky"));
    assert_eq!(attempts[2].value(), Some(&"done"));
    assert_eq!(attempts[0].produced_at(), Timestamp::from_micros(0));
    assert_eq!(attempts[2].produced_at(), Timestamp::from_micros(2));
}

#[test]
fn test_recording_on_expiry_keeps_failures() {
    let policy = Scripted::<(), _>::always(Err("e")).retry(2).recording();
    policy.perform();

    assert_eq!(policy.attempts().len(), 3);
    assert!(policy.attempts().iter().all(|o| !o.successful()));
}

#[test]
fn test_attempts_readable_alongside_counters() {
    let policy = Scripted::failing(1, "busy", 7).retry(2).recording();
    policy.perform();

    assert!(policy.attempts().len() as u32 == policy.retries().unwrap() + 1);
    assert!(policy.attempts().last().is_some_and(|o| o.successful()) && policy.enacted());
    assert!(!policy.attempts().is_empty() && !policy.expired());

    let attempts = policy.attempts();
    assert_eq!(attempts.len(), 2);
    assert!(format!("{:?}", policy).contains("retries: Some(1)"));
}

#[test]
fn test_without_recording_log_stays_empty() {
    let policy = Scripted::<(), _>::always(Err("e")).retry(2);
    policy.perform();
    assert!(!policy.should_record());
    assert!(policy.attempts().is_empty());
}

#[test]
fn test_sleeps_between_attempts() {
    let config = RetryConfig::new(2)
        .with_delay(Duration::from_millis(20))
        .with_jitter_percentage(0);
    let policy = RetryPolicy::with_config(Scripted::<(), _>::always(Err("slow")), config).unwrap();

    let start = Instant::now();
    policy.perform();

    // Two sleeps of 20ms: after attempt 1 and 2, none after attempt 3
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = RetryConfig::new(1).with_jitter_percentage(200);
    let result = RetryPolicy::with_config(Scripted::<(), ()>::always(Ok(())), config);
    assert_eq!(
        result.err(),
        Some(crate::ConstructionError::JitterOutOfRange(200))
    );
}

#[test]
fn test_name_falls_back_to_inner_action() {
    let unnamed = Scripted::<(), ()>::always(Ok(())).named("fetch").retry(1);
    assert_eq!(unnamed.name(), Some("fetch"));

    let renamed = Scripted::<(), ()>::always(Ok(()))
        .named("fetch")
        .retry(1)
        .with_name("fetch-with-retries");
    assert_eq!(renamed.name(), Some("fetch-with-retries"));
}

#[test]
fn test_describe() {
    let policy = Scripted::<(), ()>::always(Ok(())).retry(2);
    assert_eq!(policy.describe(), "<RetryPolicy(3 x <Scripted>)>");

    let config = RetryConfig::new(1).with_delay(Duration::from_secs(2));
    let policy = RetryPolicy::with_config(Scripted::<(), ()>::always(Ok(())), config)
        .unwrap()
        .with_name("poll");
    assert_eq!(
        policy.to_string(),
        "<RetryPolicy(2 x <Scripted> | 2s delay)|name=\"poll\">"
    );
}

#[test]
fn test_concurrent_performs_enact_once() {
    let action = Arc::new(Scripted::<(), _>::always(Err("x")).with_delay(Duration::from_millis(20)));
    let policy = Arc::new(RetryPolicy::new(action.clone(), 1));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let policy = Arc::clone(&policy);
            thread::spawn(move || policy.perform())
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let enactments = outcomes
        .iter()
        .filter(|o| o.error().and_then(RetryError::final_error).is_some())
        .count();
    assert_eq!(enactments, 1);
    assert_eq!(action.calls(), 2);
}

#[test]
fn test_policies_compare_by_configuration_and_progress() {
    use crate::action::Call;

    fn ping(_: &()) -> Result<(), String> {
        Ok(())
    }

    let a = Call::new(crate::closure!(ping, ())).retry(2);
    let b = Call::new(crate::closure!(ping, ())).retry(2);
    let c = Call::new(crate::closure!(ping, ())).retry(3);
    assert_eq!(a, b);
    assert_ne!(a, c);

    a.perform();
    assert_ne!(a, b);
}

#[test]
#[traced_test]
fn test_failed_attempts_are_logged() {
    let policy = Scripted::failing(1, "transient", ()).retry(2);
    policy.perform();

    assert!(logs_contain("attempt failed, retrying"));
    assert!(logs_contain("attempt succeeded"));
    assert!(!logs_contain("retries exhausted"));
}

#[test]
#[traced_test]
fn test_expiry_is_logged() {
    let policy = Scripted::<(), _>::always(Err("permanent")).retry(0);
    policy.perform();

    assert!(logs_contain("retries exhausted"));
}
