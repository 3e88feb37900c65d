//! Behavioral tests for the action contract and its combinators.

use super::*;
use crate::clock::{Clock, Timestamp};
use crate::outcome::Outcome;
use crate::sync::PerformLock;
use crate::testing::{ManualClock, Scripted};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_test::traced_test;

fn halve(n: &i32) -> Result<i32, String> {
    if n % 2 == 0 {
        Ok(n / 2)
    } else {
        Err(format!("{} is odd", n))
    }
}

struct Guarded {
    allowed: bool,
    invoked: AtomicUsize,
}

impl Action for Guarded {
    type Output = &'static str;
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        if self.allowed {
            Ok(())
        } else {
            Err("not allowed".to_string())
        }
    }

    fn invoke(&self) -> Result<&'static str, String> {
        self.invoked.fetch_add(1, Ordering::SeqCst);
        Ok("done")
    }
}

#[test]
fn test_validation_failure_skips_invoke() {
    let action = Guarded {
        allowed: false,
        invoked: AtomicUsize::new(0),
    };

    let outcome = action.perform();

    assert_eq!(outcome.error().map(String::as_str), Some("not allowed"));
    assert_eq!(action.invoked.load(Ordering::SeqCst), 0);
}

#[test]
fn test_successful_iff_no_failure() {
    assert!(Call::new(crate::closure!(halve, 4)).perform().successful());
    assert!(!Call::new(crate::closure!(halve, 5)).perform().successful());
}

#[test]
fn test_outcome_uses_supplied_clock() {
    let clock = ManualClock::new(Timestamp::from_micros(1_234));
    let outcome = Call::new(crate::closure!(halve, 2)).perform_with(&clock);
    assert_eq!(outcome.produced_at(), Timestamp::from_micros(1_234));
}

#[test]
fn test_try_perform_returns_failure_directly() {
    let failed = Call::new(crate::closure!(halve, 7)).try_perform();
    assert_eq!(failed.unwrap_err(), "7 is odd");

    let ok = Call::new(crate::closure!(halve, 8)).try_perform().unwrap();
    assert_eq!(ok.into_result(), Ok(4));
}

#[test]
fn test_describe_with_and_without_name() {
    let call = Call::new(crate::closure!(halve, 2));
    assert_eq!(call.describe(), "<Call>");
    assert_eq!(call.named("split").describe(), "<Call|name=\"split\">");
}

#[test]
fn test_box_and_arc_forward() {
    let boxed: BoxedAction<i32, String> = Call::new(crate::closure!(halve, 6)).named("b").boxed();
    assert_eq!(boxed.name(), Some("b"));
    assert_eq!(boxed.describe(), "<Call|name=\"b\">");
    assert_eq!(boxed.perform().into_result(), Ok(3));

    let shared = Arc::new(Call::new(crate::closure!(halve, 10)));
    assert_eq!(shared.kind(), "Call");
    assert_eq!(shared.perform().into_result(), Ok(5));
}

#[test]
fn test_map_and_map_err() {
    let doubled = Call::new(crate::closure!(halve, 8)).map(|n| n * 2);
    assert_eq!(doubled.perform().into_result(), Ok(8));

    let wrapped = Call::new(crate::closure!(halve, 3)).map_err(|e| e.len());
    assert_eq!(wrapped.perform().into_result(), Err("3 is odd".len()));
}

#[test]
fn test_and_then_chains_values() {
    let chain = Call::new(crate::closure!(halve, 16))
        .and_then(|n| Call::new(crate::closure!(halve, n)))
        .and_then(|n| Call::new(crate::closure!(halve, n)));

    assert_eq!(chain.perform().into_result(), Ok(2));
}

#[test]
fn test_and_then_short_circuits() {
    let next_built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&next_built);

    let chain = Call::new(crate::closure!(halve, 3)).and_then(move |n| {
        counter.fetch_add(1, Ordering::SeqCst);
        Call::new(crate::closure!(halve, n))
    });

    assert_eq!(chain.perform().into_result(), Err("3 is odd".to_string()));
    assert_eq!(next_built.load(Ordering::SeqCst), 0);
}

#[test]
fn test_reaction_runs_on_success_and_failure() {
    let reaction_calls = Arc::new(Scripted::<_, String>::always(Ok(())));

    let ok = Call::new(crate::closure!(halve, 2)).with_reaction(Arc::clone(&reaction_calls));
    let failed = Call::new(crate::closure!(halve, 1)).with_reaction(Arc::clone(&reaction_calls));

    assert!(ok.perform().successful());
    assert!(!failed.perform().successful());
    assert_eq!(reaction_calls.calls(), 2);
    assert_eq!(ok.take_reactions().len(), 1);
    assert_eq!(failed.take_reactions().len(), 1);
    assert!(ok.take_reactions().is_empty());
}

#[test]
fn test_reaction_runs_after_validation_failure() {
    let guarded = Guarded {
        allowed: false,
        invoked: AtomicUsize::new(0),
    }
    .with_reaction(Scripted::<_, String>::always(Ok(1)));

    assert!(!guarded.perform().successful());
    let reactions = guarded.take_reactions();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].value(), Some(&1));
}

#[test]
fn test_reaction_failure_is_captured_not_raised() {
    let action = Call::new(crate::closure!(halve, 2))
        .with_reaction(Scripted::<(), _>::always(Err("log sink down".to_string())));

    let outcome = action.perform();

    assert_eq!(outcome.into_result(), Ok(1));
    let reactions = action.take_reactions();
    assert_eq!(
        reactions[0].error().map(String::as_str),
        Some("log sink down")
    );
}

#[test]
fn test_reaction_failure_is_raised_when_requested() {
    let action = Call::new(crate::closure!(halve, 2))
        .with_reaction(Scripted::<(), _>::always(Err("log sink down".to_string())));

    assert_eq!(action.try_perform().unwrap_err(), "log sink down");
}

#[test]
fn test_primary_failure_wins_over_reaction_failure() {
    let action = Call::new(crate::closure!(halve, 3))
        .with_reaction(Scripted::<(), _>::always(Err("reaction".to_string())));

    assert_eq!(action.try_perform().unwrap_err(), "3 is odd");
}

#[test]
fn test_reaction_log_can_be_capped() {
    let clock = ManualClock::new(Timestamp::from_micros(0)).with_tick(Duration::from_micros(1));
    let capped = Call::new(crate::closure!(halve, 2))
        .with_reaction(Scripted::<_, String>::always(Ok(())))
        .retaining(2);
    let silent = Call::new(crate::closure!(halve, 2))
        .with_reaction(Scripted::<_, String>::always(Ok(())))
        .retaining(0);

    for _ in 0..5 {
        assert!(capped.perform_with(&clock).successful());
        assert!(silent.perform().successful());
    }

    let kept = capped.take_reactions();
    assert_eq!(kept.len(), 2);
    assert!(kept[0].produced_at() < kept[1].produced_at());
    assert_eq!(kept[1].produced_at(), Timestamp::from_micros(8));
    assert!(silent.take_reactions().is_empty());
}

#[test]
fn test_reaction_outcomes_share_clock() {
    let clock = ManualClock::new(Timestamp::from_micros(0)).with_tick(Duration::from_micros(10));
    let action =
        Call::new(crate::closure!(halve, 2)).with_reaction(Scripted::<_, String>::always(Ok(())));

    let outcome: Outcome<i32, String> = action.perform_with(&clock);
    let reactions = action.take_reactions();

    // Reaction runs first, so its outcome is stamped earlier
    assert_eq!(reactions[0].produced_at(), Timestamp::from_micros(0));
    assert_eq!(outcome.produced_at(), Timestamp::from_micros(10));
    assert_eq!(clock.now(), Timestamp::from_micros(20));
}

#[test]
fn test_synchronized_serializes_performs() {
    struct Tracker {
        active: Arc<AtomicUsize>,
        overlaps: Arc<AtomicUsize>,
    }

    impl Action for Tracker {
        type Output = ();
        type Error = ();

        fn invoke(&self) -> Result<(), ()> {
            if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let lock = PerformLock::new();
    let active = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let action = Tracker {
                active: Arc::clone(&active),
                overlaps: Arc::clone(&overlaps),
            }
            .synchronized(lock.clone());
            thread::spawn(move || {
                for _ in 0..3 {
                    assert!(action.perform().successful());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn test_synchronized_keeps_reaction_semantics() {
    let action = Call::new(crate::closure!(halve, 2))
        .with_reaction(Scripted::<(), _>::always(Err("log sink down".to_string())))
        .synchronized(PerformLock::new());

    assert_eq!(action.try_perform().unwrap_err(), "log sink down");

    let outcome = action.perform();
    assert_eq!(outcome.into_result(), Ok(1));
}

#[test]
fn test_synchronized_is_reentrant() {
    let lock = PerformLock::new();
    let inner = Call::new(crate::closure!(halve, 8)).synchronized(lock.clone());
    let outer = Call::new(crate::closure!(halve, 4))
        .and_then(move |_| Call::new(crate::closure!(halve, 8)).synchronized(lock.clone()))
        .synchronized(inner.lock().clone());

    assert_eq!(outer.perform().into_result(), Ok(4));
    assert!(outer.lock().same_as(inner.lock()));
}

#[test]
fn test_named_overrides_name_only() {
    let named = Call::new(crate::closure!(halve, 2)).with_name("inner").named("outer");
    assert_eq!(named.name(), Some("outer"));
    assert_eq!(named.inner().name(), Some("inner"));
    assert_eq!(named.kind(), "Call");
}

#[test]
#[traced_test]
fn test_failures_are_logged() {
    Call::new(crate::closure!(halve, 9)).named("odd").perform();
    assert!(logs_contain("action failed"));
}
