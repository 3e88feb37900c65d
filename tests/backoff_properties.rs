//! Property-based tests for backoff arithmetic

use actionpack::{Backoff, RetryConfig};
use proptest::prelude::*;
use std::time::Duration;

fn any_backoff() -> impl Strategy<Value = Backoff> {
    prop_oneof![
        Just(Backoff::Constant),
        Just(Backoff::Linear),
        Just(Backoff::Exponential),
    ]
}

/// The base the jitter spread is measured against: sub-ten bases scaled to order zero.
fn scaled_base(base: f64) -> f64 {
    let order = base.abs().log10().floor();
    if order < 1.0 {
        (10f64.powf(order.abs()) * base).abs()
    } else {
        base.abs()
    }
}

proptest! {
    #[test]
    fn prop_zero_base_never_delays(
        backoff in any_backoff(),
        attempt in 0u32..64,
        jitter in 0u8..=100,
    ) {
        prop_assert_eq!(backoff.calculate(attempt, 0.0, jitter), 0.0);
    }

    #[test]
    fn prop_jitter_stays_within_percentage(
        backoff in any_backoff(),
        attempt in 0u32..6,
        base in 0.001f64..50.0,
        jitter in 0u8..=100,
    ) {
        let curve = backoff.curve(attempt, base);
        let spread = f64::from(jitter) / 100.0 * scaled_base(base);
        let delay = backoff.calculate(attempt, base, jitter);
        let tolerance = 1e-9 * curve.abs().max(1.0);
        prop_assert!(delay >= curve - spread - tolerance);
        prop_assert!(delay <= curve + spread + tolerance);
    }

    #[test]
    fn prop_curves_never_shrink(
        backoff in any_backoff(),
        attempt in 0u32..10,
        base in 0.001f64..100.0,
    ) {
        prop_assert!(backoff.curve(attempt + 1, base) >= backoff.curve(attempt, base));
    }

    #[test]
    fn prop_linear_is_multiple_of_base(attempt in 0u32..100, base in 1u32..10) {
        let base = f64::from(base);
        prop_assert_eq!(Backoff::Linear.curve(attempt, base), f64::from(attempt + 1) * base);
    }

    #[test]
    fn prop_delay_respects_cap(
        backoff in any_backoff(),
        attempt in 0u32..32,
        base_ms in 0u64..10_000,
        cap_ms in 0u64..60_000,
        jitter in 0u8..=100,
    ) {
        let delay = backoff.delay(
            attempt,
            Duration::from_millis(base_ms),
            jitter,
            Duration::from_millis(cap_ms),
        );
        prop_assert!(delay <= Duration::from_millis(cap_ms));
    }

    #[test]
    fn prop_no_delay_after_last_attempt(max_retries in 0u32..20, base_ms in 0u64..1_000) {
        let config = RetryConfig::new(max_retries).with_delay(Duration::from_millis(base_ms));
        prop_assert!(config.delay_for_attempt(max_retries).is_none());
        for attempt in 0..max_retries {
            prop_assert!(config.delay_for_attempt(attempt).is_some());
        }
    }

    #[test]
    fn prop_jitter_range_is_validated(jitter in any::<u8>()) {
        let result = RetryConfig::new(1).with_jitter_percentage(jitter).validate();
        prop_assert_eq!(result.is_ok(), jitter <= 100);
    }
}
