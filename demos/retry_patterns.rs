//! Retry Patterns Example
//!
//! Demonstrates retry policies wrapped around ordinary actions.
//! Shows practical patterns including:
//! - Basic retry of a transiently failing action
//! - Comparing backoff strategies
//! - Recording every attempt
//! - Single-use policies
//! - Loading a policy configuration from text
//!
//! Run with: cargo run --example retry_patterns

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use actionpack::prelude::*;
use actionpack::RetryConfig;

/// Fails until it has been called `succeed_on` times.
#[derive(Debug)]
struct FlakyService {
    calls: AtomicU32,
    succeed_on: u32,
}

impl FlakyService {
    fn new(succeed_on: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            succeed_on,
        }
    }
}

impl Action for FlakyService {
    type Output = String;
    type Error = String;

    fn invoke(&self) -> Result<String, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        println!("  Attempt {}", n);
        if n < self.succeed_on {
            Err(format!("connection reset on call {}", n))
        } else {
            Ok("success!".to_string())
        }
    }

    fn name(&self) -> Option<&str> {
        Some("flaky-service")
    }
}

// ==================== Basic Retry ====================

/// Example 1: Basic retry with exponential backoff
fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    let config = RetryConfig::new(5)
        .with_delay(Duration::from_millis(50))
        .with_backoff(Backoff::Exponential);

    let policy = match RetryPolicy::with_config(FlakyService::new(3), config) {
        Ok(policy) => policy,
        Err(e) => {
            println!("Invalid configuration: {}", e);
            return;
        }
    };

    match policy.perform().into_result() {
        Ok(value) => println!(
            "Success after {} retries: {}",
            policy.retries().unwrap_or_default(),
            value
        ),
        Err(e) => println!("Failed: {}", e),
    }
}

// ==================== Different Backoff Strategies ====================

/// Example 2: Comparing different backoff strategies
fn example_backoff_strategies() {
    println!("\n=== Example 2: Backoff Strategies ===");

    for backoff in [Backoff::Constant, Backoff::Linear, Backoff::Exponential] {
        let config = RetryConfig::new(5)
            .with_delay(Duration::from_secs(2))
            .with_backoff(backoff)
            .with_jitter_percentage(0);

        let delays: Vec<String> = (0..5)
            .filter_map(|i| config.delay_for_attempt(i))
            .map(|d| format!("{:?}", d))
            .collect();
        println!("{:<12} {}", backoff.to_string(), delays.join(", "));
    }

    let jittered = RetryConfig::new(3)
        .with_delay(Duration::from_secs(2))
        .with_jitter_percentage(25);
    println!("\nConstant with 25% jitter:");
    for i in 0..3 {
        if let Some(d) = jittered.delay_for_attempt(i) {
            println!("  Retry {}: {:?}", i + 1, d);
        }
    }
}

// ==================== Recording Attempts ====================

/// Example 3: Keep every attempt's outcome for inspection
fn example_recording() {
    println!("\n=== Example 3: Recording Attempts ===");

    let policy = FlakyService::new(3).retry(4).recording();
    policy.perform();

    for (i, attempt) in policy.attempts().iter().enumerate() {
        match attempt.as_result() {
            Ok(value) => println!("  #{} at {}: ok {}", i + 1, attempt.produced_at(), value),
            Err(e) => println!("  #{} at {}: failed {}", i + 1, attempt.produced_at(), e),
        }
    }
}

// ==================== Single Use ====================

/// Example 4: A policy refuses to run twice
fn example_single_use() {
    println!("\n=== Example 4: Single Use ===");

    let policy = FlakyService::new(10).retry(1);
    println!("First perform: {}", policy.perform());
    println!("Second perform: {}", policy.perform());
    println!("Expired: {}", policy.expired());
}

// ==================== Configuration from Text ====================

/// Example 5: Building a configuration from user-supplied values
fn example_parse_config() {
    println!("\n=== Example 5: Configuration from Text ===");

    for name in ["linear", "EXPONENTIAL", "fibonacci"] {
        match name.parse::<Backoff>() {
            Ok(backoff) => println!("{:>12} -> {}", name, backoff),
            Err(e) => println!("{:>12} -> {}", name, e),
        }
    }

    let config = RetryConfig::new(2).with_jitter_percentage(150);
    match RetryPolicy::with_config(FlakyService::new(1), config) {
        Ok(_) => println!("Unexpectedly accepted"),
        Err(e) => println!("Rejected: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("======================================");
    println!("       Retry Patterns Example         ");
    println!("======================================");

    example_basic_retry();
    example_backoff_strategies();
    example_recording();
    example_single_use();
    example_parse_config();

    println!("\n======================================");
    println!("           Examples Complete           ");
    println!("======================================");
}
