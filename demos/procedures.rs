//! Procedures Example
//!
//! Demonstrates running batches of actions:
//! - Sequential execution in declaration order
//! - Concurrent execution in completion order
//! - Keyed results
//! - Serializing actions that share state
//!
//! Run with: cargo run --example procedures

use std::sync::Arc;
use std::time::{Duration, Instant};

use actionpack::prelude::*;
use parking_lot::Mutex;

/// Pretends to fetch a document, taking `latency` to do so.
#[derive(Debug)]
struct Fetch {
    url: String,
    latency: Duration,
}

impl Action for Fetch {
    type Output = usize;
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        if self.url.starts_with("https://") {
            Ok(())
        } else {
            Err(format!("refusing insecure url {}", self.url))
        }
    }

    fn invoke(&self) -> Result<usize, String> {
        std::thread::sleep(self.latency);
        Ok(self.url.len() * 100)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.url)
    }
}

fn fetches() -> Vec<Fetch> {
    [
        ("https://example.com/slow", 300),
        ("https://example.com/fast", 50),
        ("http://example.com/insecure", 10),
        ("https://example.com/medium", 150),
    ]
    .into_iter()
    .map(|(url, ms)| Fetch {
        url: url.to_string(),
        latency: Duration::from_millis(ms),
    })
    .collect()
}

/// Example 1: Sequential execution
fn example_sequential() -> Result<(), ProcedureError> {
    println!("\n=== Example 1: Sequential ===");

    let procedure = Procedure::new(fetches());
    let start = Instant::now();
    for outcome in procedure.execute(ExecuteOptions::default())? {
        println!("  {:?}", outcome.into_result());
    }
    println!("Took {:?}", start.elapsed());
    Ok(())
}

/// Example 2: Concurrent execution, keyed by url
fn example_concurrent() -> Result<(), ProcedureError> {
    println!("\n=== Example 2: Concurrent, keyed ===");

    let procedure = KeyedProcedure::new(fetches())?;
    let start = Instant::now();
    for (url, outcome) in procedure.execute(ExecuteOptions::default().concurrently(4))? {
        match outcome.into_result() {
            Ok(bytes) => println!("  {} -> {} bytes", url, bytes),
            Err(e) => println!("  {} -> {}", url, e),
        }
    }
    println!("Took {:?}", start.elapsed());
    Ok(())
}

/// Appends to a log that is not thread safe on its own.
#[derive(Debug)]
struct AppendLog {
    log: Arc<Mutex<Vec<String>>>,
    entry: &'static str,
}

impl Action for AppendLog {
    type Output = ();
    type Error = String;

    fn invoke(&self) -> Result<(), String> {
        let before = self.log.lock().len();
        std::thread::sleep(Duration::from_millis(10));
        let mut log = self.log.lock();
        if log.len() != before {
            return Err(format!("{} raced another writer", self.entry));
        }
        log.push(self.entry.to_string());
        Ok(())
    }
}

/// Example 3: Serializing actions that share state
fn example_synchronized() -> Result<(), ProcedureError> {
    println!("\n=== Example 3: Synchronized ===");

    let log = Arc::new(Mutex::new(Vec::new()));
    let lock = PerformLock::new();
    let procedure = Procedure::new(["a", "b", "c", "d"].map(|entry| {
        AppendLog {
            log: Arc::clone(&log),
            entry,
        }
        .synchronized(lock.clone())
    }));

    let failures = procedure
        .execute(ExecuteOptions::default().concurrently(4))?
        .filter(|outcome| !outcome.successful())
        .count();
    println!("Entries: {:?}, failures: {}", log.lock(), failures);
    Ok(())
}

fn main() -> Result<(), ProcedureError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("======================================");
    println!("         Procedures Example           ");
    println!("======================================");

    example_sequential()?;
    example_concurrent()?;
    example_synchronized()?;

    println!("\n======================================");
    println!("           Examples Complete           ");
    println!("======================================");
    Ok(())
}
