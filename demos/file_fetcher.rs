//! Example: Polling the agent's snapshot file
//!
//! This example drives a [`Poller`] with a [`FileFetcher`] and prints every
//! state it publishes.
//!
//! The file should be the agent's `latest.json`:
//! `{"data": {"cpu_usage": 12.5, "load_avg": [0.1, 0.2, 0.3], ...}}`
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_fetcher -- path/to/latest.json
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use agentdash::{DashboardState, FileFetcher, Poller};

#[tokio::main]
async fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example file_fetcher -- <path-to-latest.json>");
        std::process::exit(1);
    });

    println!("Polling file: {}", path);
    println!("Press Ctrl+C to stop\n");

    let fetcher = FileFetcher::new(&path).timeout(Duration::from_secs(1));
    let poller = Poller::new(Arc::new(fetcher), Duration::from_secs(2))
        .capacity(10)
        .spawn();
    let mut updates = poller.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(&state);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.shutdown().await;
}

fn print_state(state: &DashboardState) {
    println!("revision {}:", state.revision);
    if let Some(err) = &state.error {
        println!("  error: {}", err);
    }
    if let Some(cpu) = state.cpu.latest() {
        println!("  cpu: {:.1}% ({} points)", cpu.value, state.cpu.len());
    }
    if let Some(memory) = state.memory.latest() {
        println!("  memory: {} bytes used", memory.value);
    }
    if let Some(network) = state.network.latest() {
        println!("  network: {} bytes total", network.value);
    }
    if let Some(disk) = state.disk.latest() {
        println!("  disk: {} bytes used", disk.value);
    }
    if let Some(load) = state.load.latest() {
        println!(
            "  load: {:.2} {:.2} {:.2}",
            load.value.one, load.value.five, load.value.fifteen
        );
    }
    println!();
}
