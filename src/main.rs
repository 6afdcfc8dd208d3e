//! Memo Cache demo
//!
//! Memoizes a recursive Fibonacci over a cache configured from the
//! environment, then prints the result and a stats snapshot as JSON.

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{memoize_recursive, CacheConfig, CacheManager, MemoKey, StatsSnapshot};

const DEFAULT_FIB_INPUT: u64 = 90;

#[derive(Serialize)]
struct Report {
    input: u64,
    result: String,
    hit_rate: f64,
    stats: StatsSnapshot<MemoKey>,
}

/// Runs the memoization demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and wrap Fibonacci with it
/// 4. Compute, then print the result and the stats snapshot
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: max_size={}, ttl={:?}, expiration={:?}",
        config.max_size, config.ttl, config.expiration
    );

    let n = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid Fibonacci input: {raw}"))?,
        None => DEFAULT_FIB_INPUT,
    };

    let cache = CacheManager::from_config(config).context("failed to build cache")?;
    let mut fib = memoize_recursive(cache, |recur, n: u64| -> u128 {
        if n < 2 {
            n as u128
        } else {
            recur(n - 1).saturating_add(recur(n - 2))
        }
    });

    let result = fib.call(n);
    info!("fib({}) = {}", n, result);

    let stats = fib.cache().stats();
    let report = Report {
        input: n,
        result: result.to_string(),
        hit_rate: stats.metrics.hit_rate(),
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
