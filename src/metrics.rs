//! Process-global metrics registry
//!
//! Lightweight counters and latency accumulators incremented at every
//! external-call boundary (cache hit/miss, retries, timeouts, latency).
//! A snapshot is exposed over `GET /metrics`. No external metrics backend is
//! assumed; the registry is the boundary the rest of the code talks to.

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
struct LatencyStat {
    count: u64,
    total_ms: u64,
    max_ms: u64,
}

#[derive(Debug, Default)]
struct Registry {
    counters: BTreeMap<String, u64>,
    latencies: BTreeMap<String, LatencyStat>,
}

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Registry::default()))
}

/// Increment a named counter by one.
pub fn incr(name: &str) {
    incr_by(name, 1);
}

pub fn incr_by(name: &str, delta: u64) {
    let mut reg = registry().lock().unwrap_or_else(|e| e.into_inner());
    *reg.counters.entry(name.to_string()).or_default() += delta;
}

/// Record one latency observation for a named operation.
pub fn observe_latency(name: &str, elapsed: Duration) {
    let ms = elapsed.as_millis() as u64;
    let mut reg = registry().lock().unwrap_or_else(|e| e.into_inner());
    let stat = reg.latencies.entry(name.to_string()).or_default();
    stat.count += 1;
    stat.total_ms += ms;
    stat.max_ms = stat.max_ms.max(ms);
}

pub fn cache_hit(name: &str) {
    incr(&format!("{name}_cache_hits"));
}

pub fn cache_miss(name: &str) {
    incr(&format!("{name}_cache_misses"));
}

pub fn timeout(name: &str) {
    incr(&format!("{name}_timeouts"));
}

pub fn retry(name: &str) {
    incr(&format!("{name}_retries"));
}

/// JSON snapshot of all counters and latency aggregates.
pub fn snapshot() -> serde_json::Value {
    let reg = registry().lock().unwrap_or_else(|e| e.into_inner());
    let latencies: BTreeMap<String, serde_json::Value> = reg
        .latencies
        .iter()
        .map(|(name, stat)| {
            let avg_ms = if stat.count > 0 {
                stat.total_ms / stat.count
            } else {
                0
            };
            (
                name.clone(),
                serde_json::json!({
                    "count": stat.count,
                    "avg_ms": avg_ms,
                    "max_ms": stat.max_ms,
                }),
            )
        })
        .collect();

    serde_json::json!({
        "counters": reg.counters,
        "latencies": latencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increments() {
        incr("test_metric_a");
        incr_by("test_metric_a", 2);
        let snap = snapshot();
        assert_eq!(snap["counters"]["test_metric_a"], 3);
    }

    #[test]
    fn test_latency_aggregation() {
        observe_latency("test_op", Duration::from_millis(10));
        observe_latency("test_op", Duration::from_millis(30));
        let snap = snapshot();
        assert_eq!(snap["latencies"]["test_op"]["count"], 2);
        assert_eq!(snap["latencies"]["test_op"]["max_ms"], 30);
    }
}
