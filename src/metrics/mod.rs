use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::cache::CacheStats;

/// Metrics collector for order cache operations
#[derive(Debug)]
pub struct CacheMetrics {
    // Latency tracking
    add_order_latency: LatencyTracker,
    cancel_order_latency: LatencyTracker,
    bulk_cancel_latency: LatencyTracker,
    matching_latency: LatencyTracker,

    // Throughput counters
    orders_added: AtomicU64,
    orders_cancelled: AtomicU64,
    matching_queries: AtomicU64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        // Register metric descriptions
        describe_counter!("ordercache_orders_total", "Total number of orders processed");
        describe_counter!(
            "ordercache_matching_queries_total",
            "Total number of match sizing queries"
        );
        describe_histogram!(
            "ordercache_operation_duration_seconds",
            "Duration of order cache operations"
        );
        describe_gauge!(
            "ordercache_orders_current",
            "Current number of orders in the cache"
        );
        describe_gauge!(
            "ordercache_index_keys",
            "Number of live keys per secondary index"
        );

        Self {
            add_order_latency: LatencyTracker::new("add_order"),
            cancel_order_latency: LatencyTracker::new("cancel_order"),
            bulk_cancel_latency: LatencyTracker::new("bulk_cancel"),
            matching_latency: LatencyTracker::new("matching_size"),
            orders_added: AtomicU64::new(0),
            orders_cancelled: AtomicU64::new(0),
            matching_queries: AtomicU64::new(0),
        }
    }

    // Latency measurement methods
    pub fn time_add_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.add_order_latency.time(f)
    }

    pub fn time_cancel_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.cancel_order_latency.time(f)
    }

    pub fn time_bulk_cancel<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.bulk_cancel_latency.time(f)
    }

    pub fn time_matching<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.matching_latency.time(f)
    }

    // Counter methods
    pub fn increment_orders_added(&self) {
        self.orders_added.fetch_add(1, Ordering::Relaxed);
        counter!("ordercache_orders_total", "operation" => "add").increment(1);
    }

    pub fn increment_orders_cancelled(&self, count: u64) {
        self.orders_cancelled.fetch_add(count, Ordering::Relaxed);
        counter!("ordercache_orders_total", "operation" => "cancel").increment(count);
    }

    pub fn increment_matching_queries(&self) {
        self.matching_queries.fetch_add(1, Ordering::Relaxed);
        counter!("ordercache_matching_queries_total").increment(1);
    }

    // Gauge methods
    pub fn update_cache_state(&self, stats: &CacheStats) {
        gauge!("ordercache_orders_current").set(stats.total_orders as f64);
        gauge!("ordercache_index_keys", "index" => "security").set(stats.security_count as f64);
        gauge!("ordercache_index_keys", "index" => "user").set(stats.user_count as f64);
        gauge!("ordercache_index_keys", "index" => "company").set(stats.company_count as f64);
    }

    // Getters for current values
    pub fn get_orders_added(&self) -> u64 {
        self.orders_added.load(Ordering::Relaxed)
    }

    pub fn get_orders_cancelled(&self) -> u64 {
        self.orders_cancelled.load(Ordering::Relaxed)
    }

    pub fn get_matching_queries(&self) -> u64 {
        self.matching_queries.load(Ordering::Relaxed)
    }

    pub fn get_latency_stats(&self) -> LatencyStats {
        LatencyStats {
            add_order: self.add_order_latency.get_stats(),
            cancel_order: self.cancel_order_latency.get_stats(),
            bulk_cancel: self.bulk_cancel_latency.get_stats(),
            matching: self.matching_latency.get_stats(),
        }
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency tracker for individual operations
#[derive(Debug)]
struct LatencyTracker {
    operation: String,
    samples: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl LatencyTracker {
    fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            samples: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
        }
    }

    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let duration = start.elapsed();

        self.record_latency(duration);
        result
    }

    fn record_latency(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;

        self.samples.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);

        // Update min (with CAS loop)
        let mut current_min = self.min_nanos.load(Ordering::Relaxed);
        while nanos < current_min {
            match self.min_nanos.compare_exchange_weak(
                current_min,
                nanos,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(new_min) => current_min = new_min,
            }
        }

        // Update max (with CAS loop)
        let mut current_max = self.max_nanos.load(Ordering::Relaxed);
        while nanos > current_max {
            match self.max_nanos.compare_exchange_weak(
                current_max,
                nanos,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(new_max) => current_max = new_max,
            }
        }

        // Record in metrics system
        histogram!("ordercache_operation_duration_seconds", "operation" => self.operation.clone())
            .record(duration.as_secs_f64());
    }

    fn get_stats(&self) -> OperationLatencyStats {
        let samples = self.samples.load(Ordering::Relaxed);
        let total = self.total_nanos.load(Ordering::Relaxed);
        let min = self.min_nanos.load(Ordering::Relaxed);
        let max = self.max_nanos.load(Ordering::Relaxed);

        let avg = if samples > 0 { total / samples } else { 0 };

        OperationLatencyStats {
            operation: self.operation.clone(),
            samples,
            avg_nanos: avg,
            min_nanos: if min == u64::MAX { 0 } else { min },
            max_nanos: max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub add_order: OperationLatencyStats,
    pub cancel_order: OperationLatencyStats,
    pub bulk_cancel: OperationLatencyStats,
    pub matching: OperationLatencyStats,
}

#[derive(Debug, Clone)]
pub struct OperationLatencyStats {
    pub operation: String,
    pub samples: u64,
    pub avg_nanos: u64,
    pub min_nanos: u64,
    pub max_nanos: u64,
}

impl OperationLatencyStats {
    pub fn avg_micros(&self) -> f64 {
        self.avg_nanos as f64 / 1_000.0
    }

    pub fn min_micros(&self) -> f64 {
        self.min_nanos as f64 / 1_000.0
    }

    pub fn max_micros(&self) -> f64 {
        self.max_nanos as f64 / 1_000.0
    }
}

/// Background metrics reporter
pub struct MetricsReporter {
    metrics: Arc<CacheMetrics>,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<CacheMetrics>, interval: Duration) -> Self {
        Self { metrics, interval }
    }

    pub async fn run(&self) {
        let mut interval = interval(self.interval);

        loop {
            interval.tick().await;

            let stats = self.metrics.get_latency_stats();

            info!(
                "OrderCache Metrics - Orders: +{} -{} | Match queries: {} | Latency (μs): add={:.2} cancel={:.2} bulk={:.2} match={:.2}",
                self.metrics.get_orders_added(),
                self.metrics.get_orders_cancelled(),
                self.metrics.get_matching_queries(),
                stats.add_order.avg_micros(),
                stats.cancel_order.avg_micros(),
                stats.bulk_cancel.avg_micros(),
                stats.matching.avg_micros()
            );
        }
    }
}
