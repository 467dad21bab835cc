//! Order Cache Demo Server
//!
//! Runs a simulated order flow against one cache instance with real-time
//! metrics and monitoring.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::time::interval;
use tracing::{error, info};
use uuid::Uuid;

use order_cache_engine::cache::{Order, OrderCache, Side};
use order_cache_engine::metrics::{CacheMetrics, MetricsReporter};

const SECURITIES: &[&str] = &["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN"];
const USERS: &[&str] = &["alice", "bob", "carol", "dave", "erin", "frank"];
const COMPANIES: &[&str] = &["ACME", "GLOBEX", "INITECH", "UMBRELLA", "STARK"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Starting order cache demo server...");

    // Start Prometheus scrape endpoint
    PrometheusBuilder::new()
        .with_http_listener(([127, 0, 0, 1], 9000))
        .install()?;
    info!("Prometheus endpoint listening on 127.0.0.1:9000");

    let cache = Arc::new(OrderCache::new());
    let metrics = Arc::new(CacheMetrics::new());

    // Start metrics reporting
    let reporter = MetricsReporter::new(Arc::clone(&metrics), Duration::from_secs(5));
    tokio::spawn(async move {
        reporter.run().await;
    });

    // Start order flow simulation
    {
        let cache = Arc::clone(&cache);
        let metrics = Arc::clone(&metrics);
        tokio::spawn(async move {
            simulate_order_flow(cache, metrics).await;
        });
    }

    // Start cache statistics reporting
    {
        let cache = Arc::clone(&cache);
        let metrics = Arc::clone(&metrics);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(10));

            loop {
                interval.tick().await;

                let stats = cache.get_stats();
                metrics.update_cache_state(&stats);

                info!(
                    "Cache state | Orders: {} | Securities: {} | Users: {} | Companies: {} | +{} -{}",
                    stats.total_orders,
                    stats.security_count,
                    stats.user_count,
                    stats.company_count,
                    stats.orders_added,
                    stats.orders_cancelled
                );

                match serde_json::to_string(&cache.snapshot()) {
                    Ok(json) => info!("Snapshot: {}", json),
                    Err(e) => error!("Failed to serialize snapshot: {}", e),
                }
            }
        });
    }

    info!("Demo server is running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down demo server...");

    let stats = cache.get_stats();
    info!(
        "Final stats: {} resident orders, {} added, {} cancelled",
        stats.total_orders, stats.orders_added, stats.orders_cancelled
    );

    Ok(())
}

/// Simulate a deterministic order flow: a steady stream of adds with
/// periodic point cancels, bulk cancels, and match sizing sweeps.
async fn simulate_order_flow(cache: Arc<OrderCache>, metrics: Arc<CacheMetrics>) {
    let mut interval = interval(Duration::from_millis(10)); // 100 ops/second
    let mut tick: u64 = 0;
    let mut resting_ids: Vec<String> = Vec::new();

    loop {
        interval.tick().await;
        tick += 1;

        let security = SECURITIES[tick as usize % SECURITIES.len()];
        let user = USERS[(tick as usize / 3) % USERS.len()];
        let company = COMPANIES[(tick as usize / 7) % COMPANIES.len()];
        let side = if tick % 2 == 0 { Side::Buy } else { Side::Sell };
        let qty = 50 + (tick % 10) * 25;

        let order_id = Uuid::new_v4().to_string();
        let order = Order::new(order_id.clone(), security, side, qty, user, company);

        metrics.time_add_order(|| cache.add_order(order));
        metrics.increment_orders_added();
        resting_ids.push(order_id);

        // Point-cancel the oldest resting order now and then
        if tick % 13 == 0 && !resting_ids.is_empty() {
            let victim = resting_ids.remove(0);
            let before = cache.total_orders();
            metrics.time_cancel_order(|| cache.cancel_order(&victim));
            metrics.increment_orders_cancelled((before - cache.total_orders()) as u64);
        }

        // Periodic bulk cancels keep the cache bounded
        if tick % 97 == 0 {
            let user = USERS[(tick as usize / 97) % USERS.len()];
            let before = cache.total_orders();
            metrics.time_bulk_cancel(|| cache.cancel_orders_for_user(user));
            metrics.increment_orders_cancelled((before - cache.total_orders()) as u64);
        }

        if tick % 151 == 0 {
            let security = SECURITIES[(tick as usize / 151) % SECURITIES.len()];
            let before = cache.total_orders();
            metrics
                .time_bulk_cancel(|| cache.cancel_orders_for_security_with_min_qty(security, 200));
            metrics.increment_orders_cancelled((before - cache.total_orders()) as u64);
        }

        // Match sizing sweep across all securities
        if tick % 50 == 0 {
            for security in SECURITIES {
                let size = metrics.time_matching(|| cache.get_matching_size_for_security(security));
                metrics.increment_matching_queries();
                info!("Matchable quantity for {}: {}", security, size);
            }
        }

        // Bound the id backlog; cancelled ids left in here are harmless
        // since point cancels tolerate already-gone orders.
        if resting_ids.len() > 5_000 {
            resting_ids.drain(..2_500);
        }
    }
}
