//! High-Performance In-Memory Order Cache
//!
//! An indexed cache of trade orders for electronic trading systems, with
//! bulk cancellation and cross-company match sizing.
//!
//! # Features
//!
//! - **Indexed Storage**: Orders queryable by id, security, user, and company,
//!   with all views kept consistent under mutation
//! - **Bulk Cancellation**: Cancel by id, by user, or by security with a
//!   minimum-quantity threshold
//! - **Match Sizing**: Per-security matchable quantity between buy and sell
//!   volume, excluding same-company pairs
//! - **Total Operations**: Unknown ids, users, and securities are silent
//!   no-ops or zero results, never errors
//! - **Thread Safe**: One coarse lock guards the store and all indices, so
//!   every operation observes a fully consistent view
//! - **Comprehensive Monitoring**: Built-in metrics with Prometheus support
//!
//! # Quick Start
//!
//! ```rust
//! use order_cache_engine::cache::{Order, OrderCache, Side};
//!
//! // Create a new order cache
//! let cache = OrderCache::new();
//!
//! // Add some orders
//! cache.add_order(Order::new("o1", "AAPL", Side::Sell, 100, "alice", "ACME"));
//! cache.add_order(Order::new("o2", "AAPL", Side::Buy, 100, "bob", "GLOBEX"));
//!
//! // Size the matchable quantity for a security
//! assert_eq!(cache.get_matching_size_for_security("AAPL"), 100);
//!
//! // Cancel everything a user has resting
//! cache.cancel_orders_for_user("alice");
//! assert_eq!(cache.total_orders(), 1);
//! ```
//!
//! # Architecture
//!
//! The cache uses a two-level data structure:
//!
//! 1. **Primary Store**: `HashMap<OrderId, Order>` owning the canonical copy
//!    of each order
//! 2. **Secondary Indices**: three `key -> set of order ids` maps (security,
//!    user, company) derived from the store
//!
//! A single `RwLock` wraps the whole state: each mutation updates the store
//! and all three indices as one unit, each query reads a consistent view.
//! Match sizing aggregates quantity per company per side before consuming,
//! so the computation is quadratic in companies rather than orders.

pub mod cache;
pub mod metrics;

// Re-export commonly used types
pub use self::cache::{
    CacheSnapshot, CacheStats, Order, OrderCache, OrderId, Quantity, SecurityDepth, Side,
};
pub use self::metrics::CacheMetrics;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_cache_workflow() {
        let cache = OrderCache::new();

        cache.add_order(Order::new("o1", "AAPL", Side::Sell, 300, "alice", "ACME"));
        cache.add_order(Order::new("o2", "AAPL", Side::Buy, 200, "bob", "GLOBEX"));
        cache.add_order(Order::new("o3", "MSFT", Side::Buy, 500, "carol", "ACME"));

        assert_eq!(cache.total_orders(), 3);
        assert_eq!(cache.get_matching_size_for_security("AAPL"), 200);
        assert_eq!(cache.get_matching_size_for_security("MSFT"), 0);

        cache.cancel_order("o2");
        assert_eq!(cache.get_matching_size_for_security("AAPL"), 0);
        assert_eq!(cache.total_orders(), 2);
    }

    #[test]
    fn test_concurrent_adds() {
        let cache = Arc::new(OrderCache::new());
        let mut handles = vec![];

        // Spawn multiple writer threads
        for thread_id in 0..4 {
            let cache_clone = Arc::clone(&cache);
            let handle = thread::spawn(move || {
                for i in 0..100 {
                    let order = Order::new(
                        format!("t{}-o{}", thread_id, i),
                        "AAPL",
                        if i % 2 == 0 { Side::Buy } else { Side::Sell },
                        100,
                        format!("user{}", thread_id),
                        format!("company{}", thread_id),
                    );
                    cache_clone.add_order(order);
                }
            });
            handles.push(handle);
        }

        // Wait for completion
        for handle in handles {
            handle.join().unwrap();
        }

        // Verify all orders were added
        assert_eq!(cache.total_orders(), 400);
        assert_eq!(cache.get_stats().user_count, 4);
    }

    #[test]
    fn test_concurrent_queries_during_mutation() {
        let cache = Arc::new(OrderCache::new());

        for i in 0..200 {
            cache.add_order(Order::new(
                format!("o{}", i),
                "AAPL",
                if i % 2 == 0 { Side::Buy } else { Side::Sell },
                10,
                format!("user{}", i % 5),
                format!("company{}", i % 7),
            ));
        }

        let reader = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..100 {
                    // Either view is fine; a torn view is not. The sizing
                    // query must never panic or see an id without its order.
                    let _ = cache.get_matching_size_for_security("AAPL");
                    let _ = cache.get_all_orders();
                }
            })
        };

        let writer = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..5 {
                    cache.cancel_orders_for_user(&format!("user{}", i));
                }
            })
        };

        reader.join().unwrap();
        writer.join().unwrap();

        assert_eq!(cache.total_orders(), 0);
        assert_eq!(cache.get_matching_size_for_security("AAPL"), 0);
    }
}
