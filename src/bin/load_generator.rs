//! Load Generator
//!
//! Hammers one shared cache from many threads and verifies exact resident
//! counts afterwards. Useful for smoke-testing the locking behavior and
//! for rough throughput numbers.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use order_cache_engine::cache::{Order, OrderCache, Side};

const NUM_ORDERS: usize = 200_000;
const SECURITIES: usize = 20;
const USERS: usize = 50;
const COMPANIES: usize = 10;

fn make_order(i: usize) -> Order {
    Order::new(
        format!("ord-{}", i),
        format!("SEC{}", i % SECURITIES),
        if i % 2 == 0 { Side::Buy } else { Side::Sell },
        (10 + i % 500) as u64,
        format!("user{}", i % USERS),
        format!("company{}", i % COMPANIES),
    )
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cache = Arc::new(OrderCache::new());

    info!("Adding {} orders from {} threads...", NUM_ORDERS, rayon::current_num_threads());

    let start = Instant::now();
    (0..NUM_ORDERS)
        .into_par_iter()
        .for_each(|i| cache.add_order(make_order(i)));
    let add_elapsed = start.elapsed();

    assert_eq!(cache.total_orders(), NUM_ORDERS);
    info!(
        "Added {} orders in {:.2?} ({:.0} orders/sec)",
        NUM_ORDERS,
        add_elapsed,
        NUM_ORDERS as f64 / add_elapsed.as_secs_f64()
    );

    // Concurrent point cancels of every fourth order, racing against
    // match sizing queries over every security.
    let start = Instant::now();
    rayon::join(
        || {
            (0..NUM_ORDERS)
                .into_par_iter()
                .filter(|i| i % 4 == 0)
                .for_each(|i| cache.cancel_order(&format!("ord-{}", i)));
        },
        || {
            (0..SECURITIES).into_par_iter().for_each(|s| {
                let size = cache.get_matching_size_for_security(&format!("SEC{}", s));
                info!("SEC{} matchable quantity: {}", s, size);
            });
        },
    );
    let cancel_elapsed = start.elapsed();

    assert_eq!(cache.total_orders(), NUM_ORDERS - NUM_ORDERS / 4);
    info!("Cancelled {} orders in {:.2?}", NUM_ORDERS / 4, cancel_elapsed);

    // Bulk cancels drain the rest
    let start = Instant::now();
    for u in 0..USERS {
        cache.cancel_orders_for_user(&format!("user{}", u));
    }
    info!("Drained remaining orders in {:.2?}", start.elapsed());

    assert_eq!(cache.total_orders(), 0);

    let stats = cache.get_stats();
    info!(
        "Done. {} added, {} cancelled, {} resident",
        stats.orders_added, stats.orders_cancelled, stats.total_orders
    );
}
