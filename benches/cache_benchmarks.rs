use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use order_cache_engine::cache::{Order, OrderCache, Side};

fn make_orders(count: usize, securities: usize, companies: usize) -> Vec<Order> {
    (0..count)
        .map(|i| {
            Order::new(
                format!("ord-{}", i),
                format!("SEC{}", i % securities),
                if i % 2 == 0 { Side::Buy } else { Side::Sell },
                (10 + i % 500) as u64,
                format!("user{}", i % 25),
                format!("company{}", i % companies),
            )
        })
        .collect()
}

fn filled_cache(orders: &[Order]) -> OrderCache {
    let cache = OrderCache::new();
    for order in orders {
        cache.add_order(order.clone());
    }
    cache
}

fn bench_add_order(c: &mut Criterion) {
    let orders = make_orders(10_000, 10, 8);

    c.bench_function("add_order_10k", |b| {
        b.iter_batched(
            || orders.clone(),
            |orders| {
                let cache = OrderCache::new();
                for order in orders {
                    cache.add_order(order);
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cancel_order(c: &mut Criterion) {
    let orders = make_orders(10_000, 10, 8);

    c.bench_function("cancel_order_10k", |b| {
        b.iter_batched(
            || filled_cache(&orders),
            |cache| {
                for i in 0..10_000 {
                    cache.cancel_order(&format!("ord-{}", i));
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cancel_for_user(c: &mut Criterion) {
    let orders = make_orders(10_000, 10, 8);

    c.bench_function("cancel_orders_for_user", |b| {
        b.iter_batched(
            || filled_cache(&orders),
            |cache| {
                cache.cancel_orders_for_user(black_box("user7"));
                cache
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_matching_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching_size");

    for (label, companies) in [("few_companies", 4), ("many_companies", 64)] {
        let orders = make_orders(10_000, 1, companies);
        let cache = filled_cache(&orders);

        group.bench_function(label, |b| {
            b.iter(|| cache.get_matching_size_for_security(black_box("SEC0")))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_order,
    bench_cancel_order,
    bench_cancel_for_user,
    bench_matching_size
);
criterion_main!(benches);
