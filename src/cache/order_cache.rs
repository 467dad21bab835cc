use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::cache::index::SecondaryIndex;
use crate::cache::matching::MatchingEngine;
use crate::cache::store::OrderStore;
use crate::cache::types::{
    CacheSnapshot, CacheStats, Order, Quantity, SecurityDepth, Side,
};

/// In-memory order cache: primary store plus security, user, and company
/// indices, kept consistent under every mutation.
///
/// All state lives behind one lock so each operation updates the store and
/// all three indices as a single unit: a reader can never observe an order
/// present in the store but missing from an index, or the reverse.
#[derive(Debug)]
pub struct OrderCache {
    inner: RwLock<CacheInner>,

    // Cumulative operation counters
    orders_added: AtomicU64,
    orders_cancelled: AtomicU64,
}

#[derive(Debug, Default)]
struct CacheInner {
    store: OrderStore,
    by_security: SecondaryIndex,
    by_user: SecondaryIndex,
    by_company: SecondaryIndex,
}

impl CacheInner {
    /// Insert into the store and register in all three indices.
    /// Returns false when the id is already taken.
    fn insert(&mut self, order: Order) -> bool {
        let Some(order) = self.store.insert(order) else {
            return false;
        };

        self.by_security.insert(&order.security_id, &order.order_id);
        self.by_user.insert(&order.user, &order.order_id);
        self.by_company.insert(&order.company, &order.order_id);
        true
    }

    /// Purge a removed order from every index, via direct bucket lookup by
    /// its own field values.
    fn unindex(&mut self, order: &Order) {
        self.by_security.remove(&order.security_id, &order.order_id);
        self.by_user.remove(&order.user, &order.order_id);
        self.by_company.remove(&order.company, &order.order_id);
    }
}

impl OrderCache {
    pub fn new() -> Self {
        info!("Creating new order cache");

        Self {
            inner: RwLock::new(CacheInner::default()),
            orders_added: AtomicU64::new(0),
            orders_cancelled: AtomicU64::new(0),
        }
    }

    /// Add an order to the cache.
    ///
    /// A duplicate order id is silently ignored: the first writer for an
    /// id wins, even when the later add carries different field values.
    pub fn add_order(&self, order: Order) {
        debug!("Adding order: {:?}", order);

        let inserted = self.inner.write().insert(order);

        if inserted {
            self.orders_added.fetch_add(1, Ordering::Relaxed);
        } else {
            debug!("Duplicate order id, add ignored");
        }
    }

    /// Remove the order with this id from the cache. Unknown ids are a
    /// no-op, not an error.
    pub fn cancel_order(&self, order_id: &str) {
        debug!("Cancelling order: {}", order_id);

        let mut inner = self.inner.write();

        if let Some(order) = inner.store.remove(order_id) {
            inner.unindex(&order);
            self.orders_cancelled.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove every order belonging to this user. Unknown users are a
    /// no-op.
    pub fn cancel_orders_for_user(&self, user: &str) {
        let mut inner = self.inner.write();

        let Some(ids) = inner.by_user.take(user) else {
            return;
        };

        let cancelled = ids.len();
        for order_id in ids {
            if let Some(order) = inner.store.remove(&order_id) {
                inner.by_security.remove(&order.security_id, &order.order_id);
                inner.by_company.remove(&order.company, &order.order_id);
            }
        }

        self.orders_cancelled
            .fetch_add(cancelled as u64, Ordering::Relaxed);
        info!("Cancelled {} orders for user {}", cancelled, user);
    }

    /// Remove every order for this security whose quantity is at least
    /// `min_qty` (inclusive). Sub-threshold orders and other securities are
    /// untouched; unknown securities are a no-op.
    pub fn cancel_orders_for_security_with_min_qty(&self, security_id: &str, min_qty: Quantity) {
        let mut inner = self.inner.write();

        let victims: Vec<_> = match inner.by_security.ids(security_id) {
            Some(ids) => ids
                .iter()
                .filter(|id| inner.store.get(id.as_str()).is_some_and(|o| o.qty >= min_qty))
                .cloned()
                .collect(),
            None => return,
        };

        for order_id in &victims {
            if let Some(order) = inner.store.remove(order_id) {
                inner.unindex(&order);
            }
        }

        self.orders_cancelled
            .fetch_add(victims.len() as u64, Ordering::Relaxed);
        info!(
            "Cancelled {} orders for security {} with qty >= {}",
            victims.len(),
            security_id,
            min_qty
        );
    }

    /// Total quantity matchable between buy and sell orders of the given
    /// security, excluding same-company pairs. Unknown securities yield 0.
    ///
    /// Purely a sizing query: stored order quantities are never consumed.
    pub fn get_matching_size_for_security(&self, security_id: &str) -> Quantity {
        let inner = self.inner.read();

        let Some(ids) = inner.by_security.ids(security_id) else {
            return 0;
        };

        MatchingEngine::matching_size(ids.iter().filter_map(|id| inner.store.get(id)))
    }

    /// All resident orders. Sequence order is unspecified.
    pub fn get_all_orders(&self) -> Vec<Order> {
        let inner = self.inner.read();
        inner.store.iter().cloned().collect()
    }

    /// Look up one order by id.
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.inner.read().store.get(order_id).cloned()
    }

    /// Number of orders currently resident.
    pub fn total_orders(&self) -> usize {
        self.inner.read().store.len()
    }

    pub fn get_stats(&self) -> CacheStats {
        let inner = self.inner.read();

        CacheStats {
            total_orders: inner.store.len(),
            security_count: inner.by_security.key_count(),
            user_count: inner.by_user.key_count(),
            company_count: inner.by_company.key_count(),
            orders_added: self.orders_added.load(Ordering::Relaxed),
            orders_cancelled: self.orders_cancelled.load(Ordering::Relaxed),
        }
    }

    /// Timestamped per-security volume summary, sorted by security id.
    pub fn snapshot(&self) -> CacheSnapshot {
        let inner = self.inner.read();

        let mut depths: BTreeMap<&str, SecurityDepth> = BTreeMap::new();
        for order in inner.store.iter() {
            let depth = depths
                .entry(order.security_id.as_str())
                .or_insert_with(|| SecurityDepth {
                    security_id: order.security_id.clone(),
                    buy_qty: 0,
                    sell_qty: 0,
                    order_count: 0,
                });

            match order.side {
                Side::Buy => depth.buy_qty += order.qty,
                Side::Sell => depth.sell_qty += order.qty,
            }
            depth.order_count += 1;
        }

        CacheSnapshot {
            timestamp: Utc::now(),
            securities: depths.into_values().collect(),
        }
    }
}

impl Default for OrderCache {
    fn default() -> Self {
        Self::new()
    }
}
