//! Core order cache implementation module
//!
//! This module contains the indexed order storage and the cross-company
//! match sizing algorithm for in-memory trading order caches.

pub mod index;
pub mod matching;
pub mod order_cache;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use index::SecondaryIndex;
pub use matching::MatchingEngine;
pub use order_cache::OrderCache;
pub use store::OrderStore;
pub use types::{CacheSnapshot, CacheStats, Order, OrderId, Quantity, SecurityDepth, Side};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Test that all main types are accessible
        let _cache = OrderCache::new();
        let _order = Order::new("o1", "TEST", Side::Buy, 100, "u1", "c1");
        let _store = OrderStore::new();
        let _index = SecondaryIndex::new();
    }
}
