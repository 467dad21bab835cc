use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type OrderId = String;
pub type Quantity = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A resident trade intent. Immutable once stored; identity is `order_id`
/// alone, no other field participates in cache identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub security_id: String,
    pub side: Side,
    pub qty: Quantity,
    pub user: String,
    pub company: String,
}

impl Order {
    pub fn new(
        order_id: impl Into<OrderId>,
        security_id: impl Into<String>,
        side: Side,
        qty: Quantity,
        user: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            security_id: security_id.into(),
            side,
            qty,
            user: user.into(),
            company: company.into(),
        }
    }
}

/// Point-in-time counters describing the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_orders: usize,
    pub security_count: usize,
    pub user_count: usize,
    pub company_count: usize,
    pub orders_added: u64,
    pub orders_cancelled: u64,
}

/// Per-security resting volume summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityDepth {
    pub security_id: String,
    pub buy_qty: Quantity,
    pub sell_qty: Quantity,
    pub order_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub timestamp: DateTime<Utc>,
    pub securities: Vec<SecurityDepth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_creation() {
        let order = Order::new("o1", "AAPL", Side::Buy, 100, "alice", "ACME");

        assert_eq!(order.order_id, "o1");
        assert_eq!(order.security_id, "AAPL");
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.qty, 100);
        assert_eq!(order.user, "alice");
        assert_eq!(order.company, "ACME");
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::new("o1", "AAPL", Side::Sell, 250, "bob", "GLOBEX");
        let serialized = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&serialized).unwrap();
        assert_eq!(order, deserialized);
    }
}
