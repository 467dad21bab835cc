use std::collections::BTreeMap;
use tracing::debug;

use crate::cache::types::{Order, Quantity, Side};

/// Cross-side quantity matching over the orders of one security.
///
/// Matching here is a read-only sizing computation: it reports how much
/// buy and sell volume could offset, it never consumes quantity from the
/// stored orders.
pub struct MatchingEngine;

impl MatchingEngine {
    /// Total quantity matchable between the buy and sell sides of the
    /// given orders, where volume may only match across different
    /// companies.
    ///
    /// Quantities are aggregated per company per side first: only the sum
    /// per company matters for the total, no matter how many orders
    /// compose it. Sell companies are consumed in ascending key order,
    /// buy companies in descending key order.
    pub fn matching_size<'a, I>(orders: I) -> Quantity
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let (sells, buys) = Self::aggregate_by_company(orders);

        if sells.is_empty() || buys.is_empty() {
            return 0;
        }

        let mut buys: Vec<(&str, Quantity)> = buys.into_iter().rev().collect();
        let mut total: Quantity = 0;

        for (sell_company, mut sell_remaining) in sells {
            for (buy_company, buy_remaining) in buys.iter_mut() {
                // A company never matches against its own volume.
                if *buy_company == sell_company || *buy_remaining == 0 {
                    continue;
                }

                let matched = sell_remaining.min(*buy_remaining);
                total += matched;
                sell_remaining -= matched;
                *buy_remaining -= matched;

                if sell_remaining == 0 {
                    break;
                }
            }
        }

        debug!("matching size computed: {}", total);
        total
    }

    /// Sum quantity per company for each side. Sorted keys give the
    /// deterministic traversal order the sizing loop relies on.
    fn aggregate_by_company<'a, I>(
        orders: I,
    ) -> (BTreeMap<&'a str, Quantity>, BTreeMap<&'a str, Quantity>)
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut sells: BTreeMap<&str, Quantity> = BTreeMap::new();
        let mut buys: BTreeMap<&str, Quantity> = BTreeMap::new();

        for order in orders {
            let side_totals = match order.side {
                Side::Sell => &mut sells,
                Side::Buy => &mut buys,
            };
            *side_totals.entry(order.company.as_str()).or_default() += order.qty;
        }

        (sells, buys)
    }
}
