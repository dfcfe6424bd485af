//! # Deal Ranker
//!
//! Orders a product collection by discount magnitude and returns the top-N.
//!
//! The sort is stable: products with equal discounts keep their relative
//! order from the input sequence, and no secondary field is consulted.

use crate::catalog_model::Product;
use std::cmp::Ordering;

/// Rank assigned to an item without a parseable discount.
///
/// Only relevant when ranking raw, unfiltered collections through
/// [`top_deals_by_key`]; ingested products always carry a discount.
pub const MISSING_DISCOUNT_RANK: f64 = -1.0;

/// Top `limit` products by discount descending.
///
/// Returns fewer than `limit` when the input is smaller, and an empty
/// vector for empty input. Ties preserve input order.
pub fn top_deals(products: &[Product], limit: usize) -> Vec<Product> {
    top_deals_by_key(products, limit, |p| Some(p.discount))
        .into_iter()
        .cloned()
        .collect()
}

/// Generic top-N selection over any rank-keyed items.
///
/// `key` yields the discount for an item; `None` ranks as
/// [`MISSING_DISCOUNT_RANK`], below every real discount. Used directly when
/// ranking collections that have not been through ingestion filtering.
pub fn top_deals_by_key<T, F>(items: &[T], limit: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> Option<f64>,
{
    let rank = |item: &T| key(item).unwrap_or(MISSING_DISCOUNT_RANK);

    let mut ranked: Vec<&T> = items.iter().collect();
    // sort_by is stable, so equal ranks keep input order
    ranked.sort_by(|a, b| {
        rank(b)
            .partial_cmp(&rank(a))
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, discount: f64) -> Product {
        Product::new(name, 100.0, discount)
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_discount_descending() {
        let products = vec![
            product("mid", 25.0),
            product("low", 5.0),
            product("high", 60.0),
        ];
        let top = top_deals(&products, 3);
        assert_eq!(names(&top), ["high", "mid", "low"]);
    }

    #[test]
    fn test_limit_truncates() {
        let products = vec![
            product("a", 10.0),
            product("b", 20.0),
            product("c", 30.0),
            product("d", 40.0),
        ];
        assert_eq!(top_deals(&products, 2).len(), 2);
        assert_eq!(names(&top_deals(&products, 2)), ["d", "c"]);
        // Fewer items than the limit is fine
        assert_eq!(top_deals(&products, 10).len(), 4);
    }

    #[test]
    fn test_equal_discounts_keep_input_order() {
        let products = vec![
            product("X", 30.0),
            product("Y", 30.0),
            product("Z", 30.0),
        ];
        let top = top_deals(&products, 2);
        assert_eq!(names(&top), ["X", "Y"]);
    }

    #[test]
    fn test_ties_interleaved_with_other_ranks() {
        let products = vec![
            product("first-40", 40.0),
            product("first-50", 50.0),
            product("second-40", 40.0),
        ];
        let top = top_deals(&products, 3);
        assert_eq!(names(&top), ["first-50", "first-40", "second-40"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(top_deals(&[], 5).is_empty());
    }

    #[test]
    fn test_missing_discount_ranks_last() {
        // Raw rows before ingestion filtering: discount may be absent
        let raw: Vec<(&str, Option<f64>)> = vec![
            ("no-discount", None),
            ("small", Some(5.0)),
            ("zero", Some(0.0)),
        ];
        let ranked = top_deals_by_key(&raw, 3, |(_, d)| *d);
        let order: Vec<&str> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(order, ["small", "zero", "no-discount"]);
    }
}
