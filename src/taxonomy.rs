//! # Taxonomy Index
//!
//! Builds, from ingested products, the distinct category values at each
//! hierarchy level and the parent-to-children mapping used for drill-down.
//!
//! The index is derived from *retained* products only: a category whose
//! products were all rejected during ingestion simply does not exist here,
//! so empty categories are never surfaced to a caller.

use crate::catalog_model::Product;
use std::collections::{BTreeMap, BTreeSet};

/// Immutable category index over one collection of products.
///
/// All listings are lexicographically ordered for determinism; segment
/// comparison is case-sensitive exact match.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    level_one: BTreeSet<String>,
    level_two: BTreeSet<String>,
    level_three_parents: BTreeSet<String>,
    /// Parent path segments -> distinct immediate child segments
    children: BTreeMap<Vec<String>, BTreeSet<String>>,
}

impl Taxonomy {
    /// Build the index from a collection of retained products
    pub fn build(products: &[Product]) -> Self {
        let mut taxonomy = Taxonomy::default();

        for product in products {
            let segments = product.category_path.segments();

            if let Some(first) = segments.first() {
                taxonomy.level_one.insert(first.clone());
            }
            if let Some(second) = segments.get(1) {
                taxonomy.level_two.insert(second.clone());
            }
            if segments.get(2).is_some() {
                // The governing parent of a level-3 category
                taxonomy
                    .level_three_parents
                    .insert(segments[1].clone());
            }

            for depth in 0..segments.len() {
                taxonomy
                    .children
                    .entry(segments[..depth].to_vec())
                    .or_default()
                    .insert(segments[depth].clone());
            }
        }

        taxonomy
    }

    /// Distinct top-level categories, sorted lexicographically
    pub fn level_one(&self) -> Vec<String> {
        self.level_one.iter().cloned().collect()
    }

    /// Distinct second-level categories across all branches
    pub fn level_two(&self) -> Vec<String> {
        self.level_two.iter().cloned().collect()
    }

    /// Parents that govern a third-level category
    pub fn level_three_parents(&self) -> Vec<String> {
        self.level_three_parents.iter().cloned().collect()
    }

    /// Distinct immediate children under `parent` that have at least one
    /// retained product. The empty parent lists the top level.
    pub fn children_of(&self, parent: &[String]) -> Vec<String> {
        self.children
            .get(parent)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_model::CategoryPath;

    fn product(name: &str, path: &str) -> Product {
        Product::new(name, 100.0, 10.0).with_category_path(CategoryPath::parse(path))
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_level_one_sorted_distinct() {
        let products = vec![
            product("a", "Electronics > Mobiles"),
            product("b", "Books"),
            product("c", "Electronics > Audio"),
        ];
        let taxonomy = Taxonomy::build(&products);
        assert_eq!(taxonomy.level_one(), ["Books", "Electronics"]);
    }

    #[test]
    fn test_level_two_and_three_parents() {
        let products = vec![
            product("a", "Electronics > Mobiles > Accessories"),
            product("b", "Electronics > Audio"),
            product("c", "Books > Fiction"),
        ];
        let taxonomy = Taxonomy::build(&products);
        assert_eq!(taxonomy.level_two(), ["Audio", "Fiction", "Mobiles"]);
        assert_eq!(taxonomy.level_three_parents(), ["Mobiles"]);
    }

    #[test]
    fn test_children_of() {
        let products = vec![
            product("a", "Electronics > Mobiles"),
            product("b", "Electronics > Mobiles > Accessories"),
            product("c", "Electronics > Audio"),
            product("d", "Books"),
        ];
        let taxonomy = Taxonomy::build(&products);

        assert_eq!(
            taxonomy.children_of(&segments(&["Electronics"])),
            ["Audio", "Mobiles"]
        );
        assert_eq!(
            taxonomy.children_of(&segments(&["Electronics", "Mobiles"])),
            ["Accessories"]
        );
        assert_eq!(taxonomy.children_of(&[]), ["Books", "Electronics"]);
        // No qualifying children is an empty listing, not an error
        assert!(taxonomy.children_of(&segments(&["Books"])).is_empty());
        assert!(taxonomy.children_of(&segments(&["Garden"])).is_empty());
    }

    #[test]
    fn test_children_require_surviving_products() {
        // "Electronics > Audio" exists only in raw data that was filtered
        // out before reaching the taxonomy, so it must not appear.
        let products = vec![product("a", "Electronics > Mobiles")];
        let taxonomy = Taxonomy::build(&products);
        assert_eq!(
            taxonomy.children_of(&segments(&["Electronics"])),
            ["Mobiles"]
        );
    }

    #[test]
    fn test_case_sensitive_segments() {
        let products = vec![
            product("a", "Electronics > Mobiles"),
            product("b", "Electronics > mobiles"),
        ];
        let taxonomy = Taxonomy::build(&products);
        assert_eq!(
            taxonomy.children_of(&segments(&["Electronics"])),
            ["Mobiles", "mobiles"]
        );
    }

    #[test]
    fn test_empty_input() {
        let taxonomy = Taxonomy::build(&[]);
        assert!(taxonomy.level_one().is_empty());
        assert!(taxonomy.children_of(&[]).is_empty());
    }
}
