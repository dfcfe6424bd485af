//! # Product and Category Data Model
//!
//! This module defines the data structures for catalog items and the
//! three-level category taxonomy derived from the raw source data.
//!
//! ## Core Concepts
//!
//! - **Product**: A catalog item with price, discount, and display fields
//! - **CategoryPath**: Normalized taxonomy location with up to three segments
//! - **Savings**: Derived amount (`mrp - price`) when an MRP is present
//!
//! ## Usage
//!
//! ```rust
//! use dealhunter::catalog_model::{CategoryPath, Product};
//!
//! let path = CategoryPath::parse("Electronics > Mobiles");
//! let phone = Product::new("Phone A", 9000.0, 25.0)
//!     .with_mrp(12000.0)
//!     .with_category_path(path)
//!     .with_source_key("electronics");
//!
//! assert_eq!(phone.savings(), Some(3000.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum taxonomy depth supported by the source format
pub const MAX_CATEGORY_DEPTH: usize = 3;

/// Separator used when rendering a path back into its raw string form
pub const CATEGORY_JOINER: &str = " > ";

/// Normalized taxonomy location for a product.
///
/// Internally always three segments; absent deeper levels are empty strings.
/// Segment comparison is case-sensitive exact match on the trimmed value —
/// the source format round-trips only under that rule, so no normalization
/// of case or punctuation is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryPath {
    segments: [String; MAX_CATEGORY_DEPTH],
}

/// Represents one catalog item from a loaded source.
///
/// Every retained product has a numeric price and a discount percentage;
/// rows where either is missing never make it past ingestion. Optional
/// fields are modeled as `Option`, not as sentinel strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name of the product
    pub name: String,

    /// Selling price, always ≥ 0
    pub price: f64,

    /// Maximum retail price, when the source provides one
    pub mrp: Option<f64>,

    /// Discount percentage in [0, 100]
    pub discount: f64,

    /// Normalized taxonomy location
    pub category_path: CategoryPath,

    /// Image URL used by the presentation layer
    pub image_url: String,

    /// Outbound purchase link for the buy action
    pub purchase_link: String,

    /// Identifier of the originating dataset (e.g. "electronics")
    pub source_key: String,
}

impl CategoryPath {
    /// Parse a raw category field like `"Electronics > Mobiles > Accessories"`.
    ///
    /// Splits on `>`, trims each segment, caps at three segments and pads
    /// absent deeper segments with empty strings. An empty or whitespace
    /// input yields a path of depth 0, which ingestion rejects.
    pub fn parse(raw: &str) -> Self {
        let mut segments: [String; MAX_CATEGORY_DEPTH] = Default::default();
        for (i, part) in raw.split('>').take(MAX_CATEGORY_DEPTH).enumerate() {
            segments[i] = part.trim().to_string();
        }
        Self::normalized(segments)
    }

    /// Build a path from already-split segments, padding to three.
    pub fn from_segments<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments: [String; MAX_CATEGORY_DEPTH] = Default::default();
        for (i, part) in parts.into_iter().take(MAX_CATEGORY_DEPTH).enumerate() {
            segments[i] = part.as_ref().trim().to_string();
        }
        Self::normalized(segments)
    }

    /// Clear every segment after the first empty one, so a path with a
    /// hole ("Gadgets > > Special") stores the same key that its display
    /// form re-parses to. Without this, equality and depth would disagree
    /// and the hidden tail could never be named in a lookup.
    fn normalized(mut segments: [String; MAX_CATEGORY_DEPTH]) -> Self {
        if let Some(first_empty) = segments.iter().position(String::is_empty) {
            for segment in &mut segments[first_empty..] {
                segment.clear();
            }
        }
        Self { segments }
    }

    /// Number of leading non-empty segments
    pub fn depth(&self) -> usize {
        self.segments.iter().take_while(|s| !s.is_empty()).count()
    }

    /// The populated segments, without the empty padding
    pub fn segments(&self) -> &[String] {
        &self.segments[..self.depth()]
    }

    /// Segment at `index`, if populated
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments()
            .get(index)
            .map(|s| s.as_str())
    }

    /// Whether this path extends `parent` by exactly one segment.
    ///
    /// Returns the extending child segment on a match. The empty parent
    /// matches every path of depth 1.
    pub fn child_under(&self, parent: &[String]) -> Option<&str> {
        if self.depth() != parent.len() + 1 {
            return None;
        }
        if self.segments()[..parent.len()] != parent[..] {
            return None;
        }
        self.segment(parent.len())
    }

    /// Append one child segment, up to the maximum depth
    pub fn join(&self, child: &str) -> Self {
        let mut segments = self.segments.clone();
        let depth = self.depth();
        if depth < MAX_CATEGORY_DEPTH {
            segments[depth] = child.trim().to_string();
        }
        Self { segments }
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join(CATEGORY_JOINER))
    }
}

impl Product {
    /// Create a new product with the fields every retained row must have
    pub fn new(name: &str, price: f64, discount: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            mrp: None,
            discount,
            category_path: CategoryPath::from_segments::<_, &str>([]),
            image_url: String::new(),
            purchase_link: String::new(),
            source_key: String::new(),
        }
    }

    /// Set the maximum retail price
    pub fn with_mrp(mut self, mrp: f64) -> Self {
        self.mrp = Some(mrp);
        self
    }

    /// Set the taxonomy location
    pub fn with_category_path(mut self, path: CategoryPath) -> Self {
        self.category_path = path;
        self
    }

    /// Set the image URL
    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = url.to_string();
        self
    }

    /// Set the outbound purchase link
    pub fn with_purchase_link(mut self, link: &str) -> Self {
        self.purchase_link = link.to_string();
        self
    }

    /// Set the originating dataset identifier
    pub fn with_source_key(mut self, source_key: &str) -> Self {
        self.source_key = source_key.to_string();
        self
    }

    /// Amount saved against the MRP, when one is present.
    ///
    /// Sources occasionally list an MRP below the selling price; the
    /// difference is still reported as-is rather than clamped, since the
    /// presentation layer decides what to show.
    pub fn savings(&self) -> Option<f64> {
        self.mrp.map(|mrp| mrp - self.price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}% off, {})", self.name, self.discount, self.price)?;
        if self.category_path.depth() > 0 {
            write!(f, " [{}]", self.category_path)?;
        }
        Ok(())
    }
}
