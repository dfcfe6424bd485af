//! # Record Ingestor
//!
//! This module parses one tabular source into typed [`Product`] records,
//! deriving the category hierarchy and coercing the numeric fields.
//!
//! ## Behavior
//!
//! - Two header-driven adapters normalize to the same `CategoryPath`: a flat
//!   `category` column holding `"A > B > C"`, or pre-leveled `category` +
//!   `category_level` + `parent_category` columns.
//! - A row with a missing or non-numeric price or discount is dropped and
//!   counted, never fatal. Price strings may carry currency symbols and
//!   thousands separators; discount strings a trailing `%`.
//! - A source that cannot be read at all is fatal for that source and is
//!   reported with its source key.
//!
//! Ingestion is a pure function of the input rows: the same source always
//! yields the same products, and nothing global is touched.

use crate::catalog_model::{CategoryPath, Product};
use csv::StringRecord;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

/// Sentinel the sources use for an absent value
pub const NOT_AVAILABLE: &str = "N/A";

/// Regex patterns for coercing the numeric source fields
static FIELD_PATTERNS: LazyLock<FieldPatterns> = LazyLock::new(FieldPatterns::new);

/// Compiled patterns for price and discount strings
struct FieldPatterns {
    /// Matches the numeric part of a price: "₹1,299.00", "399", "1,29,900"
    money: Regex,
    /// Matches a percent-formatted discount: "25%", "25 %", "12.5%"
    percent: Regex,
}

impl FieldPatterns {
    fn new() -> Self {
        Self {
            money: Regex::new(r"\d+(?:,\d+)*(?:\.\d+)?").unwrap(),
            percent: Regex::new(r"^(\d+(?:\.\d+)?)\s*%?$").unwrap(),
        }
    }
}

/// Result of ingesting one source
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// Products that survived filtering
    pub products: Vec<Product>,
    /// Rows dropped for a missing or malformed field
    pub rejected: usize,
}

/// Errors that make an entire source unloadable
#[derive(Debug)]
pub enum IngestError {
    /// The source file or stream could not be read
    SourceLoad { source_key: String, cause: String },
    /// The header row lacks a required column
    MissingColumn { source_key: String, column: String },
}

impl IngestError {
    /// Source key the failure belongs to
    pub fn source_key(&self) -> &str {
        match self {
            IngestError::SourceLoad { source_key, .. } => source_key,
            IngestError::MissingColumn { source_key, .. } => source_key,
        }
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::SourceLoad { source_key, cause } => {
                write!(f, "Failed to load source '{source_key}': {cause}")
            }
            IngestError::MissingColumn { source_key, column } => {
                write!(f, "Source '{source_key}' is missing required column '{column}'")
            }
        }
    }
}

impl std::error::Error for IngestError {}

/// How the category columns of a source are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryLayout {
    /// Single `category` column with a delimited path string
    Flat,
    /// `category` + `category_level` + `parent_category` columns
    Leveled,
}

/// Column indices resolved from the header row
struct ColumnMap {
    name: usize,
    price: usize,
    mrp: Option<usize>,
    discount: usize,
    category: usize,
    parent_category: Option<usize>,
    image: usize,
    link: usize,
    layout: CategoryLayout,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, source_key: &str) -> Result<Self, IngestError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim()))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| IngestError::MissingColumn {
                source_key: source_key.to_string(),
                column: names[0].to_string(),
            })
        };

        let parent_category = find(&["parent_category"]);
        let layout = if parent_category.is_some() && find(&["category_level"]).is_some() {
            CategoryLayout::Leveled
        } else {
            CategoryLayout::Flat
        };

        Ok(Self {
            name: require(&["name"])?,
            price: require(&["price"])?,
            mrp: find(&["mrp"]),
            discount: require(&["discount"])?,
            category: require(&["category"])?,
            parent_category,
            image: require(&["img_link", "image"])?,
            link: require(&["affiliate_link"])?,
            layout,
        })
    }
}

/// Ingest a source from any reader producing CSV text.
///
/// Malformed rows lower the yield and increment `rejected`; only an
/// unreadable stream or a missing required column fails the whole source.
pub fn ingest_reader<R: Read>(reader: R, source_key: &str) -> Result<IngestOutcome, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| IngestError::SourceLoad {
            source_key: source_key.to_string(),
            cause: e.to_string(),
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers, source_key)?;

    let mut outcome = IngestOutcome::default();
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        match record {
            Ok(row) => rows.push(row),
            Err(_) => outcome.rejected += 1,
        }
    }

    // The leveled layout names only the immediate parent per row; the
    // child -> parent map built over the whole source resolves the
    // ancestors beyond that first hop.
    let parents = match columns.layout {
        CategoryLayout::Leveled => build_parent_map(&rows, &columns),
        CategoryLayout::Flat => HashMap::new(),
    };

    for row in &rows {
        match parse_row(row, &columns, &parents, source_key) {
            Some(product) => outcome.products.push(product),
            None => outcome.rejected += 1,
        }
    }

    debug!(
        "Ingested source '{}': {} products, {} rejected rows",
        source_key,
        outcome.products.len(),
        outcome.rejected
    );

    Ok(outcome)
}

/// Ingest a source CSV file from disk
pub fn ingest_file(path: &Path, source_key: &str) -> Result<IngestOutcome, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::SourceLoad {
        source_key: source_key.to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    ingest_reader(file, source_key)
}

/// Map each category label to its immediate parent, for the leveled layout
fn build_parent_map(rows: &[StringRecord], columns: &ColumnMap) -> HashMap<String, String> {
    let parent_idx = match columns.parent_category {
        Some(idx) => idx,
        None => return HashMap::new(),
    };

    let mut parents = HashMap::new();
    for row in rows {
        let category = row.get(columns.category).map(str::trim).unwrap_or("");
        let parent = row.get(parent_idx).map(str::trim).unwrap_or("");
        if !category.is_empty() && !parent.is_empty() && parent != NOT_AVAILABLE {
            parents.insert(category.to_string(), parent.to_string());
        }
    }
    parents
}

/// Parse one row into a product, or `None` when the row must be dropped
fn parse_row(
    row: &StringRecord,
    columns: &ColumnMap,
    parents: &HashMap<String, String>,
    source_key: &str,
) -> Option<Product> {
    let name = row.get(columns.name).map(str::trim).unwrap_or("");
    if name.is_empty() {
        return None;
    }

    let price = parse_money(row.get(columns.price).unwrap_or(""))?;
    let discount = parse_discount(row.get(columns.discount).unwrap_or(""))?;
    let mrp = columns
        .mrp
        .and_then(|idx| row.get(idx))
        .and_then(parse_money);

    let raw_category = row.get(columns.category).map(str::trim).unwrap_or("");
    let category_path = match columns.layout {
        CategoryLayout::Flat => CategoryPath::parse(raw_category),
        CategoryLayout::Leveled => {
            let row_parent = columns
                .parent_category
                .and_then(|idx| row.get(idx))
                .map(str::trim)
                .unwrap_or("");
            leveled_path(raw_category, row_parent, parents)
        }
    };
    if category_path.depth() == 0 {
        return None;
    }

    let image_url = row.get(columns.image).map(str::trim).unwrap_or("");
    let purchase_link = row.get(columns.link).map(str::trim).unwrap_or("");

    let mut product = Product::new(name, price, discount)
        .with_category_path(category_path)
        .with_image_url(image_url)
        .with_purchase_link(purchase_link)
        .with_source_key(source_key);
    if let Some(mrp) = mrp {
        product = product.with_mrp(mrp);
    }
    Some(product)
}

/// Reconstruct a path for the leveled layout by walking the parent chain.
///
/// The first hop comes from the row's own `parent_category` value; the
/// global map only resolves ancestors beyond it. A child label reused
/// under several parents (e.g. "Accessories" under both "Mobiles" and
/// "Laptops") would otherwise be misfiled under whichever parent the map
/// saw last. The walk is capped at the maximum depth, which also guards
/// against cyclic parent data.
fn leveled_path(
    category: &str,
    row_parent: &str,
    parents: &HashMap<String, String>,
) -> CategoryPath {
    if category.is_empty() {
        return CategoryPath::parse("");
    }

    let mut chain = vec![category.to_string()];
    let mut current = row_parent;
    while !current.is_empty()
        && current != NOT_AVAILABLE
        && chain.len() < crate::catalog_model::MAX_CATEGORY_DEPTH
        && !chain.iter().any(|c| c == current)
    {
        chain.push(current.to_string());
        current = parents.get(current).map(String::as_str).unwrap_or("");
    }
    chain.reverse();
    CategoryPath::from_segments(chain)
}

/// Coerce a price/MRP field to a number, stripping currency decoration.
///
/// Returns `None` for absent, sentinel, or non-numeric values.
pub fn parse_money(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }

    let matched = FIELD_PATTERNS.money.find(raw)?;
    matched.as_str().replace(',', "").parse::<f64>().ok()
}

/// Coerce a percent-formatted discount field to a number in [0, 100].
///
/// Strips a trailing `%` before parsing; out-of-range values are rejected
/// the same way as unparseable ones.
pub fn parse_discount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }

    let captures = FIELD_PATTERNS.percent.captures(raw)?;
    let value: f64 = captures[1].parse().ok()?;
    if (0.0..=100.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT_CSV: &str = "\
name,price,mrp,discount,category,img_link,affiliate_link
Phone A,9000,12000,25%,Electronics > Mobiles,https://img/a,https://buy/a
Phone B,8000,8000,N/A,Electronics > Mobiles,https://img/b,https://buy/b
Cable,299,,10%,Electronics > Mobiles > Accessories,https://img/c,https://buy/c
Mystery,N/A,500,50%,Electronics,https://img/d,https://buy/d
";

    #[test]
    fn test_ingest_flat_source() {
        let outcome = ingest_reader(FLAT_CSV.as_bytes(), "electronics").unwrap();

        // Phone B (discount N/A) and Mystery (price N/A) are dropped
        assert_eq!(outcome.products.len(), 2);
        assert_eq!(outcome.rejected, 2);

        let phone = &outcome.products[0];
        assert_eq!(phone.name, "Phone A");
        assert_eq!(phone.price, 9000.0);
        assert_eq!(phone.mrp, Some(12000.0));
        assert_eq!(phone.discount, 25.0);
        assert_eq!(phone.source_key, "electronics");
        assert_eq!(phone.category_path.segments(), ["Electronics", "Mobiles"]);

        let cable = &outcome.products[1];
        assert_eq!(cable.mrp, None);
        assert_eq!(cable.category_path.depth(), 3);
    }

    #[test]
    fn test_ingest_retained_rows_always_numeric() {
        let outcome = ingest_reader(FLAT_CSV.as_bytes(), "electronics").unwrap();
        for product in &outcome.products {
            assert!(product.price >= 0.0);
            assert!((0.0..=100.0).contains(&product.discount));
        }
    }

    #[test]
    fn test_ingest_is_deterministic() {
        let first = ingest_reader(FLAT_CSV.as_bytes(), "electronics").unwrap();
        let second = ingest_reader(FLAT_CSV.as_bytes(), "electronics").unwrap();
        assert_eq!(first.products, second.products);
        assert_eq!(first.rejected, second.rejected);
    }

    #[test]
    fn test_ingest_leveled_source() {
        let csv = "\
name,price,mrp,discount,category,category_level,parent_category,image,affiliate_link
Novel,450,500,10%,Books,0,,https://img/n,https://buy/n
Thriller,300,400,25%,Fiction,1,Books,https://img/t,https://buy/t
Spy Novel,350,700,50%,Spy,2,Fiction,https://img/s,https://buy/s
";
        let outcome = ingest_reader(csv.as_bytes(), "books").unwrap();
        assert_eq!(outcome.products.len(), 3);
        assert_eq!(outcome.rejected, 0);

        assert_eq!(outcome.products[0].category_path.segments(), ["Books"]);
        assert_eq!(
            outcome.products[1].category_path.segments(),
            ["Books", "Fiction"]
        );
        assert_eq!(
            outcome.products[2].category_path.segments(),
            ["Books", "Fiction", "Spy"]
        );
    }

    #[test]
    fn test_ingest_leveled_child_label_under_two_parents() {
        // "Accessories" exists under both Mobiles and Laptops; each row
        // must follow its own parent_category, not a source-wide guess.
        let csv = "\
name,price,mrp,discount,category,category_level,parent_category,image,affiliate_link
Phones,5000,6000,10%,Mobiles,1,Electronics,https://img/m,https://buy/m
Laptops Hub,50000,60000,15%,Laptops,1,Electronics,https://img/l,https://buy/l
Phone Case,100,200,50%,Accessories,2,Mobiles,https://img/p,https://buy/p
Laptop Bag,900,1800,50%,Accessories,2,Laptops,https://img/b,https://buy/b
";
        let outcome = ingest_reader(csv.as_bytes(), "electronics").unwrap();
        assert_eq!(outcome.products.len(), 4);

        let case = outcome.products.iter().find(|p| p.name == "Phone Case").unwrap();
        assert_eq!(
            case.category_path.segments(),
            ["Electronics", "Mobiles", "Accessories"]
        );
        let bag = outcome.products.iter().find(|p| p.name == "Laptop Bag").unwrap();
        assert_eq!(
            bag.category_path.segments(),
            ["Electronics", "Laptops", "Accessories"]
        );
    }

    #[test]
    fn test_ingest_missing_column_is_fatal() {
        let csv = "name,price,discount\nPhone A,9000,25%\n";
        let err = ingest_reader(csv.as_bytes(), "electronics").unwrap_err();
        assert_eq!(err.source_key(), "electronics");
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }

    #[test]
    fn test_ingest_empty_category_dropped() {
        let csv = "\
name,price,mrp,discount,category,img_link,affiliate_link
Phone A,9000,12000,25%,,https://img/a,https://buy/a
";
        let outcome = ingest_reader(csv.as_bytes(), "electronics").unwrap();
        assert!(outcome.products.is_empty());
        assert_eq!(outcome.rejected, 1);
    }

    #[test]
    fn test_parse_money_formats() {
        assert_eq!(parse_money("399"), Some(399.0));
        assert_eq!(parse_money("₹1,299"), Some(1299.0));
        assert_eq!(parse_money("₹1,29,900.50"), Some(129900.5));
        assert_eq!(parse_money("$24.99"), Some(24.99));
        assert_eq!(parse_money("N/A"), None);
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("free"), None);
    }

    #[test]
    fn test_parse_discount_formats() {
        assert_eq!(parse_discount("25%"), Some(25.0));
        assert_eq!(parse_discount("12.5 %"), Some(12.5));
        assert_eq!(parse_discount("40"), Some(40.0));
        assert_eq!(parse_discount("0%"), Some(0.0));
        assert_eq!(parse_discount("100%"), Some(100.0));
        assert_eq!(parse_discount("150%"), None);
        assert_eq!(parse_discount("N/A"), None);
        assert_eq!(parse_discount("half off"), None);
    }
}
