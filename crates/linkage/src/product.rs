use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::config::CatalogConfig;
use crate::split::split_product_cell;

/// Leading CJK or Latin run immediately followed by a bracketed span, the way
/// merchandising names spell brands: `奥克斯（AUX）除螨仪`.
const BRAND_PATTERN: &str = r"^([\p{Han}A-Za-z]+)[（(\[【]";

/// Bracket characters that flag a name as carrying packaging or brand
/// annotations.
const ANNOTATION_MARKERS: &[char] = &['(', '（', '[', '【'];

/// Product taxonomy compiled from configuration, plus the similarity
/// threshold for plain-name comparison.
#[derive(Debug)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<String>>,
    similarity_threshold: f64,
    brand_re: Regex,
}

impl Catalog {
    pub fn new(config: &CatalogConfig) -> Self {
        let categories = if config.categories.is_empty() {
            default_categories()
        } else {
            config.categories.clone()
        };
        Self {
            categories,
            similarity_threshold: config.similarity_threshold,
            brand_re: Regex::new(BRAND_PATTERN).unwrap(),
        }
    }

    /// First category, in name order, with a keyword contained in the
    /// product name.
    pub fn classify(&self, product: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| product.contains(k.as_str())))
            .map(|(name, _)| name.as_str())
    }

    fn brand_token<'a>(&self, product: &'a str) -> Option<&'a str> {
        self.brand_re
            .captures(product)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}

/// Built-in merchandising taxonomy, replaceable wholesale through
/// `[catalog.categories]`.
fn default_categories() -> BTreeMap<String, Vec<String>> {
    let entries: &[(&str, &[&str])] = &[
        ("充电线", &["充电线", "数据线"]),
        ("剃须刀", &["剃须刀", "刮胡刀"]),
        ("塑料袋", &["塑料袋"]),
        ("封套", &["封套"]),
        ("抽纸", &["抽纸", "纸抽"]),
        ("湿巾", &["湿巾", "湿纸巾"]),
        ("礼盒", &["礼盒"]),
        ("纸袋", &["纸袋"]),
        ("除螨仪", &["除螨仪"]),
    ];
    entries
        .iter()
        .map(|(name, keywords)| {
            (
                name.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect()
}

/// Whether two product names refer to the same item.
///
/// Exact equality short-circuits. A source name without bracket markers is
/// compared purely by edit-distance similarity. Bracketed names go through
/// the taxonomy: same category with agreeing (or absent) brand tokens.
pub fn product_matches(pending: &str, source: &str, catalog: &Catalog) -> bool {
    let pending = pending.trim();
    let source = source.trim();
    if pending.is_empty() || source.is_empty() {
        return false;
    }
    if pending == source {
        return true;
    }

    if !source.contains(ANNOTATION_MARKERS) {
        return similarity(pending, source) >= catalog.similarity_threshold;
    }

    match (catalog.classify(pending), catalog.classify(source)) {
        (Some(a), Some(b)) => {
            if a != b {
                return false;
            }
            match (catalog.brand_token(pending), catalog.brand_token(source)) {
                (Some(x), Some(y)) => x == y,
                _ => true,
            }
        }
        // Outside the taxonomy the only remaining signal is raw character
        // overlap.
        _ => char_overlap_matches(pending, source),
    }
}

/// Whether the destination product matches any entry of a raw multi-product
/// source cell.
pub fn product_matches_any(pending: &str, source_cell: &str, catalog: &Catalog) -> bool {
    split_product_cell(source_cell)
        .iter()
        .any(|entry| product_matches(pending, entry, catalog))
}

/// The entry whose name best matches the destination product, among entries
/// that match at all. Ties keep the earliest entry.
pub fn best_entry(pending: &str, entries: &[String], catalog: &Catalog) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in entries.iter().enumerate() {
        if !product_matches(pending, entry, catalog) {
            continue;
        }
        let ratio = similarity(pending, entry);
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((i, ratio));
        }
    }
    best.map(|(i, _)| i)
}

/// Normalized edit-distance similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Distinct shared characters exceeding 0.3 of the shorter name's length.
fn char_overlap_matches(a: &str, b: &str) -> bool {
    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let shared = set_a.intersection(&set_b).count();
    let min_len = a.chars().count().min(b.chars().count());
    shared as f64 > 0.3 * min_len as f64
}
