use std::collections::HashMap;

use crate::model::{LinkSummary, LinkedRow, Outcome, Table};
use crate::normalize::{is_blank, normalize_name};

/// Aggregate counts for one linkage pass.
pub fn compute_summary(
    rows: &[LinkedRow],
    duplicate_destination_names: usize,
    duplicate_source_names: usize,
) -> LinkSummary {
    let mut outcome_counts: HashMap<String, usize> = HashMap::new();
    let mut phone_matched = 0;
    let mut address_matched = 0;
    let mut product_matched = 0;
    let mut fallback = 0;
    let mut unmatched = 0;

    for row in rows {
        *outcome_counts.entry(row.outcome.to_string()).or_insert(0) += 1;
        match row.outcome {
            Outcome::Phone => phone_matched += 1,
            Outcome::Address => address_matched += 1,
            Outcome::Product => product_matched += 1,
            Outcome::Fallback => fallback += 1,
            Outcome::NoMatch => unmatched += 1,
        }
    }

    LinkSummary {
        total_rows: rows.len(),
        phone_matched,
        address_matched,
        product_matched,
        fallback,
        unmatched,
        duplicate_destination_names,
        duplicate_source_names,
        outcome_counts,
    }
}

/// Normalized names appearing more than once in a table, in first-appearance
/// order. Counted on the raw table, before any duplicate policy collapses
/// rows.
pub fn duplicate_names(table: &Table, name_col: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for row in &table.rows {
        let name = normalize_name(row.get(name_col).map(String::as_str).unwrap_or(""));
        if is_blank(&name) {
            continue;
        }
        let count = counts.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            order.push(name);
        }
    }

    order.into_iter().filter(|name| counts[name] > 1).collect()
}
