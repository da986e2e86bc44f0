use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

/// An in-memory table: headers plus rows of cell strings.
///
/// Rows may be shorter than the header; readers treat missing cells as empty.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The two pre-loaded tables for one linkage pass.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Pending shipments waiting for logistics details.
    pub destination: Table,
    /// Logistics records supplying those details.
    pub source: Table,
}

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// One source row with its linkage fields extracted and the product cell
/// pre-split. Allocation identity is the record's position in the engine's
/// record vector, so two rows stay distinct even when every field agrees.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// Row position in the original source table.
    pub index: usize,
    /// Whitespace-normalized linkage name.
    pub name: String,
    /// Digits and mask markers only; `None` when unmapped or blank.
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Cleaned product names split out of the multi-valued cell.
    pub products: Vec<String>,
    /// The untouched original row, for merging.
    pub row: Vec<String>,
}

/// One destination row's linkage fields. The row itself stays in the table
/// and passes through the merger unchanged.
#[derive(Debug, Clone)]
pub struct DestinationRecord {
    pub index: usize,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub product: Option<String>,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// The strongest comparator tier behind a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    Phone,
    Address,
    Product,
}

/// One same-name source record scored against a destination row.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    /// Position in the engine's record vector.
    pub pos: usize,
    /// The record's original source-table row, used as the sort tie-break.
    pub source_row: usize,
    pub score: i64,
    pub matched_by: MatchedBy,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How a destination row was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Matched with phone evidence, the strongest tier.
    Phone,
    /// Matched on address, without phone agreement.
    Address,
    /// Matched on product content alone.
    Product,
    /// No comparator agreed; assigned a same-name record for coverage.
    Fallback,
    /// No usable source record remained.
    NoMatch,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Product => "product",
            Self::Fallback => "fallback",
            Self::NoMatch => "no_match",
        };
        write!(f, "{label}")
    }
}

impl From<MatchedBy> for Outcome {
    fn from(matched_by: MatchedBy) -> Self {
        match matched_by {
            MatchedBy::Phone => Self::Phone,
            MatchedBy::Address => Self::Address,
            MatchedBy::Product => Self::Product,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One output row: the merged cell values plus linkage provenance.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedRow {
    /// Position of the row in the destination table.
    pub dest_index: usize,
    pub outcome: Outcome,
    /// Original source-table row the record came from, when matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
    /// Candidate score, absent for fallback and unmatched rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub total_rows: usize,
    pub phone_matched: usize,
    pub address_matched: usize,
    pub product_matched: usize,
    pub fallback: usize,
    pub unmatched: usize,
    /// Names appearing more than once in each input table, counted before
    /// any duplicate policy is applied.
    pub duplicate_destination_names: usize,
    pub duplicate_source_names: usize,
    pub outcome_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Everything one linkage pass produces.
#[derive(Debug, Clone, Serialize)]
pub struct LinkResult {
    pub meta: LinkMeta,
    pub summary: LinkSummary,
    /// Output headers: destination headers, then appended source columns,
    /// after any configured projection.
    pub headers: Vec<String>,
    /// Exactly one row per destination row, in destination order.
    pub rows: Vec<LinkedRow>,
}
