use std::collections::{HashMap, HashSet};

use crate::allocate::{allocate, Allocation, UsageLedger};
use crate::candidates::score_candidates;
use crate::config::{ColumnRoles, DuplicatePolicy, LinkConfig};
use crate::error::LinkError;
use crate::merge::MergePlan;
use crate::model::{
    DestinationRecord, LinkInput, LinkMeta, LinkResult, LinkedRow, Outcome, SourceRecord, Table,
};
use crate::normalize::{is_blank, normalize_name, phone_digits, phone_digits_masked};
use crate::product::Catalog;
use crate::split::split_product_cell;
use crate::stats::{compute_summary, duplicate_names};

// ---------------------------------------------------------------------------
// Field resolution
// ---------------------------------------------------------------------------

/// Column indices for one table's mapped roles.
#[derive(Debug, Clone)]
pub struct RoleFields {
    pub name: usize,
    pub phone: Option<usize>,
    pub address: Option<usize>,
    pub product: Option<usize>,
}

/// Every configured column reference resolved against the actual headers.
///
/// Resolution happens once per pass; afterwards rows are addressed only by
/// index, never by header probing.
#[derive(Debug, Clone)]
pub struct ResolvedFields {
    pub dest: RoleFields,
    pub source: RoleFields,
    /// Configured add columns paired with their source-table index, in
    /// config order.
    pub add: Vec<(String, usize)>,
}

impl ResolvedFields {
    pub fn resolve(
        config: &LinkConfig,
        destination: &Table,
        source: &Table,
    ) -> Result<Self, LinkError> {
        let dest = resolve_roles("destination", &config.destination.columns, &destination.headers)?;
        let src = resolve_roles("source", &config.source.columns, &source.headers)?;

        let mut add = Vec::with_capacity(config.merge.columns_to_add.len());
        for column in &config.merge.columns_to_add {
            let idx = find_column("source", &source.headers, column)?;
            add.push((column.clone(), idx));
        }

        Ok(Self { dest, source: src, add })
    }
}

fn resolve_roles(
    table: &str,
    roles: &ColumnRoles,
    headers: &[String],
) -> Result<RoleFields, LinkError> {
    if headers.is_empty() {
        return Err(LinkError::EmptyTable { table: table.into() });
    }
    let name = find_column(table, headers, &roles.name)?;
    let phone = roles
        .phone
        .as_deref()
        .map(|column| find_column(table, headers, column))
        .transpose()?;
    let address = roles
        .address
        .as_deref()
        .map(|column| find_column(table, headers, column))
        .transpose()?;
    let product = roles
        .product
        .as_deref()
        .map(|column| find_column(table, headers, column))
        .transpose()?;
    Ok(RoleFields { name, phone, address, product })
}

fn find_column(table: &str, headers: &[String], column: &str) -> Result<usize, LinkError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LinkError::MissingColumn {
            table: table.into(),
            column: column.into(),
        })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn optional_cell(row: &[String], idx: Option<usize>) -> Option<String> {
    let value = cell(row, idx?);
    if is_blank(value) {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse CSV text into a `Table`. Short rows are padded to the header width
/// so downstream indexing never probes past the end; extra cells beyond the
/// header are dropped.
pub fn load_table(table: &str, csv_data: &str) -> Result<Table, LinkError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LinkError::Csv { table: table.into(), message: e.to_string() })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(LinkError::EmptyTable { table: table.into() });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| LinkError::Csv { table: table.into(), message: e.to_string() })?;
        let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

// ---------------------------------------------------------------------------
// Record extraction
// ---------------------------------------------------------------------------

fn build_source_records(
    table: &Table,
    fields: &RoleFields,
    policy: DuplicatePolicy,
) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in table.rows.iter().enumerate() {
        let name = normalize_name(cell(row, fields.name));
        if is_blank(&name) {
            continue;
        }
        if policy == DuplicatePolicy::KeepFirst && !seen.insert(name.clone()) {
            continue;
        }

        let products = optional_cell(row, fields.product)
            .as_deref()
            .map(split_product_cell)
            .unwrap_or_default();

        records.push(SourceRecord {
            index,
            name,
            phone: optional_cell(row, fields.phone)
                .map(|v| phone_digits_masked(&v))
                .filter(|v| !v.is_empty()),
            address: optional_cell(row, fields.address),
            products,
            row: row.clone(),
        });
    }

    records
}

fn destination_record(index: usize, row: &[String], fields: &RoleFields) -> DestinationRecord {
    DestinationRecord {
        index,
        name: normalize_name(cell(row, fields.name)),
        phone: optional_cell(row, fields.phone)
            .map(|v| phone_digits(&v))
            .filter(|v| !v.is_empty()),
        address: optional_cell(row, fields.address),
        product: optional_cell(row, fields.product),
    }
}

// ---------------------------------------------------------------------------
// The pass
// ---------------------------------------------------------------------------

/// Run one linkage pass: group source records by exact normalized name,
/// score and allocate them per destination row, and merge the configured
/// source columns into the output. Produces exactly one output row per
/// destination row, in destination order.
pub fn run(config: &LinkConfig, input: &LinkInput) -> Result<LinkResult, LinkError> {
    let fields = ResolvedFields::resolve(config, &input.destination, &input.source)?;
    let catalog = Catalog::new(&config.catalog);

    let records =
        build_source_records(&input.source, &fields.source, config.merge.duplicate_policy);
    log::debug!(
        "usable source records: {} of {} rows (duplicate policy {})",
        records.len(),
        input.source.rows.len(),
        config.merge.duplicate_policy,
    );

    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        groups.entry(record.name.as_str()).or_default().push(pos);
    }

    let plan = MergePlan::new(
        &input.destination.headers,
        fields.dest.name,
        &fields.add,
        fields.source.product,
    );
    let mut ledger = UsageLedger::new(&records);
    let empty_group: Vec<usize> = Vec::new();

    let mut rows = Vec::with_capacity(input.destination.rows.len());
    for (index, dest_row) in input.destination.rows.iter().enumerate() {
        let dest = destination_record(index, dest_row, &fields.dest);
        let group = if dest.name.is_empty() {
            &empty_group
        } else {
            groups.get(dest.name.as_str()).unwrap_or(&empty_group)
        };

        let candidates = score_candidates(&dest, group, &records, &catalog);
        let allocation = allocate(&dest, &candidates, group, &records, &catalog, &mut ledger);

        let (outcome, source_index, score, matched) = match allocation {
            Allocation::Matched { pos, entry, matched_by, score } => (
                Outcome::from(matched_by),
                Some(records[pos].index),
                Some(score),
                Some((&records[pos], entry)),
            ),
            Allocation::Fallback { pos, entry } => (
                Outcome::Fallback,
                Some(records[pos].index),
                None,
                Some((&records[pos], entry)),
            ),
            Allocation::Unmatched => (Outcome::NoMatch, None, None, None),
        };

        rows.push(LinkedRow {
            dest_index: index,
            outcome,
            source_index,
            score,
            values: plan.merge_row(dest_row, matched),
        });
    }

    let mut headers = plan.headers.clone();
    if let Some(selected) = &config.output.columns {
        project_columns(selected, &mut headers, &mut rows);
    }

    let summary = compute_summary(
        &rows,
        duplicate_names(&input.destination, fields.dest.name).len(),
        duplicate_names(&input.source, fields.source.name).len(),
    );
    log::info!(
        "linked {} rows: {} phone, {} address, {} product, {} fallback, {} unmatched",
        summary.total_rows,
        summary.phone_matched,
        summary.address_matched,
        summary.product_matched,
        summary.fallback,
        summary.unmatched,
    );

    Ok(LinkResult {
        meta: LinkMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        headers,
        rows,
    })
}

/// Restrict and reorder the output columns per `[output] columns`. Unknown
/// names are skipped with a warning rather than failing the pass.
fn project_columns(selected: &[String], headers: &mut Vec<String>, rows: &mut [LinkedRow]) {
    let mut indices = Vec::with_capacity(selected.len());
    let mut kept = Vec::with_capacity(selected.len());
    for name in selected {
        match headers.iter().position(|h| h == name) {
            Some(idx) => {
                indices.push(idx);
                kept.push(name.clone());
            }
            None => log::warn!("output column '{name}' not in result; skipping"),
        }
    }

    for row in rows.iter_mut() {
        row.values = indices
            .iter()
            .map(|&i| row.values.get(i).cloned().unwrap_or_default())
            .collect();
    }
    *headers = kept;
}
