use crate::model::SourceRecord;

/// How one configured source column lands in the output row.
#[derive(Debug, Clone, Copy)]
enum AddAction {
    /// A destination column of the same name exists: overlay its cell.
    Overlay { dest_col: usize, source_col: usize },
    /// New column appended after the destination columns.
    Append { source_col: usize },
}

/// Precomputed merge layout: the output headers plus one action per added
/// column. Built once per pass, applied to every row.
#[derive(Debug)]
pub struct MergePlan {
    pub headers: Vec<String>,
    actions: Vec<AddAction>,
    dest_width: usize,
    source_product_col: Option<usize>,
}

impl MergePlan {
    /// `add` pairs each configured column name with its source-table index,
    /// in config order. An added column whose name collides with the
    /// destination's linkage-name column is dropped from the plan: the name
    /// the rows were grouped on is never overwritten.
    pub fn new(
        dest_headers: &[String],
        dest_name_col: usize,
        add: &[(String, usize)],
        source_product_col: Option<usize>,
    ) -> Self {
        let mut headers: Vec<String> = dest_headers.to_vec();
        let mut actions = Vec::new();

        for (name, source_col) in add {
            match dest_headers.iter().position(|h| h == name) {
                Some(dest_col) if dest_col == dest_name_col => continue,
                Some(dest_col) => actions.push(AddAction::Overlay {
                    dest_col,
                    source_col: *source_col,
                }),
                None => {
                    headers.push(name.clone());
                    actions.push(AddAction::Append {
                        source_col: *source_col,
                    });
                }
            }
        }

        Self {
            headers,
            actions,
            dest_width: dest_headers.len(),
            source_product_col,
        }
    }

    /// Build one output row. `matched` carries the winning record plus the
    /// chosen product entry for multi-product cells; `None` keeps every
    /// destination cell and blank-fills the appended columns.
    pub fn merge_row(
        &self,
        dest_row: &[String],
        matched: Option<(&SourceRecord, Option<usize>)>,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.headers.len());
        out.extend(dest_row.iter().cloned());
        out.resize(self.dest_width, String::new());

        for action in &self.actions {
            match (action, matched) {
                (AddAction::Overlay { dest_col, source_col }, Some((record, entry))) => {
                    out[*dest_col] = self.source_value(record, entry, *source_col);
                }
                (AddAction::Overlay { .. }, None) => {}
                (AddAction::Append { source_col }, Some((record, entry))) => {
                    out.push(self.source_value(record, entry, *source_col));
                }
                (AddAction::Append { .. }, None) => out.push(String::new()),
            }
        }

        out
    }

    /// The chosen entry's name replaces the raw multi-product cell; every
    /// other column carries over verbatim.
    fn source_value(&self, record: &SourceRecord, entry: Option<usize>, source_col: usize) -> String {
        if let (Some(product_col), Some(chosen)) = (self.source_product_col, entry) {
            if source_col == product_col {
                return record.products[chosen].clone();
            }
        }
        record.row.get(source_col).cloned().unwrap_or_default()
    }
}
