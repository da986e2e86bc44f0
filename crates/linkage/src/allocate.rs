use crate::model::{DestinationRecord, MatchCandidate, MatchedBy, SourceRecord};
use crate::product::{best_entry, Catalog};

/// Per-record allocation capacity. A record may satisfy as many destination
/// rows as it has product entries, and always at least one.
#[derive(Debug)]
pub struct UsageLedger {
    counts: Vec<UseCount>,
}

#[derive(Debug, Clone, Copy)]
struct UseCount {
    used: u32,
    cap: u32,
}

impl UsageLedger {
    pub fn new(records: &[SourceRecord]) -> Self {
        let counts = records
            .iter()
            .map(|record| UseCount {
                used: 0,
                cap: record.products.len().max(1) as u32,
            })
            .collect();
        Self { counts }
    }

    pub fn has_capacity(&self, pos: usize) -> bool {
        let count = self.counts[pos];
        count.used < count.cap
    }

    pub fn times_used(&self, pos: usize) -> u32 {
        self.counts[pos].used
    }

    fn commit(&mut self, pos: usize) {
        self.counts[pos].used += 1;
    }
}

/// Where one destination row ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// A ranked candidate with remaining capacity won.
    Matched {
        pos: usize,
        /// Product entry chosen for multi-product records; `None` keeps the
        /// raw cell.
        entry: Option<usize>,
        matched_by: MatchedBy,
        score: i64,
    },
    /// No comparator agreed; a same-name record was assigned for coverage.
    Fallback { pos: usize, entry: Option<usize> },
    /// Every same-name record was exhausted, or none existed.
    Unmatched,
}

/// Walk the ranked candidates, then the raw name group, committing the first
/// record with remaining capacity. Commits mutate the ledger, so allocation
/// order across destination rows is part of the contract.
pub fn allocate(
    dest: &DestinationRecord,
    candidates: &[MatchCandidate],
    group: &[usize],
    records: &[SourceRecord],
    catalog: &Catalog,
    ledger: &mut UsageLedger,
) -> Allocation {
    for candidate in candidates {
        if !ledger.has_capacity(candidate.pos) {
            continue;
        }
        let entry = choose_entry(
            dest,
            &records[candidate.pos],
            ledger.times_used(candidate.pos),
            catalog,
        );
        ledger.commit(candidate.pos);
        return Allocation::Matched {
            pos: candidate.pos,
            entry,
            matched_by: candidate.matched_by,
            score: candidate.score,
        };
    }

    // Best-effort coverage: the first same-name record, in source order,
    // that can still be used.
    for &pos in group {
        if !ledger.has_capacity(pos) {
            continue;
        }
        let entry = round_robin_entry(&records[pos], ledger.times_used(pos));
        ledger.commit(pos);
        return Allocation::Fallback { pos, entry };
    }

    Allocation::Unmatched
}

/// Entry selection for a committed record: the best content match against
/// the destination's product when one exists, else round-robin by usage.
/// Records with fewer than two entries keep their raw cell.
fn choose_entry(
    dest: &DestinationRecord,
    record: &SourceRecord,
    times_used: u32,
    catalog: &Catalog,
) -> Option<usize> {
    if record.products.len() < 2 {
        return None;
    }
    if let Some(product) = &dest.product {
        if let Some(best) = best_entry(product, &record.products, catalog) {
            return Some(best);
        }
    }
    round_robin_entry(record, times_used)
}

fn round_robin_entry(record: &SourceRecord, times_used: u32) -> Option<usize> {
    if record.products.len() < 2 {
        None
    } else {
        Some(times_used as usize)
    }
}
