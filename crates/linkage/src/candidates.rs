use crate::address::address_matches;
use crate::model::{DestinationRecord, MatchCandidate, MatchedBy, SourceRecord};
use crate::phone::phone_matches;
use crate::product::{product_matches, Catalog};

// Scoring weights. The absolute values are historical; the load-bearing
// contract is the ordering: product-only outranks phone alone, and phone
// outranks address-only.
const PHONE_BASE: i64 = 10;
const ADDRESS_BONUS: i64 = 5;
const ADDRESS_BASE: i64 = 7;
const PRODUCT_BONUS: i64 = 10;
const PRODUCT_BASE: i64 = 15;

/// Score every same-name source record against one destination row.
///
/// Comparator tiers are attempted only when both sides map the field and the
/// destination value is present. A record with no comparator evidence yields
/// no candidate at all; best-effort coverage is the allocator's job.
pub fn score_candidates(
    dest: &DestinationRecord,
    group: &[usize],
    records: &[SourceRecord],
    catalog: &Catalog,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();

    for &pos in group {
        let record = &records[pos];

        let phone_hit = match (&dest.phone, &record.phone) {
            (Some(d), Some(s)) => phone_matches(d, s),
            _ => false,
        };
        let address_hit = match (&dest.address, &record.address) {
            (Some(d), Some(s)) => address_matches(d, s),
            _ => false,
        };
        let product_hit = match &dest.product {
            Some(d) => record
                .products
                .iter()
                .any(|entry| product_matches(d, entry, catalog)),
            None => false,
        };

        let (score, matched_by) = if phone_hit {
            let mut score = PHONE_BASE;
            if address_hit {
                score += ADDRESS_BONUS;
            }
            if product_hit {
                score += PRODUCT_BONUS;
            }
            (score, MatchedBy::Phone)
        } else if address_hit {
            let mut score = ADDRESS_BASE;
            if product_hit {
                score += PRODUCT_BONUS;
            }
            (score, MatchedBy::Address)
        } else if product_hit {
            (PRODUCT_BASE, MatchedBy::Product)
        } else {
            continue;
        };

        candidates.push(MatchCandidate {
            pos,
            source_row: record.index,
            score,
            matched_by,
        });
    }

    // Highest score first; ties go to the earlier source row so the result
    // does not depend on grouping order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.source_row.cmp(&b.source_row)));
    candidates
}
