use crate::normalize::is_blank;

/// Cell separators. The two-character form comes before its one-character
/// suffix so that it is consumed whole.
const SEPARATORS: &[&str] = &["以及", "，", ",", "、", ";", "；", "和", "+", "及"];

const OPEN_BRACKETS: &[char] = &['(', '（', '[', '【'];
const CLOSE_BRACKETS: &[char] = &[')', '）', ']', '】'];

/// Split a raw product cell into cleaned product names.
///
/// Mixed separators within one cell are all honored, bracketed quantity or
/// batch annotations are dropped, and blank fragments are discarded. Order
/// is preserved: the allocator maps entry position onto the usage counter.
pub fn split_product_cell(raw: &str) -> Vec<String> {
    let mut fragments = vec![raw.to_string()];
    for sep in SEPARATORS {
        fragments = fragments
            .iter()
            .flat_map(|f| f.split(sep))
            .map(str::to_string)
            .collect();
    }

    fragments
        .iter()
        .map(|f| strip_annotations(f))
        .map(|f| f.trim().to_string())
        .filter(|f| !is_blank(f))
        .collect()
}

/// Drop bracketed spans such as `（2个）` or `[250506]`, tolerating nesting
/// and unbalanced closers.
fn strip_annotations(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut depth = 0usize;
    for c in fragment.chars() {
        if OPEN_BRACKETS.contains(&c) {
            depth += 1;
        } else if CLOSE_BRACKETS.contains(&c) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 {
            out.push(c);
        }
    }
    out
}
