use crate::normalize::strip_whitespace;

/// Suffix tokens that close an administrative or building fragment. A masked
/// segment ending in one of these anchors reliably on its own, so it is
/// checked by containment instead of the ordered scan.
const REGION_SUFFIXES: &[&str] = &[
    "省", "市", "区", "县", "镇", "乡", "村", "社区", "街道", "路", "街", "号", "栋", "幢", "座",
    "单元", "室", "楼",
];

fn ends_in_region_suffix(segment: &str) -> bool {
    REGION_SUFFIXES.iter().any(|suffix| segment.ends_with(suffix))
}

/// Whether a destination address matches a possibly-redacted source one.
///
/// Redaction hides variable-length middle spans (street and unit numbers)
/// but keeps the remaining fragments in their original order, so visible
/// non-region fragments must appear in the destination address in order.
pub fn address_matches(pending: &str, source: &str) -> bool {
    let pending = strip_whitespace(pending);
    let source = strip_whitespace(source);
    if pending.is_empty() || source.is_empty() {
        return false;
    }

    if !source.contains('*') {
        return pending == source;
    }

    let segments: Vec<&str> = source.split('*').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        // A fully redacted address carries no evidence.
        return false;
    }

    let mut cursor = 0;
    for segment in segments {
        if ends_in_region_suffix(segment) {
            if !pending.contains(segment) {
                return false;
            }
        } else {
            match pending[cursor..].find(segment) {
                Some(at) => cursor += at + segment.len(),
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmasked_requires_equality() {
        assert!(address_matches("浙江省杭州市西湖区文三路100号", "浙江省杭州市西湖区文三路100号"));
        assert!(!address_matches("浙江省杭州市西湖区文三路100号", "浙江省杭州市西湖区文三路101号"));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert!(address_matches(" 浙江省 杭州市 西湖区文三路100号", "浙江省杭州市西湖区文三路 100号"));
    }

    #[test]
    fn masked_segments_must_all_appear() {
        assert!(address_matches("浙江省杭州市西湖区文三路100号", "浙江省**文三路*号"));
        assert!(!address_matches("浙江省杭州市西湖区文三路100号", "江苏省**文三路*号"));
    }

    #[test]
    fn non_region_segments_scan_in_order() {
        let pending = "杭州文一西路998号海创园";
        assert!(address_matches(pending, "文一*海创"));
        assert!(!address_matches(pending, "海创*文一"));
    }

    #[test]
    fn region_segments_float() {
        // Region-suffixed fragments anchor anywhere, whatever their order.
        let pending = "浙江省杭州市西湖区文三路100号";
        assert!(address_matches(pending, "文三路*浙江省"));
    }

    #[test]
    fn fully_masked_is_rejected() {
        assert!(!address_matches("浙江省杭州市", "***"));
        assert!(!address_matches("浙江省杭州市", "*"));
    }

    #[test]
    fn blank_sides_are_rejected() {
        assert!(!address_matches("", "浙江省*"));
        assert!(!address_matches("浙江省杭州市", "  "));
    }
}
