use crate::normalize::phone_digits;

/// Whether a destination phone number matches a possibly-redacted source one.
///
/// Logistics exports redact middle digits for privacy (`138****0001`) or
/// carry only a fragment of the number; exact equality would reject nearly
/// every legitimate pairing.
pub fn phone_matches(pending: &str, source: &str) -> bool {
    let pending_digits = phone_digits(pending);
    let source_digits = phone_digits(source);

    if pending_digits.len() < 7 || source_digits.len() < 4 {
        return false;
    }

    // A source number carrying a full complement of digits must agree exactly.
    if source_digits.len() >= 10 {
        return pending_digits == source_digits;
    }

    if source.contains('*') {
        // Digits before the first marker and after the last one anchor the
        // visible ends. An empty end imposes no constraint.
        let prefix = phone_digits(source.split('*').next().unwrap_or(""));
        let suffix = phone_digits(source.rsplit('*').next().unwrap_or(""));
        return prefix.len() + suffix.len() <= pending_digits.len()
            && pending_digits.starts_with(prefix.as_str())
            && pending_digits.ends_with(suffix.as_str());
    }

    // Unmasked fragment of 4..=9 digits: anchor on the leading digits, and on
    // the trailing ones once the fragment is long enough to carry both.
    if source_digits.len() <= 4 {
        pending_digits.starts_with(source_digits.as_str())
    } else if source_digits.len() <= 7 {
        pending_digits[..4] == source_digits[..4]
    } else {
        pending_digits[..4] == source_digits[..4]
            && pending_digits[pending_digits.len() - 3..]
                == source_digits[source_digits.len() - 3..]
    }
}
