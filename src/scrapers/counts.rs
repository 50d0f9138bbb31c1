//! Room counts from free-text phrases such as "2 bedrooms" or "1.5 shared baths".

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

fn first_number(text: &str) -> Option<&str> {
    NUMBER.find(text).map(|m| m.as_str())
}

/// Bedroom count. A studio with no number counts as zero bedrooms; anything
/// else without a whole number resolves to `None`.
pub fn parse_bedrooms(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if let Some(number) = first_number(&lower) {
        return number.parse().ok();
    }
    if lower.contains("studio") {
        return Some(0);
    }
    None
}

/// Bathroom count, fractional counts allowed.
pub fn parse_bathrooms(text: &str) -> Option<f32> {
    let lower = text.trim().to_lowercase();
    if let Some(number) = first_number(&lower) {
        return number.parse().ok();
    }
    if lower.contains("half-bath") || lower.contains("half bath") {
        return Some(0.5);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bedrooms_from_phrases() {
        assert_eq!(parse_bedrooms("2 bedrooms"), Some(2));
        assert_eq!(parse_bedrooms("1 bedroom"), Some(1));
        assert_eq!(parse_bedrooms("  10 Bedrooms "), Some(10));
        assert_eq!(parse_bedrooms("3"), Some(3));
    }

    #[test]
    fn studio_counts_as_zero_bedrooms() {
        assert_eq!(parse_bedrooms("Studio"), Some(0));
        assert_eq!(parse_bedrooms("studio apartment"), Some(0));
    }

    #[test]
    fn explicit_count_beats_studio_wording() {
        assert_eq!(parse_bedrooms("1 bedroom studio"), Some(1));
        assert_eq!(parse_bedrooms("Studio with 2 bedrooms"), Some(2));
    }

    #[test]
    fn unparsable_bedrooms_are_none() {
        assert_eq!(parse_bedrooms("bedrooms"), None);
        assert_eq!(parse_bedrooms(""), None);
        assert_eq!(parse_bedrooms("2.5 bedrooms"), None);
        assert_eq!(parse_bedrooms("Ask the host"), None);
    }

    #[test]
    fn bathrooms_allow_fractions() {
        assert_eq!(parse_bathrooms("1.5 baths"), Some(1.5));
        assert_eq!(parse_bathrooms("2 shared baths"), Some(2.0));
        assert_eq!(parse_bathrooms("1"), Some(1.0));
        assert_eq!(parse_bathrooms("Half-bath"), Some(0.5));
        assert_eq!(parse_bathrooms("Shared half bath"), Some(0.5));
    }

    #[test]
    fn unparsable_bathrooms_are_none() {
        assert_eq!(parse_bathrooms("baths"), None);
        assert_eq!(parse_bathrooms(""), None);
    }
}
