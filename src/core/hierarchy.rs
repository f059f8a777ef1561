//! Postcode generalization.
//!
//! Turns whatever the user typed into an ordered list of fragments to search
//! for, most specific first: the full postcode (if one was given), the
//! outward code, then successively broader districts down to the area.

use crate::domain::model::PostcodeFragment;
use regex::Regex;
use std::sync::LazyLock;

/// Broadening never shortens a fragment below this many characters.
pub const MIN_FRAGMENT_LEN: usize = 1;

/// Outward code glued directly to an inward code, e.g. `SW1A0AA`.
static SPACELESS_FULL_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{1,2}[0-9][A-Z0-9]?)([0-9][A-Z]{2})$").expect("static regex is valid")
});

/// Trim, uppercase and collapse internal whitespace. A spaceless complete
/// postcode gets its separating space back.
pub fn normalize(raw: &str) -> String {
    let collapsed = raw
        .split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.contains(' ') {
        return collapsed;
    }

    match SPACELESS_FULL_POSTCODE.captures(&collapsed) {
        Some(caps) => format!("{} {}", &caps[1], &caps[2]),
        None => collapsed,
    }
}

/// Build the search hierarchy for a raw postcode string.
///
/// Returns an empty list for blank input; otherwise the list is non-empty,
/// free of duplicates and never grows in length from one element to the next.
pub fn generate(raw: &str) -> Vec<PostcodeFragment> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut fragments: Vec<String> = Vec::new();

    let outward = match normalized.split_once(' ') {
        Some((outward, _)) => {
            let outward = outward.to_string();
            push(normalized.clone(), &mut fragments);
            outward
        }
        None => normalized,
    };

    let mut current = outward;
    push(current.clone(), &mut fragments);

    while current.len() > MIN_FRAGMENT_LEN {
        match broaden(&current) {
            Some(next) => {
                push(next.clone(), &mut fragments);
                current = next;
            }
            None => break,
        }
    }

    fragments
        .into_iter()
        .map(PostcodeFragment::new_unchecked)
        .collect()
}

fn push(fragment: String, fragments: &mut Vec<String>) {
    if !fragments.contains(&fragment) {
        fragments.push(fragment);
    }
}

/// One broadening step: `SW1A` -> `SW1`, `SE21` -> `SE2`, `SE2` -> `SE`.
/// `None` once only the letter area (or nothing strippable) remains.
fn broaden(outward: &str) -> Option<String> {
    let last = outward.chars().last()?;
    let has_digit = outward.chars().any(|c| c.is_ascii_digit());

    let strippable = last.is_ascii_digit() || (last.is_ascii_alphabetic() && has_digit);
    if !strippable {
        return None;
    }

    let mut next = outward.to_string();
    next.pop();
    if next.is_empty() || next == outward {
        None
    } else {
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fragments: &[PostcodeFragment]) -> Vec<&str> {
        fragments.iter().map(PostcodeFragment::as_str).collect()
    }

    #[test]
    fn test_full_postcode_hierarchy() {
        assert_eq!(strings(&generate("SW1A 0AA")), vec!["SW1A 0AA", "SW1A", "SW1", "SW"]);
    }

    #[test]
    fn test_two_digit_district_steps_through_each_digit() {
        assert_eq!(strings(&generate("SE21")), vec!["SE21", "SE2", "SE"]);
    }

    #[test]
    fn test_single_letter_area() {
        assert_eq!(strings(&generate("M1")), vec!["M1", "M"]);
    }

    #[test]
    fn test_bare_area_is_single_fragment() {
        assert_eq!(strings(&generate("SW")), vec!["SW"]);
        assert_eq!(strings(&generate("m")), vec!["M"]);
    }

    #[test]
    fn test_lowercase_spaceless_input_is_normalized() {
        assert_eq!(strings(&generate("sw1a0aa")), vec!["SW1A 0AA", "SW1A", "SW1", "SW"]);
    }

    #[test]
    fn test_irregular_whitespace_is_collapsed() {
        assert_eq!(
            strings(&generate("  ec1a \t  1bb ")),
            vec!["EC1A 1BB", "EC1A", "EC1", "EC"]
        );
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(generate("").is_empty());
        assert!(generate("   \t ").is_empty());
    }

    #[test]
    fn test_numeric_garbage_terminates() {
        assert_eq!(strings(&generate("1234")), vec!["1234", "123", "12", "1"]);
    }

    #[test]
    fn test_hierarchy_invariants_hold() {
        let inputs = [
            "SW1A 0AA", "sw1a0aa", "SE21", "M1", "SW", "EC1A 1BB", "W1A 1AA", "B33 8TH",
            "CR2 6XH", "DN55 1PT", "1234", "A B C", "N1C", "GIR 0AA",
        ];
        for input in inputs {
            let fragments = generate(input);
            assert!(!fragments.is_empty(), "{input} produced no fragments");

            for pair in fragments.windows(2) {
                assert!(
                    pair[1].len() <= pair[0].len(),
                    "{input}: {} is longer than {}",
                    pair[1],
                    pair[0]
                );
            }

            let mut seen = std::collections::HashSet::new();
            for fragment in &fragments {
                assert!(seen.insert(fragment.as_str()), "{input}: duplicate {fragment}");
            }
        }
    }

    #[test]
    fn test_normalize_leaves_partial_codes_alone() {
        assert_eq!(normalize("se21"), "SE21");
        assert_eq!(normalize("w1a 1aa"), "W1A 1AA");
        assert_eq!(normalize("m11ae"), "M1 1AE");
    }
}
