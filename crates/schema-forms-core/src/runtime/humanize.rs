// crates/schema-forms-core/src/runtime/humanize.rs
// ============================================================================
// Module: Label Humanizer
// Description: Converts machine identifiers into display labels.
// Purpose: Provide fallback titles and option labels.
// Dependencies: none
// ============================================================================

//! ## Overview
//! `line_item` and `line-item` both become `Line Item`. Only the first
//! character of each word is changed, so already-humanized labels are fixed
//! points.

/// Replaces `_` and `-` with spaces and upper-cases the first letter of each word.
#[must_use]
pub fn humanize(machine_name: &str) -> String {
    let mut label = String::with_capacity(machine_name.len());
    let mut word_start = true;
    for ch in machine_name.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        if ch.is_whitespace() {
            word_start = true;
            label.push(ch);
        } else if word_start {
            word_start = false;
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::humanize;

    #[test]
    fn replaces_separators_and_capitalizes_words() {
        assert_eq!(humanize("a-foo"), "A Foo");
        assert_eq!(humanize("line_item"), "Line Item");
        assert_eq!(humanize("mixed_separators-here"), "Mixed Separators Here");
    }

    #[test]
    fn keeps_existing_capitals_and_spacing() {
        assert_eq!(humanize("A Foo"), "A Foo");
        assert_eq!(humanize("iPhone model"), "IPhone Model");
        assert_eq!(humanize("double__gap"), "Double  Gap");
        assert_eq!(humanize(""), "");
    }

    proptest! {
        #[test]
        fn humanizing_is_idempotent(name in "[a-zA-Z0-9 _-]{0,24}") {
            let once = humanize(&name);
            prop_assert_eq!(humanize(&once), once);
        }
    }
}
