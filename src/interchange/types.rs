//! External data-type tokens to internal [`DataType`].
//!
//! Matching is a case-insensitive substring search in a fixed priority
//! order, so vendor-prefixed tokens (`rtLongInteger`, `PhoneNumber`) still
//! resolve. It is a heuristic: tokens that happen to contain a keyword are
//! mapped by that keyword, and anything unrecognized falls back to text.

use crate::model::DataType;

/// Keyword table, checked in order. Longer keywords precede the shorter
/// ones they contain (`longinteger` before `integer`, `datetime` before
/// `date`).
const KEYWORDS: &[(&str, DataType)] = &[
    ("text", DataType::Text),
    ("phone", DataType::Text),
    ("email", DataType::Text),
    ("longinteger", DataType::LongInteger),
    ("integer", DataType::Integer),
    ("decimal", DataType::Decimal),
    ("currency", DataType::Decimal),
    ("boolean", DataType::Boolean),
    ("datetime", DataType::DateTime),
    ("date", DataType::Date),
    ("binary", DataType::Binary),
];

/// Map an external type token to a [`DataType`]. Total: empty and unknown
/// tokens map to [`DataType::Text`].
pub fn map_external_type(token: &str) -> DataType {
    let lower = token.to_ascii_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DataType::Text, |(_, data_type)| *data_type)
}

/// Canonical external label for a [`DataType`].
///
/// `Identifier`, `Record` and `List` have no keyword in the mapping table
/// and come back as `Text` when re-imported.
pub fn external_type_label(data_type: DataType) -> &'static str {
    data_type.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Text", DataType::Text)]
    #[case("rtText", DataType::Text)]
    #[case("PhoneNumber", DataType::Text)]
    #[case("Email", DataType::Text)]
    #[case("LongInteger", DataType::LongInteger)]
    #[case("rtLongInteger", DataType::LongInteger)]
    #[case("Integer", DataType::Integer)]
    #[case("Decimal", DataType::Decimal)]
    #[case("Currency", DataType::Decimal)]
    #[case("Boolean", DataType::Boolean)]
    #[case("DateTime", DataType::DateTime)]
    #[case("Date", DataType::Date)]
    #[case("BinaryData", DataType::Binary)]
    #[case("", DataType::Text)]
    #[case("Customer Identifier", DataType::Text)]
    #[case("??", DataType::Text)]
    fn test_map_external_type(#[case] token: &str, #[case] expected: DataType) {
        assert_eq!(map_external_type(token), expected);
    }

    #[test]
    fn test_long_integer_wins_over_integer() {
        assert_eq!(map_external_type("LONGINTEGER"), DataType::LongInteger);
        assert_ne!(map_external_type("LongInteger"), DataType::Integer);
    }

    #[test]
    fn test_text_keyword_precedes_everything_else() {
        // "TextDate" contains both keywords; text is checked first.
        assert_eq!(map_external_type("TextDate"), DataType::Text);
    }

    #[test]
    fn test_labels_of_mappable_types_round_trip() {
        for dt in DataType::ALL {
            let back = map_external_type(external_type_label(dt));
            match dt {
                DataType::Identifier | DataType::Record | DataType::List => {
                    assert_eq!(back, DataType::Text)
                }
                _ => assert_eq!(back, dt),
            }
        }
    }
}
