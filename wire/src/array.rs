//! FILENAME: wire/src/array.rs
//! PURPOSE: One-dimensional arrays as they travel on the wire.
//! CONTEXT: The provider flattens lists (member names, grid values, cell
//! type codes) into a single string joined by `|`. Empty fields are real
//! values (an unpopulated data cell, a blank corner cell) and must survive
//! a split, including a trailing empty field after the last separator.

/// Field separator for flattened arrays.
pub const FIELD_SEPARATOR: char = '|';

/// Joins fields with the field separator.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_SEPARATOR);
        }
        out.push_str(field.as_ref());
    }
    out
}

/// Splits a flattened array, keeping every empty field.
///
/// An empty input is an empty list; use [`split_fields_exact`] when the
/// expected count is known, since a single empty field and no fields are
/// indistinguishable on the wire.
pub fn split_fields(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(FIELD_SEPARATOR).map(str::to_string).collect()
}

/// Splits a flattened array that is known to hold `expected` fields.
/// Returns `None` when the field count differs.
pub fn split_fields_exact(text: &str, expected: usize) -> Option<Vec<String>> {
    let fields: Vec<String> = if expected == 0 && text.is_empty() {
        Vec::new()
    } else {
        text.split(FIELD_SEPARATOR).map(str::to_string).collect()
    };
    (fields.len() == expected).then_some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_trailing_empty_field() {
        assert_eq!(split_fields("a||b|"), vec!["a", "", "b", ""]);
        assert_eq!(split_fields("|"), vec!["", ""]);
        assert!(split_fields("").is_empty());
    }

    #[test]
    fn test_join_then_split() {
        let fields = vec!["", "Qtr1", ""];
        assert_eq!(join_fields(&fields), "|Qtr1|");
        assert_eq!(split_fields_exact("|Qtr1|", 3).unwrap(), fields);
    }

    #[test]
    fn test_split_exact_counts() {
        assert_eq!(split_fields_exact("", 1).unwrap(), vec![""]);
        assert_eq!(split_fields_exact("", 0).unwrap(), Vec::<String>::new());
        assert!(split_fields_exact("a|b", 3).is_none());
        assert!(split_fields_exact("a|b", 1).is_none());
    }
}
