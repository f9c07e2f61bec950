//! Classification of incoming chunks into numeric samples or console text.
//!
//! The check is a heuristic, not a protocol: any chunk containing `letters:number`
//! anywhere is treated as a sample, even when it was meant as prose. Chunks that pass the
//! heuristic but carry no parseable integer fall back to the console.

use crate::core::UNNAMED_VARIABLE;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static GRAPHABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+:-?[0-9.]+").expect("Invalid graphable regex"));

#[allow(clippy::expect_used)]
static SAMPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:([^:]+):)?\s*(-?[0-9]+)").expect("Invalid sample regex"));

/// Returns true when the chunk looks like a numeric sample.
pub fn is_graphable(text: &str) -> bool {
    GRAPHABLE.is_match(text)
}

/// Variable name and integer value pulled from a graphable chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSample {
    /// `None` only when nothing matched; an unlabeled number yields [`UNNAMED_VARIABLE`].
    pub variable: Option<String>,
    /// `None` means "do not plot".
    pub value: Option<i64>,
}

impl ParsedSample {
    /// Both parts, when the chunk can be plotted.
    pub fn plottable(&self) -> Option<(&str, i64)> {
        match (&self.variable, self.value) {
            (Some(variable), Some(value)) => Some((variable.as_str(), value)),
            _ => None,
        }
    }
}

/// Extracts `label:` and the integer that follows it.
///
/// Only the integer part of a decimal feeds the series. An integer that does not fit in an
/// `i64` counts as a parse failure.
pub fn parse_sample(text: &str) -> ParsedSample {
    let Some(caps) = SAMPLE.captures(text) else {
        return ParsedSample {
            variable: None,
            value: None,
        };
    };

    let value = caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok());
    let variable = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|label| !label.is_empty())
        .unwrap_or(UNNAMED_VARIABLE)
        .to_string();

    ParsedSample {
        variable: Some(variable),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphable_needs_lowercase_label_and_number() {
        assert!(is_graphable("temp:10"));
        assert!(is_graphable("x:-3.5\n"));
        assert!(is_graphable("reading acc:12 ok"));
        assert!(is_graphable("val:.5"));
        assert!(!is_graphable("TEMP:10"));
        assert!(is_graphable("Temp:10"));
        assert!(!is_graphable("hello\n"));
        assert!(!is_graphable("time: 10"));
        assert!(!is_graphable(":10"));
    }

    #[test]
    fn prose_with_a_colon_number_is_still_graphable() {
        assert!(is_graphable("note that the ratio was:3 to 1"));
    }

    #[test]
    fn parses_labeled_integer() {
        let parsed = parse_sample("temp:10\n");
        assert_eq!(parsed.variable.as_deref(), Some("temp"));
        assert_eq!(parsed.value, Some(10));
        assert_eq!(parsed.plottable(), Some(("temp", 10)));
    }

    #[test]
    fn ignores_fraction_and_keeps_sign() {
        let parsed = parse_sample("  x:-3.75");
        assert_eq!(parsed.variable.as_deref(), Some("x"));
        assert_eq!(parsed.value, Some(-3));
    }

    #[test]
    fn label_keeps_inner_text() {
        let parsed = parse_sample("light level:  42");
        assert_eq!(parsed.variable.as_deref(), Some("light level"));
        assert_eq!(parsed.value, Some(42));
    }

    #[test]
    fn unlabeled_number_uses_sentinel() {
        let parsed = parse_sample("17");
        assert_eq!(parsed.variable.as_deref(), Some(UNNAMED_VARIABLE));
        assert_eq!(parsed.value, Some(17));
    }

    #[test]
    fn no_integer_after_label_is_not_plottable() {
        let parsed = parse_sample("val:.5");
        assert_eq!(parsed.value, None);
        assert_eq!(parsed.variable, None);
        assert_eq!(parsed.plottable(), None);
    }

    #[test]
    fn overflowing_integer_is_not_plottable() {
        let parsed = parse_sample("big:99999999999999999999999");
        assert_eq!(parsed.variable.as_deref(), Some("big"));
        assert_eq!(parsed.value, None);
        assert_eq!(parsed.plottable(), None);
    }
}
