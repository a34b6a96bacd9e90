//! Turns the model's raw text into two flattened verb tables

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{FormatError, Segment};
use crate::models::VerbTable;
use crate::prompts::SENTINEL;

/// Both tables of one response plus every problem met while reading it.
///
/// A segment that cannot be read leaves its table empty; the other segment is
/// still used.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedResponse {
    pub primary: VerbTable,
    pub counterpart: VerbTable,
    pub problems: Vec<FormatError>,
}

impl ParsedResponse {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Pairs every primary row with a counterpart row.
    ///
    /// A counterpart row whose `verb` matches the primary row's `counterpart`
    /// wins; otherwise the row at the same position is used when it exists and
    /// no other primary row has matched it.
    pub fn pairs(&self) -> Vec<(usize, Option<usize>)> {
        let matched: Vec<Option<usize>> = (0..self.primary.len())
            .map(|i| {
                let wanted = self
                    .primary
                    .row(i)
                    .and_then(|row| row.get("counterpart"))
                    .and_then(Value::as_str)
                    .map(normalize_verb)?;

                self.counterpart.rows().iter().position(|row| {
                    row.get("verb")
                        .and_then(Value::as_str)
                        .is_some_and(|verb| normalize_verb(verb) == wanted)
                })
            })
            .collect();
        let claimed: HashSet<usize> = matched.iter().flatten().copied().collect();

        matched
            .into_iter()
            .enumerate()
            .map(|(i, matched)| {
                let positional = (i < self.counterpart.len() && !claimed.contains(&i)).then_some(i);
                (i, matched.or(positional))
            })
            .collect()
    }
}

pub fn parse_response(raw: &str) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();

    if raw.trim().is_empty() {
        parsed.problems.push(FormatError::EmptyResponse);
        return parsed;
    }

    let segments = split_segments(raw);
    match segments.len() {
        1 => {
            parsed.problems.push(FormatError::MissingSentinel);
            return parsed;
        }
        2 => {}
        n => {
            parsed.problems.push(FormatError::SegmentCount(n));
            return parsed;
        }
    }

    match parse_segment(segments[0], Segment::Primary) {
        Ok(table) => parsed.primary = table,
        Err(e) => parsed.problems.push(e),
    }
    match parse_segment(segments[1], Segment::Counterpart) {
        Ok(table) => parsed.counterpart = table,
        Err(e) => parsed.problems.push(e),
    }

    parsed
}

fn separator_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?m)^[ \t]*{}=*[ \t]*\r?$", SENTINEL)).expect("valid separator pattern")
    })
}

/// Splits on separator lines of ten or more `=`; falls back to the bare
/// substring when the separator is not on a line of its own.
fn split_segments(raw: &str) -> Vec<&str> {
    let segments: Vec<&str> = if separator_line().is_match(raw) {
        separator_line().split(raw).collect()
    } else {
        raw.split(SENTINEL).collect()
    };

    // an inline separator longer than ten leaves `=` on the segment edges
    segments
        .into_iter()
        .map(|segment| segment.trim().trim_matches('='))
        .collect()
}

/// Removes a ```json (or bare ```) opener and a ``` closer, if present.
pub fn strip_code_fence(segment: &str) -> &str {
    let mut text = segment.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    text = text.trim();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

pub fn parse_segment(segment: &str, which: Segment) -> Result<VerbTable, FormatError> {
    let text = strip_code_fence(segment);
    let value: Value = serde_json::from_str(text).map_err(|e| FormatError::Json {
        segment: which,
        message: e.to_string(),
    })?;

    let items = match value {
        Value::Array(items) => items,
        // A lone object is read as a one-row table
        Value::Object(object) => vec![Value::Object(object)],
        _ => return Err(FormatError::NotAnArray { segment: which }),
    };

    let mut table = VerbTable::new();
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(object) => table.push_row(flatten(&object)),
            _ => return Err(FormatError::NotAnObject { segment: which, index }),
        }
    }

    Ok(table)
}

/// Flattens nested objects into dotted keys. Arrays stay as leaf values.
pub fn flatten(object: &Map<String, Value>) -> Map<String, Value> {
    let mut row = Map::new();
    flatten_into(&mut row, "", object);
    row
}

fn flatten_into(row: &mut Map<String, Value>, prefix: &str, object: &Map<String, Value>) {
    for (key, value) in object {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(row, &column, nested),
            _ => {
                row.insert(column, value.clone());
            }
        }
    }
}

// Case and stress marks are ignored when matching verbs
fn normalize_verb(verb: &str) -> String {
    verb.trim()
        .chars()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(verb: &str, counterpart: &str) -> Value {
        json!({"verb": verb, "counterpart": counterpart, "form": {"imperative": {"sing": "x", "pl": "y"}}})
    }

    fn response(primary: &Value, counterpart: &Value) -> String {
        format!("```json\n{}\n```\n{}\n```json\n{}\n```", primary, SENTINEL, counterpart)
    }

    #[test]
    fn row_counts_follow_array_lengths() {
        let primary = json!([row("чита́ть", "прочита́ть"), row("идти́", "пойти́")]);
        let counterpart = json!([row("прочита́ть", "чита́ть")]);

        let parsed = parse_response(&response(&primary, &counterpart));
        assert!(parsed.is_clean());
        assert_eq!(parsed.primary.len(), 2);
        assert_eq!(parsed.counterpart.len(), 1);
    }

    #[test]
    fn empty_response_short_circuits() {
        for raw in ["", "   \n"] {
            let parsed = parse_response(raw);
            assert!(parsed.primary.is_empty());
            assert!(parsed.counterpart.is_empty());
            assert_eq!(parsed.problems, vec![FormatError::EmptyResponse]);
        }
    }

    #[test]
    fn longer_separator_lines_still_split() {
        let primary = json!([row("a", "b")]);
        let counterpart = json!([row("b", "a")]);
        for separator in ["===========", "====================", "  ==========  "] {
            let raw = format!("{}\n{}\n{}", primary, separator, counterpart);
            let parsed = parse_response(&raw);
            assert!(parsed.is_clean(), "{:?} with {:?}", parsed.problems, separator);
            assert_eq!(parsed.primary.len(), 1);
            assert_eq!(parsed.counterpart.len(), 1);
        }
    }

    #[test]
    fn inline_separator_leaves_no_stray_equals() {
        let raw = format!("{}============={}", json!([row("a", "b")]), json!([row("b", "a")]));
        let parsed = parse_response(&raw);
        assert!(parsed.is_clean(), "{:?}", parsed.problems);
        assert_eq!(parsed.counterpart.len(), 1);
    }

    #[test]
    fn missing_sentinel_is_reported() {
        let parsed = parse_response("[{\"verb\": \"a\"}]");
        assert!(parsed.primary.is_empty());
        assert!(parsed.counterpart.is_empty());
        assert_eq!(parsed.problems, vec![FormatError::MissingSentinel]);
    }

    #[test]
    fn extra_sentinel_is_reported() {
        let raw = format!("[]\n{0}\n[]\n{0}\n[]", SENTINEL);
        let parsed = parse_response(&raw);
        assert_eq!(parsed.problems, vec![FormatError::SegmentCount(3)]);
    }

    #[test]
    fn bad_json_only_empties_its_own_segment() {
        let raw = format!("[{{\"verb\": }}]\n{}\n[{}]", SENTINEL, row("a", "b"));
        let parsed = parse_response(&raw);

        assert!(parsed.primary.is_empty());
        assert_eq!(parsed.counterpart.len(), 1);
        assert!(matches!(
            parsed.problems.as_slice(),
            [FormatError::Json { segment: Segment::Primary, .. }]
        ));
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        let bare = "[{\"verb\": \"a\"}]";
        let fenced = format!("```json\n{}\n```", bare);

        assert_eq!(strip_code_fence(&fenced), bare);
        assert_eq!(strip_code_fence(bare), bare);
        assert_eq!(strip_code_fence(strip_code_fence(&fenced)), bare);
        assert_eq!(
            parse_segment(&fenced, Segment::Primary).unwrap(),
            parse_segment(bare, Segment::Primary).unwrap()
        );
    }

    #[test]
    fn non_array_payloads_are_rejected() {
        assert_eq!(
            parse_segment("42", Segment::Counterpart),
            Err(FormatError::NotAnArray { segment: Segment::Counterpart })
        );
        assert_eq!(
            parse_segment("[{\"verb\": \"a\"}, 3]", Segment::Primary),
            Err(FormatError::NotAnObject { segment: Segment::Primary, index: 1 })
        );
        assert_eq!(parse_segment("{\"verb\": \"a\"}", Segment::Primary).unwrap().len(), 1);
    }

    #[test]
    fn flatten_uses_dotted_paths() {
        let object = json!({
            "verb": "a",
            "form": {"past tense": {"masc": "m"}, "imperative": {"sing": "s"}},
            "examples": [["r"], ["e"]]
        });
        let flat = flatten(object.as_object().unwrap());

        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, ["verb", "form.past tense.masc", "form.imperative.sing", "examples"]);
        assert!(flat["examples"].is_array());
    }

    #[test]
    fn pairs_prefer_matching_counterpart() {
        let primary = json!([row("чита́ть", "прочита́ть"), row("идти́", "пойти́")]);
        let counterpart = json!([row("пойти", "идти́"), row("Прочита́ть", "чита́ть")]);

        let parsed = parse_response(&response(&primary, &counterpart));
        assert_eq!(parsed.pairs(), vec![(0, Some(1)), (1, Some(0))]);
    }

    #[test]
    fn pairs_fall_back_to_position() {
        let primary = json!([row("a", "x"), row("b", "y")]);
        let counterpart = json!([row("c", "a")]);

        let parsed = parse_response(&response(&primary, &counterpart));
        assert_eq!(parsed.pairs(), vec![(0, Some(0)), (1, None)]);
    }

    #[test]
    fn position_fallback_skips_rows_matched_elsewhere() {
        let primary = json!([row("a", "x"), row("b", "y")]);
        let counterpart = json!([row("y", "b"), row("z", "c")]);

        let parsed = parse_response(&response(&primary, &counterpart));
        assert_eq!(parsed.pairs(), vec![(0, None), (1, Some(0))]);
    }
}
