//! Builds displayable verb sections out of the flattened tables

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::error::{ConjugatorError, Result};
use crate::models::*;
use crate::parser::ParsedResponse;

/// One collapsible unit: a verb from the text and, when found, its counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct VerbSection {
    pub primary: VerbRecord,
    pub counterpart: Option<VerbRecord>,
}

impl VerbSection {
    /// `**Verb** -- meaning -- Aspect`, the line shown while collapsed.
    pub fn summary(&self) -> String {
        format!(
            "**{}** -- {} -- {}",
            capitalize(&self.primary.verb),
            capitalize(&display_gloss(&self.primary.meaning)),
            self.primary.aspect
        )
    }
}

/// Reads every primary row into a section.
///
/// A primary row with a missing or malformed column fails the whole view. A bad
/// counterpart row only drops that counterpart panel.
pub fn build_sections(parsed: &ParsedResponse) -> Result<Vec<VerbSection>> {
    let mut sections = Vec::with_capacity(parsed.primary.len());

    for (primary_index, counterpart_index) in parsed.pairs() {
        let row = parsed
            .primary
            .row(primary_index)
            .ok_or_else(|| ConjugatorError::MissingColumn(format!("row {}", primary_index)))?;
        let primary = record_from_row(row)?;

        let counterpart = match counterpart_index.and_then(|i| parsed.counterpart.row(i)) {
            Some(row) => match record_from_row(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping counterpart of {}: {}", primary.verb, e);
                    None
                }
            },
            None => None,
        };

        sections.push(VerbSection { primary, counterpart });
    }

    Ok(sections)
}

pub fn record_from_row(row: &Map<String, Value>) -> Result<VerbRecord> {
    let aspect_text = text(row, "aspect")?;
    let aspect = aspect_text.parse().map_err(|_| ConjugatorError::InvalidField {
        column: "aspect".to_string(),
        value: aspect_text.clone(),
    })?;
    let level_text = text(row, "level")?;
    let level = level_text.parse().map_err(|_| ConjugatorError::InvalidField {
        column: "level".to_string(),
        value: level_text.clone(),
    })?;

    let present = |key: &str| text(row, &format!("{}{}", PRESENT_FUTURE_PREFIX, key));
    let past = |key: &str| text(row, &format!("{}{}", PAST_PREFIX, key));
    let imperative = |key: &str| text(row, &format!("{}{}", IMPERATIVE_PREFIX, key));

    Ok(VerbRecord {
        verb: text(row, "verb")?,
        meaning: text(row, "meaning")?,
        aspect,
        counterpart: text(row, "counterpart")?,
        level,
        present_future: Conjugation {
            ya: present(PRONOUN_KEYS[0])?,
            ty: present(PRONOUN_KEYS[1])?,
            on: present(PRONOUN_KEYS[2])?,
            my: present(PRONOUN_KEYS[3])?,
            vy: present(PRONOUN_KEYS[4])?,
            oni: present(PRONOUN_KEYS[5])?,
        },
        past: PastForms {
            masc: past(PAST_KEYS[0])?,
            fem: past(PAST_KEYS[1])?,
            neu: past(PAST_KEYS[2])?,
            pl: past(PAST_KEYS[3])?,
        },
        imperative: ImperativeForms {
            sing: imperative(IMPERATIVE_KEYS[0])?,
            pl: imperative(IMPERATIVE_KEYS[1])?,
        },
        examples: examples(row)?,
    })
}

fn text(row: &Map<String, Value>, column: &str) -> Result<String> {
    match row.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ConjugatorError::InvalidField {
            column: column.to_string(),
            value: other.to_string(),
        }),
        None => Err(ConjugatorError::MissingColumn(column.to_string())),
    }
}

// [[russian...], [english...]], zipped by index
fn examples(row: &Map<String, Value>) -> Result<Vec<ExamplePair>> {
    let invalid = |value: &Value| ConjugatorError::InvalidField {
        column: "examples".to_string(),
        value: value.to_string(),
    };

    let value = row
        .get("examples")
        .ok_or_else(|| ConjugatorError::MissingColumn("examples".to_string()))?;
    let lists = match value.as_array() {
        Some(lists) if lists.len() == 2 => lists,
        _ => return Err(invalid(value)),
    };

    let strings = |list: &Value| -> Option<Vec<String>> {
        list.as_array()?
            .iter()
            .map(|s| s.as_str().map(str::to_string))
            .collect()
    };
    let russian = strings(&lists[0]).ok_or_else(|| invalid(value))?;
    let english = strings(&lists[1]).ok_or_else(|| invalid(value))?;

    Ok(russian
        .into_iter()
        .zip(english)
        .map(|(russian, english)| ExamplePair { russian, english })
        .collect())
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn parenthetical() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthetical pattern"))
}

/// Drops qualifiers such as "(perfective)" from an English gloss.
pub fn display_gloss(meaning: &str) -> String {
    if !meaning.contains('(') {
        return meaning.trim().to_string();
    }
    parenthetical().replace_all(meaning, "").trim().to_string()
}
