use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// Column prefixes produced by flattening the `form` object
pub const PRESENT_FUTURE_PREFIX: &str = "form.present/future tense.";
pub const PAST_PREFIX: &str = "form.past tense.";
pub const IMPERATIVE_PREFIX: &str = "form.imperative.";

pub const PRONOUN_KEYS: [&str; 6] = ["я", "ты", "он/она/оно", "мы", "вы", "они"];
pub const PAST_KEYS: [&str; 4] = ["masc", "fem", "neu", "pl"];
pub const IMPERATIVE_KEYS: [&str; 2] = ["sing", "pl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspect {
    Perfective,
    Imperfective,
}

impl Aspect {
    /// Heading for the pronoun table: perfective verbs have no present tense.
    pub fn conjugation_heading(&self) -> &'static str {
        match self {
            Aspect::Imperfective => "Present Tense",
            Aspect::Perfective => "Future Tense",
        }
    }
}

impl FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perfective" => Ok(Aspect::Perfective),
            "imperfective" => Ok(Aspect::Imperfective),
            other => Err(format!("unknown aspect '{}'", other)),
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Perfective => write!(f, "Perfective"),
            Aspect::Imperfective => write!(f, "Imperfective"),
        }
    }
}

/// CEFR difficulty, A1 (easiest) to C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(format!("unknown CEFR level '{}'", other)),
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        write!(f, "{}", code)
    }
}

// Present tense for imperfective verbs, simple future for perfective ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conjugation {
    pub ya: String,
    pub ty: String,
    pub on: String,
    pub my: String,
    pub vy: String,
    pub oni: String,
}

impl Conjugation {
    pub fn forms(&self) -> [&str; 6] {
        [&self.ya, &self.ty, &self.on, &self.my, &self.vy, &self.oni]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastForms {
    pub masc: String,
    pub fem: String,
    pub neu: String,
    pub pl: String,
}

impl PastForms {
    pub fn forms(&self) -> [&str; 4] {
        [&self.masc, &self.fem, &self.neu, &self.pl]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImperativeForms {
    pub sing: String,
    pub pl: String,
}

impl ImperativeForms {
    pub fn forms(&self) -> [&str; 2] {
        [&self.sing, &self.pl]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub russian: String,
    pub english: String,
}

/// One verb extracted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbRecord {
    pub verb: String,
    pub meaning: String,
    pub aspect: Aspect,
    pub counterpart: String,
    pub level: CefrLevel,
    pub present_future: Conjugation,
    pub past: PastForms,
    pub imperative: ImperativeForms,
    pub examples: Vec<ExamplePair>,
}

/// A flattened response segment: one row per verb, one column per leaf field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerbTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl VerbTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Map<String, Value>) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn columns_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.columns
            .iter()
            .filter(move |c| c.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Map<String, Value>> {
        self.rows.get(index)
    }
}
