//! Error types for the verb conjugator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConjugatorError {
    #[error("API key is not configured")]
    NotReady,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error: {0}")]
    Service(String),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value for '{column}': {value}")]
    InvalidField { column: String, value: String },
}

/// Problems with the shape of the model's raw response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("the model returned an empty response")]
    EmptyResponse,

    #[error("the response has no '==========' separator")]
    MissingSentinel,

    #[error("expected 2 JSON segments, found {0}")]
    SegmentCount(usize),

    #[error("error decoding JSON from model response ({segment}): {message}")]
    Json { segment: Segment, message: String },

    #[error("{segment} JSON is not an array of objects")]
    NotAnArray { segment: Segment },

    #[error("{segment} JSON entry {index} is not an object")]
    NotAnObject { segment: Segment, index: usize },
}

/// Which half of the response a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Primary,
    Counterpart,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Primary => write!(f, "primary"),
            Segment::Counterpart => write!(f, "counterpart"),
        }
    }
}

impl From<reqwest::Error> for ConjugatorError {
    fn from(err: reqwest::Error) -> Self {
        ConjugatorError::Service(err.to_string())
    }
}

impl From<toml::de::Error> for ConjugatorError {
    fn from(err: toml::de::Error) -> Self {
        ConjugatorError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConjugatorError>;
