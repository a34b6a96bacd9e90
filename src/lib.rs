pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod conjugator;
pub mod error;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod render;
pub mod view;

pub use config::Config;
pub use conjugator::{Notice, Outcome, VerbConjugator, process};
pub use error::{ConjugatorError, FormatError, Result};
pub use models::*;
