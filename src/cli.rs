//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "verb-conjugator")]
#[command(about = "Extract the verbs from a Russian text and show their conjugations")]
#[command(long_about = "Extract the verbs from a Russian text with a hosted language model and show \
present/future, past and imperative forms, example sentences, CEFR level and the aspectual counterpart of each verb")]
pub struct Cli {
    /// API key for the generative model
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Text to process
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Keep prompting for texts; an empty line submits
    #[arg(short, long, conflicts_with_all = ["text", "file"])]
    pub interactive: bool,

    /// Only show one summary line per verb
    #[arg(long)]
    pub collapsed: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn text_and_file_conflict() {
        let result = Cli::try_parse_from(["verb-conjugator", "--text", "Я иду.", "--file", "a.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["verb-conjugator", "-t", "Я иду.", "--api-key", "k"]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("Я иду."));
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(!cli.interactive && !cli.collapsed && !cli.no_color);
    }
}
