use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::{ApiClient, TextGenerator};
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::{ConjugatorError, Result};
use crate::parser::{ParsedResponse, parse_response};
use crate::prompts::{build_prompt, validate_input};
use crate::view::{VerbSection, build_sections};

pub const NOT_READY_MESSAGE: &str = "Please enter your API Key to begin.";

/// Result of one submission: the parsed tables and where the raw text came from.
#[derive(Debug, Clone)]
pub struct Submission {
    pub parsed: ParsedResponse,
    pub from_cache: bool,
}

impl Submission {
    pub fn sections(&self) -> Result<Vec<VerbSection>> {
        build_sections(&self.parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// What the user gets to see for one submission.
///
/// `sections` is `None` when there is nothing to show, which renders as the
/// placeholder message.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    pub sections: Option<Vec<VerbSection>>,
}

pub struct VerbConjugator {
    generator: Box<dyn TextGenerator>,
    cache: ResponseCache,
    max_chars: usize,
    show_progress: bool,
}

impl VerbConjugator {
    /// Fails with `NotReady` when the config has no API key.
    pub fn new(config: &Config) -> Result<Self> {
        let api_client = ApiClient::new(config)?;
        Ok(Self::with_generator(Box::new(api_client), config))
    }

    pub fn with_generator(generator: Box<dyn TextGenerator>, config: &Config) -> Self {
        VerbConjugator {
            generator,
            cache: ResponseCache::new(config.cache.max_entries),
            max_chars: config.input.max_chars,
            show_progress: false,
        }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Builds the prompt, asks the model (or the cache) and parses the answer.
    ///
    /// Service failures end the submission with an error. Format problems do
    /// not: they are listed in the parsed response next to whatever could be read.
    pub async fn submit(&mut self, text: &str) -> Result<Submission> {
        let text = validate_input(text, self.max_chars)?;
        let prompt = build_prompt(text);
        log::debug!("Built prompt of {} characters", prompt.chars().count());

        let (raw, from_cache) = match self.cache.get(&prompt) {
            Some(raw) => {
                log::debug!("Using cached response");
                (raw.to_string(), true)
            }
            None => {
                let raw = self.call_model(&prompt).await?;
                self.cache.insert(prompt, raw.clone());
                (raw, false)
            }
        };

        let parsed = parse_response(&raw);
        for problem in &parsed.problems {
            log::warn!("{}", problem);
        }
        log::info!(
            "Parsed {} verbs and {} counterparts",
            parsed.primary.len(),
            parsed.counterpart.len()
        );

        Ok(Submission { parsed, from_cache })
    }

    async fn call_model(&self, prompt: &str) -> Result<String> {
        let spinner = if self.show_progress {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message("Processing your text...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };

        let result = self.generator.generate(prompt).await;
        spinner.finish_and_clear();

        match result {
            Ok(raw) => {
                log::info!("Model returned {} characters", raw.chars().count());
                Ok(raw)
            }
            Err(e) => {
                log::error!("API request failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Runs one submission end to end and decides what to show.
///
/// `None` stands for a conjugator that could not be built for lack of a key;
/// the model is never called in that case.
pub async fn process(conjugator: Option<&mut VerbConjugator>, text: &str) -> Outcome {
    let mut outcome = Outcome::default();

    let Some(conjugator) = conjugator else {
        outcome.notices.push(Notice::Warning(NOT_READY_MESSAGE.to_string()));
        return outcome;
    };

    let submission = match conjugator.submit(text).await {
        Ok(submission) => submission,
        Err(e @ ConjugatorError::InvalidInput(_)) => {
            outcome.notices.push(Notice::Warning(e.to_string()));
            return outcome;
        }
        Err(e) => {
            outcome.notices.push(Notice::Error(e.to_string()));
            return outcome;
        }
    };

    for problem in &submission.parsed.problems {
        outcome.notices.push(Notice::Error(problem.to_string()));
    }

    match submission.sections() {
        Ok(sections) if !sections.is_empty() => outcome.sections = Some(sections),
        Ok(_) => {}
        Err(e) => {
            log::warn!("Nothing to show: {}", e);
            outcome.notices.push(Notice::Warning(format!("The verbs could not be shown: {}", e)));
        }
    }

    outcome
}
