use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use verb_conjugator::cli::Cli;
use verb_conjugator::render::ConsoleRenderer;
use verb_conjugator::{Config, ConjugatorError, VerbConjugator, process};

const QUIT_COMMAND: &str = ":quit";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?
        .with_api_key(cli.api_key.clone());
    let renderer = ConsoleRenderer::new(!cli.no_color, cli.collapsed);

    println!("{}", renderer.banner());

    let mut conjugator = match VerbConjugator::new(&config) {
        Ok(conjugator) => Some(conjugator.show_progress(true)),
        Err(ConjugatorError::NotReady) => None,
        Err(e) => return Err(e).context("failed to set up the API client"),
    };

    if cli.interactive {
        return run_interactive(conjugator.as_mut(), &renderer).await;
    }

    // Without a key the text is never read, let alone sent
    let text = if conjugator.is_some() {
        read_text(&cli).await?
    } else {
        String::new()
    };
    let outcome = process(conjugator.as_mut(), &text).await;
    print!("{}", renderer.render_outcome(&outcome));

    Ok(())
}

async fn read_text(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }

    if let Some(path) = &cli.file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read standard input")?;
    Ok(text)
}

async fn run_interactive(mut conjugator: Option<&mut VerbConjugator>, renderer: &ConsoleRenderer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n📝 Your text (empty line to process, {} to leave):", QUIT_COMMAND);

        let mut text = String::new();
        let mut finished = false;
        loop {
            match lines.next_line().await.context("failed to read standard input")? {
                Some(line) if line.trim() == QUIT_COMMAND => return Ok(()),
                Some(line) if line.trim().is_empty() => break,
                Some(line) => {
                    text.push_str(&line);
                    text.push('\n');
                }
                None => {
                    finished = true;
                    break;
                }
            }
        }

        if !text.trim().is_empty() {
            let outcome = process(conjugator.as_deref_mut(), &text).await;
            print!("{}", renderer.render_outcome(&outcome));
        }

        if finished {
            return Ok(());
        }
    }
}
