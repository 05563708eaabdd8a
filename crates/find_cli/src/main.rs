//! find_cli - search and replace in a plain-text or HTML document from the terminal
//!
//! Set `RUST_LOG=edit_engine=debug` to see match counts and replacements.

mod input;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use edit_engine::{EditingEngine, SearchSession, SearchSettings, SettingsManager};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "find_cli", version, about = "Case-insensitive search and replace for Chinese text")]
struct Cli {
    /// JSON file with search settings
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every match of a query
    Find {
        file: PathBuf,
        query: String,
        /// Print the highlighted document as HTML instead of a match list
        #[arg(long)]
        html: bool,
    },
    /// Replace matches of a query
    Replace {
        file: PathBuf,
        query: String,
        replacement: String,
        /// Only replace the match reached after moving forward this many times
        #[arg(long)]
        current: Option<usize>,
        /// Print the result as HTML
        #[arg(long)]
        html: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Find { file, query, html } => find(&file, &query, html, settings),
        Command::Replace {
            file,
            query,
            replacement,
            current,
            html,
        } => replace(&file, &query, &replacement, current, html, settings),
    }
}

fn load_settings(path: Option<&Path>) -> Result<SearchSettings> {
    let Some(path) = path else {
        return Ok(SearchSettings::default());
    };
    let mut manager = SettingsManager::with_path(path);
    let settings = manager
        .load_sync()
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    Ok(settings.clone())
}

fn open(file: &Path, settings: &SearchSettings) -> Result<EditingEngine> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    tracing::info!("Loaded {}", file.display());
    let tree = input::load_document(file, &text)?;
    Ok(EditingEngine::with_tree(tree).with_undo_limit(settings.undo_limit))
}

fn find(file: &Path, query: &str, html: bool, settings: SearchSettings) -> Result<()> {
    let mut engine = open(file, &settings)?;
    let mut session = SearchSession::new(settings);
    session.search(&mut engine, query)?;

    if html {
        println!("{}", engine.tree().to_html());
        return Ok(());
    }

    for m in session.navigator().matches() {
        println!("{}\t{}\t{}", m.from, m.to, m.text);
    }
    println!("{}", session.label());
    Ok(())
}

fn replace(
    file: &Path,
    query: &str,
    replacement: &str,
    current: Option<usize>,
    html: bool,
    settings: SearchSettings,
) -> Result<()> {
    if replacement.trim().is_empty() {
        bail!("Replacement text must not be blank");
    }

    let mut engine = open(file, &settings)?;
    let mut session = SearchSession::new(settings);
    session.search(&mut engine, query)?;

    match current {
        Some(steps) => {
            for _ in 0..steps {
                session.next(&mut engine)?;
            }
            if !session.replace_current(&mut engine, replacement)? {
                eprintln!("No match for {:?}", query);
            }
        }
        None => {
            let replaced = session.replace_all(&mut engine, replacement)?;
            eprintln!("Replaced {} occurrences", replaced);
        }
    }

    if html {
        println!("{}", engine.tree().to_html());
    } else {
        println!("{}", engine.tree().text_content());
    }
    Ok(())
}
