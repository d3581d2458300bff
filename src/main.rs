//! # Pinelens - Pine Script editor intelligence
//!
//! Command-line front end over [`pinelens_core::LanguageService`]. Every
//! subcommand reads a script and prints JSON on stdout; logs go to stderr.
//!
//! ## Quick Start
//!
//! ```bash
//! # Tokens of a script
//! cargo run -- lex script.pine
//!
//! # Declarations found in a script
//! cargo run -- scan script.pine
//!
//! # Completion at byte offset 120, then accept `sma`
//! cargo run -- complete script.pine --offset 120 --accept sma
//!
//! # Parameter info at the end of stdin
//! echo 'plot(ta.sma(close, ' | cargo run -- signature -
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pinelens_buffer::{Position, SourceText, TextBuffer};
use pinelens_core::{Config, LanguageService};
use pinelens_syntax::tables::is_ident_char;

/// Pinelens - completion and parameter info for Pine Script
#[derive(Parser, Debug)]
#[command(name = "pinelens")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (ignored when RUST_LOG is set)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token stream
    Lex {
        /// Script to read, `-` for stdin
        file: PathBuf,

        /// Start of the byte range to lex
        #[arg(long)]
        start: Option<usize>,

        /// End of the byte range to lex
        #[arg(long)]
        end: Option<usize>,
    },

    /// Print the declarations found in a script
    Scan {
        /// Script to read, `-` for stdin
        file: PathBuf,
    },

    /// Print the completion list at a cursor
    Complete {
        /// Script to read, `-` for stdin
        file: PathBuf,

        /// Cursor byte offset (defaults to the end of the script)
        #[arg(short, long, conflicts_with = "at")]
        offset: Option<usize>,

        /// Cursor as 1-based `LINE:COLUMN`
        #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
        at: Option<Position>,

        /// Language tag of the document
        #[arg(short, long, default_value = "pine")]
        language: String,

        /// Accept the suggestion with this label and print the edited text
        #[arg(long, value_name = "LABEL")]
        accept: Option<String>,
    },

    /// Print parameter info at a cursor
    Signature {
        /// Script to read, `-` for stdin
        file: PathBuf,

        /// Cursor byte offset (defaults to the end of the script)
        #[arg(short, long, conflicts_with = "at")]
        offset: Option<usize>,

        /// Cursor as 1-based `LINE:COLUMN`
        #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
        at: Option<Position>,
    },
}

/// Text and caret after accepting a suggestion.
#[derive(Debug, Serialize)]
struct Accepted {
    text: String,
    caret: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    let service = LanguageService::new(&config);
    tracing::info!("Starting Pinelens v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Lex { file, start, end } => {
            let text = read_source(&file)?;
            let range = start.unwrap_or(0)..end.unwrap_or(text.len());
            let source = SourceText::new(&text);
            let tokens: Vec<_> = service
                .lex_range(&text, range)
                .into_iter()
                .map(|t| {
                    serde_json::json!({
                        "kind": t.kind,
                        "start": t.start,
                        "end": t.end,
                        "position": source.position(t.start).ok().map(|p| p.to_string()),
                        "text": t.text(&text),
                    })
                })
                .collect();
            print_json(&tokens)
        }
        Command::Scan { file } => {
            let text = read_source(&file)?;
            print_json(&service.scan(&text))
        }
        Command::Complete {
            file,
            offset,
            at,
            language,
            accept,
        } => {
            let text = read_source(&file)?;
            let offset = cursor_offset(&text, offset, at)?;
            let suggestions = service.complete(&text, offset, &language);
            match accept {
                None => print_json(&suggestions),
                Some(label) => {
                    let suggestion = suggestions
                        .iter()
                        .find(|s| s.label == label)
                        .with_context(|| format!("No suggestion labelled '{}'", label))?;
                    print_json(&accept_suggestion(
                        &service,
                        &text,
                        offset,
                        &suggestion.label,
                        suggestion.insert,
                    )?)
                }
            }
        }
        Command::Signature { file, offset, at } => {
            let text = read_source(&file)?;
            let offset = cursor_offset(&text, offset, at)?;
            print_json(&service.signature(&text, offset))
        }
    }
}

fn init_logging(verbose: u8) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(EnvFilter::from_default_env())
            .init();
        return;
    }

    let log_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parses a 1-based `LINE:COLUMN` pair.
fn parse_position(value: &str) -> Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{}'", value))?;
    let parse = |part: &str| match part.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("'{}' is not a positive number", part)),
    };
    Ok(Position::new(parse(line)?, parse(column)?))
}

/// Picks the cursor: an explicit offset, a position, or the end of the text.
fn cursor_offset(text: &str, offset: Option<usize>, at: Option<Position>) -> anyhow::Result<usize> {
    match (offset, at) {
        (Some(offset), _) => Ok(offset),
        (None, Some(position)) => SourceText::new(text)
            .offset_at(position)
            .with_context(|| format!("Position {} is not inside the script", position)),
        (None, None) => Ok(text.len()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Replaces the word before the cursor with `label`, then runs the
/// suggestion's insertion side-effect.
fn accept_suggestion(
    service: &LanguageService,
    text: &str,
    offset: usize,
    label: &str,
    insert: pinelens_assist::InsertBehavior,
) -> anyhow::Result<Accepted> {
    let before = text
        .get(..offset)
        .with_context(|| format!("Offset {} is not inside the script", offset))?;
    let word_start = before
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_ident_char(c))
        .last()
        .map_or(offset, |(i, _)| i);

    let edited = format!("{}{}{}", &text[..word_start], label, &text[offset..]);
    let tail = word_start + label.len();
    let edit = service
        .accept(&edited, tail, insert)
        .context("Could not plan the insertion")?;

    let mut buffer = TextBuffer::from(edited);
    edit.apply(&mut buffer)?;
    Ok(Accepted {
        text: buffer.text(),
        caret: buffer.caret(),
    })
}
