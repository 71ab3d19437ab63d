//! Search and interactive mode.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use scmd_config::ConfigLoader;
use scmd_core::{ReviewDecision, SearchOutcome};

use crate::app::App;
use crate::cli::OutputFormat;
use crate::cmd_catalog::{
    handle_add, handle_count, handle_delete, handle_import, handle_list, handle_show,
};
use crate::cmd_embed::{handle_embed, handle_stats, handle_status};
use crate::render::Renderer;

const REVIEW_PROMPT: &str = "Good Answer [1], Regenerate [2], anything else to skip";

/// One-shot search.
pub(crate) async fn handle_search(
    app: &App,
    query: &str,
    no_ai: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = app.search.search(query, !no_ai).await?;

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            let body = json!({
                "query": query,
                "records": outcome.records,
                "answer": outcome.answer,
                "tokens": outcome.tokens,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
        OutputFormat::Text => Renderer::new().outcome(&mut out, query, &outcome)?,
    }
    Ok(())
}

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Empty,
    Exit,
    Help,
    Review(ReviewDecision),
    Search(String),
    Add { key: String, data: String },
    Import(PathBuf),
    Show(i64),
    Delete(i64),
    InvalidId(String),
    List,
    Count,
    Status { refresh: bool },
    Stats,
    Generate,
    Usage(&'static str),
    Unknown(String),
}

/// Parse a prompt line. `1` and `2` only count as a review while an answer
/// is waiting for one.
pub(crate) fn parse_line(line: &str, awaiting_review: bool) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if awaiting_review && (line == "1" || line == "2") {
        return Input::Review(ReviewDecision::from_choice(line));
    }

    match line {
        "exit" | "quit" | "q" => return Input::Exit,
        "help" | "?" => return Input::Help,
        _ => {}
    }
    if !line.starts_with('/') {
        return Input::Search(line.to_string());
    }

    let (command, args) = match line.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (line, ""),
    };
    match command {
        "/exit" | "/quit" | "/q" => Input::Exit,
        "/help" | "/?" => Input::Help,
        "/search" if args.is_empty() => Input::Usage("/search <pattern>"),
        "/search" => Input::Search(args.to_string()),
        "/add" => match args.split_once('|') {
            Some((key, data)) if !key.trim().is_empty() && !data.trim().is_empty() => Input::Add {
                key: key.trim().to_string(),
                data: data.trim().to_string(),
            },
            _ => Input::Usage("/add <command> | <description>"),
        },
        "/import" if args.is_empty() => Input::Usage("/import <path>"),
        "/import" => Input::Import(PathBuf::from(args)),
        "/show" if args.is_empty() => Input::Usage("/show <id>"),
        "/show" => parse_id(args).map_or_else(Input::InvalidId, Input::Show),
        "/delete" if args.is_empty() => Input::Usage("/delete <id>"),
        "/delete" => parse_id(args).map_or_else(Input::InvalidId, Input::Delete),
        "/list" => Input::List,
        "/count" => Input::Count,
        "/ai" => Input::Status {
            refresh: args == "refresh",
        },
        "/embeddings" => Input::Stats,
        "/generate" => Input::Generate,
        other => Input::Unknown(other.to_string()),
    }
}

fn parse_id(arg: &str) -> Result<i64, String> {
    arg.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| arg.to_string())
}

/// `y` or `yes`, case-insensitive.
pub(crate) fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// The answer waiting for a review.
struct Pending {
    query: String,
    answer: String,
}

/// Read-eval loop on stdin.
pub(crate) async fn handle_interactive(app: &App, no_ai: bool) -> Result<(), Box<dyn std::error::Error>> {
    print_welcome(app, no_ai);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<Pending> = None;

    loop {
        print!("scmd> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let input = parse_line(&line, pending.is_some());
        if !matches!(input, Input::Review(_) | Input::Empty) {
            pending = None;
        }

        let result: Result<(), Box<dyn std::error::Error>> = match input {
            Input::Empty => Ok(()),
            Input::Exit => break,
            Input::Help => {
                print_help();
                Ok(())
            }
            Input::Review(decision) => match pending.take() {
                Some(current) => review(app, decision, current).await.map(|next| pending = next),
                None => Ok(()),
            },
            Input::Search(query) => run_search(app, &query, !no_ai).await.map(|next| pending = next),
            Input::Add { key, data } => handle_add(app, &key, &data).await,
            Input::Import(path) => {
                let path = ConfigLoader::expand_path(&path.to_string_lossy());
                handle_import(app, &path).await
            }
            Input::Show(id) => handle_show(app, id).await,
            Input::Delete(id) => match handle_show(app, id).await {
                Ok(()) => {
                    print!("Delete command {}? (y/n): ", id);
                    std::io::stdout().flush()?;
                    let answer = lines.next_line().await?.unwrap_or_default();
                    if is_confirmation(&answer) {
                        handle_delete(app, id).await
                    } else {
                        println!("Cancelled.");
                        Ok(())
                    }
                }
                Err(e) => Err(e),
            },
            Input::InvalidId(arg) => {
                println!("Invalid id '{}': expected a positive number", arg);
                Ok(())
            }
            Input::List => handle_list(app, 10, OutputFormat::Text).await,
            Input::Count => handle_count(app).await,
            Input::Status { refresh } => handle_status(app, refresh).await,
            Input::Stats => handle_stats(app).await,
            Input::Generate => handle_embed(app).await,
            Input::Usage(usage) => {
                println!("Usage: {}", usage);
                Ok(())
            }
            Input::Unknown(command) => {
                println!("Unknown command: {}", command);
                println!("Type '/help' for available commands");
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Interactive command failed: {}", e);
            println!("Error: {}", e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn run_search(
    app: &App,
    query: &str,
    use_ai: bool,
) -> Result<Option<Pending>, Box<dyn std::error::Error>> {
    let outcome = app.search.search(query, use_ai).await?;
    show(query, &outcome)?;
    Ok(awaiting_review(query, outcome))
}

async fn review(
    app: &App,
    decision: ReviewDecision,
    current: Pending,
) -> Result<Option<Pending>, Box<dyn std::error::Error>> {
    match decision {
        ReviewDecision::Approve => {
            let id = app.feedback().approve(&current.query, &current.answer).await?;
            println!("✓ Response saved to database as command {}", id);
            Ok(None)
        }
        ReviewDecision::Regenerate => {
            println!("Regenerating response...");
            let outcome = app.feedback().reject(&current.query).await?;
            if !outcome.has_answer() {
                println!("Failed to regenerate response.");
                return Ok(None);
            }
            show(&current.query, &outcome)?;
            Ok(awaiting_review(&current.query, outcome))
        }
        ReviewDecision::Skip => Ok(None),
    }
}

fn show(query: &str, outcome: &SearchOutcome) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    Renderer::new().outcome(&mut out, query, outcome)?;
    if outcome.has_answer() {
        writeln!(out, "{}", REVIEW_PROMPT)?;
    }
    Ok(())
}

fn awaiting_review(query: &str, outcome: SearchOutcome) -> Option<Pending> {
    outcome.has_answer().then(|| Pending {
        query: query.to_string(),
        answer: outcome.answer,
    })
}

fn print_welcome(app: &App, no_ai: bool) {
    println!();
    println!("scmd interactive mode ({})", env!("CARGO_PKG_VERSION"));
    let available = app.registry.available();
    if no_ai {
        println!("AI disabled (keyword search only)");
    } else if available.is_empty() {
        println!("⚠️  No AI provider available (keyword search only)");
    } else {
        for provider in available {
            println!("🤖 {}: active ({})", provider.kind(), provider.model());
        }
    }
    println!();
    println!("Type '/help' for available commands, '/exit' to quit");
    println!("  Space-separated = AND: postgresql replication slave");
    println!("  Comma-separated = OR:  docker,kubernetes,postgresql");
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  <query>                  Search (natural language works too)");
    println!("  /search <pattern>        Search for commands matching pattern");
    println!("  /add <cmd> | <desc>      Add a new command");
    println!("  /import <path>           Import a Markdown document");
    println!("  /show <id>               Show one command");
    println!("  /delete <id>             Delete a command (asks for confirmation)");
    println!("  /list                    List recent commands");
    println!("  /count                   Show total number of commands");
    println!("  /ai [refresh]            Show provider status, re-probing with refresh");
    println!("  /embeddings              Show embedding coverage");
    println!("  /generate                Generate missing embeddings");
    println!("  /exit, /quit, /q         Quit");
    println!();
    println!("After an AI answer:");
    println!("  1  save the answer for future searches");
    println!("  2  ask for a new answer");
    println!();
}

#[cfg(test)]
#[path = "cmd_search_tests.rs"]
mod tests;
