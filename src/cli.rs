// src/cli.rs
use std::error::Error;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::config::WatchOptions;
use crate::core::{Fetch, HttpFetch};
use crate::page::{Document, MemoryDocument, RequestToken, Watcher};
use crate::protocol::{Message, ScoreResult};
use crate::scrape::resolve_score;

#[derive(Debug, Parser)]
#[command(name = "cli", version, about = "Filmarks score lookup for U-NEXT titles")]
pub struct Cli {
    /// Print machine-readable JSON instead of a summary line
    #[arg(long, global = true)]
    pub json: bool,

    /// Echo log lines to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one title on Filmarks
    Lookup {
        #[arg(short, long)]
        title: String,
    },
    /// Run one watch cycle against a page described on the command line
    Page {
        #[arg(long)]
        url: String,
        #[arg(long = "doc-title")]
        doc_title: String,
        /// Heading text present on the page (repeatable)
        #[arg(long = "heading")]
        headings: Vec<String>,
        /// Show first-card guesses as "no score"
        #[arg(long)]
        hide_fallback: bool,
    },
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let fetcher = HttpFetch::default();
    match cli.command {
        Command::Lookup { title } => {
            let result = resolve_score(&fetcher, &title);
            print_result(&result, cli.json)?;
        }
        Command::Page { url, doc_title, headings, hide_fallback } => {
            let options = WatchOptions { hide_fallback, ..WatchOptions::default() };
            let markup = run_page_cycle(&fetcher, &url, &doc_title, &headings, options);
            match markup {
                Some(html) if cli.json => println!("{}", serde_json::json!({ "badge": html })),
                Some(html) => println!("{html}"),
                None if cli.json => println!("{}", serde_json::json!({ "badge": null })),
                None => println!("(no badge)"),
            }
        }
    }
    Ok(())
}

/// One check plus its replies, resolved inline. Returns the badge markup
/// left in the page, if any.
pub fn run_page_cycle<F: Fetch>(
    fetcher: &F,
    url: &str,
    doc_title: &str,
    headings: &[String],
    options: WatchOptions,
) -> Option<String> {
    let mut doc = MemoryDocument::new(url, doc_title);
    let body = doc.body();
    for text in headings {
        let h = doc.element(body, "h1");
        doc.text(h, text);
    }

    let sent: Vec<(RequestToken, Message)> = Vec::new();
    let mut watcher = Watcher::new(doc, sent, options, Instant::now());
    watcher.check_page();

    let pending = std::mem::take(watcher.channel_mut());
    for (token, Message::FetchFilmarks { title }) in pending {
        let result = resolve_score(fetcher, &title);
        watcher.on_reply(token, Ok(Some(result)));
    }

    let badge = watcher.state().badge?;
    watcher.doc().inner_html(badge).map(String::from)
}

fn print_result(result: &ScoreResult, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    match result {
        ScoreResult::Match(m) => {
            println!(
                "★ {}  {}  [{:?}]  {}",
                m.score,
                m.title,
                m.matched,
                m.url.as_deref().unwrap_or("-")
            );
        }
        ScoreResult::Failure(f) => {
            let status = f.status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
            println!("no score: {}{}", f.error, status);
        }
    }
    Ok(())
}
