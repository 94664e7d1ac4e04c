mod config;
mod render;

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{
    view::{history_list, HistoryDetailView, NO_SELECTION_MESSAGE},
    BulletApi, BulletOrchestrator, Confirmation, HistoryStore, HttpBulletApi,
};
use serde::Serialize;
use shared::domain::BulletRequest;
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, normalize_database_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "bullets", about = "Generate and review scored resume bullets", version)]
struct Cli {
    /// Base URL of the bullet service.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// SQLite database holding the history log.
    #[arg(long, global = true)]
    database_url: Option<String>,
    /// Emit JSON view-models instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request bullet suggestions and save them to history.
    Generate {
        /// What was accomplished.
        #[arg(long)]
        accomplished: String,
        /// How it was measured.
        #[arg(long)]
        measured: String,
        /// The task or project behind it.
        #[arg(long)]
        task: String,
        /// Keyword to work into the bullets.
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Review previous requests.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Check that the bullet service is up.
    Status,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved requests, newest first.
    List,
    /// Show the input and bullets of one saved request.
    Show { index: usize },
    /// Delete all saved requests.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.api_url.clone() {
        settings.api_base_url = url;
    }
    if let Some(url) = cli.database_url.clone() {
        settings.database_url = url;
    }
    info!(api = %settings.api_base_url, database = %settings.database_url, "settings resolved");

    let api = HttpBulletApi::with_timeout(
        &settings.api_base_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;

    match cli.command {
        Command::Status => {
            let health = api.health().await?;
            if cli.json {
                print_json(&health)?;
            } else {
                println!(
                    "{}: {}",
                    health.service.as_deref().unwrap_or(api.base_url()),
                    health.status
                );
            }
        }
        Command::Generate {
            accomplished,
            measured,
            task,
            keyword,
        } => {
            let mut orchestrator = open_orchestrator(api, &settings).await?;
            let request = BulletRequest::new(accomplished, measured, task).with_keyword(keyword);
            let view = orchestrator.submit_for_display(request).await;
            emit(cli.json, &view, render::submit_lines(&view))?;
            if view.is_error() {
                bail!("bullet generation failed");
            }
        }
        Command::History(command) => {
            let mut orchestrator = open_orchestrator(api, &settings).await?;
            run_history(command, &mut orchestrator, cli.json).await?;
        }
    }

    Ok(())
}

async fn open_orchestrator(
    api: HttpBulletApi,
    settings: &Settings,
) -> Result<BulletOrchestrator<HttpBulletApi>> {
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await?;
    let history = HistoryStore::with_key(Arc::new(storage), settings.history_key.clone());
    let orchestrator = BulletOrchestrator::open(api, history).await?;
    Ok(orchestrator)
}

async fn run_history(
    command: HistoryCommand,
    orchestrator: &mut BulletOrchestrator<HttpBulletApi>,
    as_json: bool,
) -> Result<()> {
    match command {
        HistoryCommand::List => {
            let rows = history_list(orchestrator.log(), &Local);
            emit(as_json, &rows, render::history_list_lines(&rows))?;
        }
        HistoryCommand::Show { index } => match orchestrator.log_mut().select(index) {
            Some(entry) => {
                let detail = HistoryDetailView::from_entry(entry);
                emit(as_json, &detail, render::history_detail_lines(&detail))?;
            }
            None if as_json => print_json(&Option::<HistoryDetailView>::None)?,
            None => println!("{NO_SELECTION_MESSAGE}"),
        },
        HistoryCommand::Clear { yes } => {
            let history = orchestrator.history().clone();
            let cleared = if yes {
                history.clear_unconfirmed(orchestrator.log_mut()).await?;
                true
            } else {
                history
                    .clear(orchestrator.log_mut(), &StdinConfirmation)
                    .await?
            };
            println!("{}", if cleared { "History cleared." } else { "Kept history." });
        }
    }
    Ok(())
}

fn emit<T: Serialize>(as_json: bool, value: &T, lines: Vec<String>) -> Result<()> {
    if as_json {
        print_json(value)
    } else {
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
