use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ActivityBoard, DocumentView, HttpActivityApi, MutationOutcome, RefreshOutcome,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, DEFAULT_CONFIG_FILE};
use render::{render_document, render_status, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "activities", about = "Browse activities and manage participant sign-ups")]
struct Args {
    /// Overrides the configured API base url.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and print the activity board.
    List,
    /// Register a participant through the activity's registration form.
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Remove a participant through its removal control.
    Unregister {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn print_page(view: &DocumentView, format: OutputFormat) {
    if let Some(line) = render_status(&view.status().await) {
        println!("{line}");
    }
    print!("{}", render_document(&view.snapshot().await, format));
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    init_tracing(&settings.log_filter);

    let api = HttpActivityApi::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    let view = Arc::new(DocumentView::new());
    let board = ActivityBoard::new(Arc::new(api), view.clone());

    info!("activities: loading board from {}", settings.server_url);
    let succeeded = run(args.command, &board, &view).await;

    print_page(&view, args.format).await;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the board, then performs `command` through the page's controls.
/// Returns whether the command as a whole succeeded.
async fn run(command: Command, board: &ActivityBoard, view: &DocumentView) -> bool {
    let loaded = board.refresh().await;
    match command {
        Command::List => matches!(loaded, RefreshOutcome::Rendered { .. }),
        Command::Signup { activity, email } => {
            if !view.type_email(&activity, &email).await {
                eprintln!("no registration form for activity '{activity}'");
                return false;
            }
            let Some(event) = view.submit_registration(&activity).await else {
                return false;
            };
            board.dispatch(event).await == MutationOutcome::Succeeded
        }
        Command::Unregister { activity, email } => {
            let Some(event) = view.click_remove(&activity, &email).await else {
                eprintln!("'{email}' is not listed under activity '{activity}'");
                return false;
            };
            board.dispatch(event).await == MutationOutcome::Succeeded
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
