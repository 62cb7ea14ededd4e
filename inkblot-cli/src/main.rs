//! InkBlot headless front end
//!
//! Renders and exports markdown documents and manages the trial license
//! without the desktop shell.
//!
//! Usage:
//!   inkblot render notes.md --out notes.html
//!   inkblot export notes.md notes.pdf
//!   inkblot license status

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkblot_cli::{resolve_state_dir, App, AppConfig};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "inkblot")]
#[command(about = "InkBlot markdown editor, headless")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for persisted trial state
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a markdown file to HTML
    Render {
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Export a markdown file to PDF
    Export { file: PathBuf, out: PathBuf },
    /// List the markdown files under a folder
    Tree { dir: PathBuf },
    /// Trial and purchase state
    License {
        #[command(subcommand)]
        action: LicenseAction,
    },
    /// Run the license gate until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
enum LicenseAction {
    Status,
    Purchase,
    Restore,
}

fn init_logging(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .compact()
            .init();
        return;
    }
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = AppConfig::load(args.config.as_deref())?;
    let state_dir = resolve_state_dir(args.state_dir.as_deref())?;
    let app = App::open(config, &state_dir)?;

    match args.command {
        Command::Render { file, out } => {
            let html = app.render(&file).await?;
            match out {
                Some(out) => {
                    tokio::fs::write(&out, html)
                        .await
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    info!("Wrote {}", out.display());
                }
                None => println!("{html}"),
            }
        }
        Command::Export { file, out } => {
            let written = app.export(&file, &out).await?;
            info!("Exported {}", written.display());
        }
        Command::Tree { dir } => {
            for row in app.tree(&dir)? {
                println!("{}{} {}", "  ".repeat(row.depth), row.icon, row.name);
            }
        }
        Command::License { action } => match action {
            LicenseAction::Status => print_json(&app.status()?)?,
            LicenseAction::Purchase => print_json(&app.purchase().await)?,
            LicenseAction::Restore => print_json(&app.restore().await)?,
        },
        Command::Watch => watch(&app).await?,
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn watch(app: &App) -> Result<()> {
    let mut state = app.gate().subscribe();
    let (_events, handle) = app.watch();
    info!("License state: {:?}", *state.borrow_and_update());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    warn!("License gate closed");
                    break;
                }
                let current = *state.borrow_and_update();
                info!("License state: {:?}", current);
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
