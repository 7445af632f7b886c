mod render;
mod repl;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientSettings, HttpVachanamrutApi, SubmitOutcome, VachanamrutApi, Workspace};
use shared::protocol::VachanamrutQuery;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Ask questions about the Vachanamrut from the terminal")]
struct Args {
    /// Backend base url; overrides client.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file to read instead of ./client.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print raw JSON instead of formatted text (ask, read, health).
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation with citation lookup.
    Chat,
    /// Ask a single question with no prior history.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Print one passage in English and Gujarati.
    Read {
        #[arg(long)]
        chapter: String,
        #[arg(long, default_value = "")]
        section: String,
        #[arg(long)]
        number: u32,
    },
    /// Check that the backend is reachable.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings =
        ClientSettings::load_from(args.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url)?;
    }
    tracing::info!(api_url = %settings.api_url, "desktop: using backend");
    let api = HttpVachanamrutApi::new(&settings)?;

    match args.command {
        Command::Chat => {
            let mut workspace = Workspace::from_settings(&settings);
            repl::run(&api, &mut workspace).await?;
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            let mut workspace = Workspace::from_settings(&settings);
            let session = workspace.session_mut();
            let outcome = session.ask_with(&api, &question).await;
            if outcome == SubmitOutcome::Ignored {
                bail!("question must not be blank");
            }
            if let Some(turn) = session.turns().last() {
                if args.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "answer": turn.content(),
                            "citations": turn.citations(),
                        }))?
                    );
                } else {
                    println!("{}", render::turn(turn));
                }
            }
            if outcome == SubmitOutcome::Failed {
                bail!("the backend did not answer; see log output for details");
            }
        }
        Command::Read {
            chapter,
            section,
            number,
        } => {
            let query = VachanamrutQuery {
                chapter,
                section,
                number,
            };
            let record = api.fetch_vachanamrut(&query).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", render::document(&record));
            }
        }
        Command::Health => {
            let health = api.health().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("{} ({})", health.status, health.modules.join(", "));
            }
        }
    }

    Ok(())
}
