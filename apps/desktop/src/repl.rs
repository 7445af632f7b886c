//! Interactive chat loop driving a [`Workspace`].

use anyhow::Result;
use client_core::{VachanamrutApi, Workspace};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Ask(String),
    Open(usize),
    Close,
    History,
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Option<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Some(Input::Ask(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let mut parts = command.split_whitespace();
    let input = match (parts.next(), parts.next()) {
        (Some("open"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Open(n),
            _ => Input::Unknown(trimmed.to_string()),
        },
        (Some("close"), None) => Input::Close,
        (Some("history"), None) => Input::History,
        (Some("help"), None) => Input::Help,
        (Some("quit" | "exit"), None) => Input::Quit,
        _ => Input::Unknown(trimmed.to_string()),
    };
    Some(input)
}

const HELP: &str = "Type a question, or: /open N  /close  /history  /help  /quit";

pub async fn run(api: &dyn VachanamrutApi, workspace: &mut Workspace) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    for turn in workspace.session().turns() {
        stdout.write_all(format!("{}\n", render::turn(turn)).as_bytes()).await?;
    }
    stdout.write_all(format!("{HELP}\n").as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_line(&line) {
            None => continue,
            Some(Input::Quit) => break,
            Some(Input::Help) => HELP.to_string(),
            Some(Input::Unknown(text)) => format!("unknown command: {text}\n{HELP}"),
            Some(Input::History) => workspace
                .session()
                .turns()
                .iter()
                .map(render::turn)
                .collect::<Vec<_>>()
                .join("\n"),
            Some(Input::Close) => {
                workspace.on_close();
                "reading panel closed".to_string()
            }
            Some(Input::Open(n)) => {
                let citation = workspace.session().latest_citations().get(n - 1).cloned();
                match citation {
                    Some(citation) => {
                        workspace.open_citation_with(api, citation).await;
                        render::reading(workspace.reading().state()).unwrap_or_default()
                    }
                    None => format!("no reference [{n}] in the latest answer"),
                }
            }
            Some(Input::Ask(question)) => {
                stdout.write_all(b"Thinking...\n").await?;
                stdout.flush().await?;
                let session = workspace.session_mut();
                session.ask_with(api, &question).await;
                session
                    .turns()
                    .last()
                    .map(render::turn)
                    .unwrap_or_default()
            }
        };
        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}
