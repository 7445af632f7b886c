//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{run_ask, run_fetch, ClientSettings, HttpVachanamrutApi, VachanamrutApi};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api: Arc<dyn VachanamrutApi> = match HttpVachanamrutApi::new(&settings) {
            Ok(api) => Arc::new(api),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!("failed to build backend http client: {err}");
                return;
            }
        };

        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Connected to {}",
            settings.api_url
        )));
        runtime.block_on(serve_commands(api, cmd_rx, ui_tx));
    });
}

/// Runs every command on its own task so a slow lookup never delays a newer one.
pub async fn serve_commands(
    api: Arc<dyn VachanamrutApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let next = {
            let cmd_rx = cmd_rx.clone();
            tokio::task::spawn_blocking(move || cmd_rx.recv()).await
        };
        let Ok(Ok(cmd)) = next else {
            tracing::info!("backend: command queue closed, worker exiting");
            break;
        };

        tracing::debug!(command = cmd.name(), "backend: command received");
        let api = Arc::clone(&api);
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            let event = match cmd {
                BackendCommand::Ask(pending) => UiEvent::AskCompleted(run_ask(api.as_ref(), pending).await),
                BackendCommand::FetchVachanamrut(ticket) => {
                    UiEvent::DocumentFetched(run_fetch(api.as_ref(), ticket).await)
                }
                BackendCommand::CheckHealth => match api.health().await {
                    Ok(health) => UiEvent::Info(format!(
                        "Backend {} ({})",
                        health.status,
                        health.modules.join(", ")
                    )),
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::Health,
                        &err,
                    )),
                },
            };
            deliver(&ui_tx, event).await;
        });
    }
}

/// Hands `event` to the UI without blocking a runtime worker on a full queue.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!("backend: ui event queue closed, dropping result");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };

    tracing::debug!("backend: ui event queue full, waiting off the runtime");
    let ui_tx = ui_tx.clone();
    let sent = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
    if !matches!(sent, Ok(true)) {
        tracing::warn!("backend: ui event queue closed, dropping result");
    }
}
