//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker.
///
/// On failure the command is handed back with a user-facing reason so the
/// caller can resolve whatever state was waiting on it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), (BackendCommand, String)> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err((cmd, "UI command queue is full; please retry".to_string()))
        }
        Err(TrySendError::Disconnected(cmd)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err((
                cmd,
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string(),
            ))
        }
    }
}
