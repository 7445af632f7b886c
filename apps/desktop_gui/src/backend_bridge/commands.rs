//! Backend commands queued from UI to backend worker.

use client_core::{FetchTicket, PendingAsk};

#[derive(Debug)]
pub enum BackendCommand {
    Ask(PendingAsk),
    FetchVachanamrut(FetchTicket),
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Ask(_) => "ask",
            BackendCommand::FetchVachanamrut(_) => "fetch_vachanamrut",
            BackendCommand::CheckHealth => "check_health",
        }
    }
}
