//! Plain-text rendering of turns and passages for the terminal.

use std::fmt::Write as _;

use client_core::{ChatTurn, ReadingState};
use shared::domain::{DocumentRecord, Role};

pub fn turn(turn: &ChatTurn) -> String {
    let speaker = match turn.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{speaker}: {}", turn.content());
    if !turn.citations().is_empty() {
        out.push_str("\nReferences:");
        for (idx, citation) in turn.citations().iter().enumerate() {
            let _ = write!(out, "\n  [{}] {}", idx + 1, citation.label());
        }
        out.push_str("\n(type /open N to read a reference)");
    }
    out
}

pub fn document(record: &DocumentRecord) -> String {
    format!(
        "{}\n\n{}\n\n----\n\n{}\n\n{}",
        record.title_en, record.text_en, record.title_gu, record.text_gu
    )
}

pub fn reading(state: &ReadingState) -> Option<String> {
    match state {
        ReadingState::Hidden => None,
        ReadingState::Loading { citation, .. } => Some(format!("[{}] Loading...", citation.label())),
        ReadingState::Loaded {
            citation, document: record, ..
        } => Some(format!("[{}]\n{}", citation.label(), document(record))),
        ReadingState::Failed {
            citation, message, ..
        } => Some(format!("[{}] {message}", citation.label())),
    }
}
