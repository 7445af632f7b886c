//! Reading panel: the selected discourse in English and Gujarati.

use client_core::ReadingState;
use eframe::egui;
use shared::domain::DocumentRecord;

pub enum ReadingAction {
    None,
    Close,
}

pub fn show(ui: &mut egui::Ui, state: &ReadingState) -> ReadingAction {
    let mut action = ReadingAction::None;

    let heading = match state {
        ReadingState::Hidden => return action,
        ReadingState::Loading { citation, .. }
        | ReadingState::Loaded { citation, .. }
        | ReadingState::Failed { citation, .. } => citation.label(),
    };

    ui.horizontal(|ui| {
        ui.heading(heading);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Close").clicked() {
                action = ReadingAction::Close;
            }
        });
    });
    ui.separator();

    match state {
        ReadingState::Hidden => {}
        ReadingState::Loading { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading scripture...");
            });
        }
        ReadingState::Failed { message, .. } => {
            ui.colored_label(egui::Color32::from_rgb(220, 120, 120), message);
        }
        ReadingState::Loaded { document, .. } => {
            egui::ScrollArea::vertical()
                .id_salt("reading_document")
                .auto_shrink([false, false])
                .show(ui, |ui| show_document(ui, document));
        }
    }
    action
}

fn show_document(ui: &mut egui::Ui, document: &DocumentRecord) {
    show_language_block(ui, "English", &document.title_en, &document.text_en);
    ui.add_space(12.0);
    show_language_block(ui, "Gujarati", &document.title_gu, &document.text_gu);
}

fn show_language_block(ui: &mut egui::Ui, language: &str, title: &str, text: &str) {
    ui.horizontal(|ui| {
        ui.weak(language);
        if ui.small_button("Copy").clicked() {
            ui.ctx().copy_text(format!("{title}\n\n{text}"));
        }
    });
    ui.strong(title);
    ui.add_space(4.0);
    ui.label(text);
}
