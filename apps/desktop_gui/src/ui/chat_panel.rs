//! Chat transcript and composer.

use chrono::{DateTime, Local, Utc};
use client_core::{ChatTurn, SessionController};
use eframe::egui;
use shared::domain::{Citation, Role};

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(52, 73, 112);
const ASSISTANT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(48, 50, 56);

pub fn local_time_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Renders every turn; returns the citation the user clicked, if any.
pub fn show_transcript(ui: &mut egui::Ui, turns: &[ChatTurn], in_flight: bool) -> Option<Citation> {
    let mut clicked = None;
    egui::ScrollArea::vertical()
        .id_salt("chat_transcript")
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for (index, turn) in turns.iter().enumerate() {
                if let Some(citation) = show_turn(ui, index, turn) {
                    clicked = Some(citation);
                }
                ui.add_space(6.0);
            }
            if in_flight {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Consulting the Vachanamrut...");
                });
            }
        });
    clicked
}

fn show_turn(ui: &mut egui::Ui, index: usize, turn: &ChatTurn) -> Option<Citation> {
    let (fill, who) = match turn.role() {
        Role::User => (USER_BUBBLE, "You"),
        Role::Assistant => (ASSISTANT_BUBBLE, "Assistant"),
    };
    let mut clicked = None;

    egui::Frame::NONE
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(who);
                ui.weak(local_time_label(turn.created_at()));
            });
            ui.label(turn.content());

            if !turn.citations().is_empty() {
                ui.add_space(4.0);
                ui.horizontal_wrapped(|ui| {
                    ui.weak("Sources:");
                    for (slot, citation) in turn.citations().iter().enumerate() {
                        let button = egui::Button::new(citation.label()).small();
                        let response = ui.push_id((index, slot), |ui| ui.add(button)).inner;
                        let response = match &citation.excerpt {
                            Some(excerpt) => response.on_hover_text(excerpt),
                            None => response,
                        };
                        if response.clicked() {
                            clicked = Some(citation.clone());
                        }
                    }
                });
            }
        });
    clicked
}

pub fn composer_id() -> egui::Id {
    egui::Id::new("composer_text")
}

/// Composer row. Returns `true` when the user asked to send and the session
/// can take a new question.
///
/// Plain Enter never reaches the text buffer; Shift+Enter inserts a newline.
pub fn show_composer(ui: &mut egui::Ui, session: &mut SessionController) -> bool {
    let can_send = session.can_submit();
    let mut send = false;
    ui.horizontal(|ui| {
        let send_width = 80.0;
        let text_w = (ui.available_width() - send_width - 8.0).max(120.0);
        let response = ui.add_sized(
            [text_w, 36.0],
            egui::TextEdit::multiline(session.input_mut())
                .id(composer_id())
                .desired_rows(1)
                .return_key(egui::KeyboardShortcut::new(
                    egui::Modifiers::SHIFT,
                    egui::Key::Enter,
                ))
                .hint_text("Ask a spiritual question (Enter to send, Shift+Enter for newline)"),
        );

        let send_shortcut = response.has_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);
        let clicked_send = ui
            .add_enabled(can_send, egui::Button::new("Send").min_size([send_width, 36.0].into()))
            .clicked();

        if can_send && (send_shortcut || clicked_send) {
            send = true;
            response.request_focus();
        }
    });
    send
}
