use std::time::Duration;

use client_core::{ClientError, ClientSettings, FetchResult, PanelLayout, Workspace};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Citation;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::{chat_panel, reading_panel};

pub struct VachanamrutApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    workspace: Workspace,
    api_url: String,
    status: String,
    status_banner: Option<UiError>,
}

impl VachanamrutApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            workspace: Workspace::from_settings(settings),
            api_url: settings.api_url.clone(),
            status: "Starting backend worker".to_string(),
            status_banner: None,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.status = format!("{}: {}", err_label(err.category()), err.message());
                    self.status_banner = Some(err);
                }
                UiEvent::AskCompleted(result) => {
                    if self.workspace.session_mut().apply(result) {
                        self.status = "Answer received".to_string();
                    }
                }
                UiEvent::DocumentFetched(result) => {
                    if !self.workspace.apply_document(result) {
                        tracing::debug!("gui: discarded superseded document");
                    }
                }
            }
        }
    }

    fn try_submit_composer(&mut self) {
        let Some(pending) = self.workspace.session_mut().submit() else {
            return;
        };
        if let Err((cmd, reason)) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Ask(pending))
        {
            self.report_dispatch_failure(&reason);
            if let BackendCommand::Ask(pending) = cmd {
                self.workspace
                    .session_mut()
                    .complete(pending.id, Err(ClientError::Unavailable(reason)));
            }
        } else {
            self.status = "Waiting for answer".to_string();
        }
    }

    fn open_citation(&mut self, citation: Citation) {
        let ticket = self.workspace.on_citation_click(citation);
        if let Err((cmd, reason)) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchVachanamrut(ticket))
        {
            self.report_dispatch_failure(&reason);
            if let BackendCommand::FetchVachanamrut(ticket) = cmd {
                self.workspace.apply_document(FetchResult {
                    generation: ticket.generation,
                    outcome: Err(ClientError::Unavailable(reason)),
                });
            }
        }
    }

    fn check_health(&mut self) {
        if let Err((_, reason)) = dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckHealth)
        {
            self.report_dispatch_failure(&reason);
        }
    }

    fn report_dispatch_failure(&mut self, reason: &str) {
        let err = UiError::from_message(UiErrorContext::Dispatch, reason);
        self.status = format!("{}: {}", err_label(err.category()), err.message());
        self.status_banner = Some(err);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} ({}): {}",
                            err_label(banner.category()),
                            banner.context().label(),
                            banner.message()
                        ))
                        .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Vachanamrut Assistant");
                ui.weak(&self.api_url);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Check backend").clicked() {
                        self.check_health();
                    }
                });
            });
            self.show_status_banner(ui);
        });
        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.weak(&self.status);
        });
    }

    fn show_reading_panel(&mut self, ctx: &egui::Context) {
        if self.workspace.layout() != PanelLayout::Split {
            return;
        }
        let total = ctx.available_rect().width();
        let width = total * (1.0 - PanelLayout::Split.chat_width_fraction());
        let mut close = false;
        egui::SidePanel::right("reading_panel")
            .exact_width(width)
            .resizable(false)
            .show(ctx, |ui| {
                if let reading_panel::ReadingAction::Close =
                    reading_panel::show(ui, self.workspace.reading().state())
                {
                    close = true;
                }
            });
        if close {
            self.workspace.on_close();
        }
    }

    fn show_chat_panel(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        let mut send = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            let in_flight = self.workspace.session().is_in_flight();
            egui::TopBottomPanel::bottom("composer")
                .show_inside(ui, |ui| {
                    ui.add_space(6.0);
                    send = chat_panel::show_composer(ui, self.workspace.session_mut());
                });
            clicked = chat_panel::show_transcript(ui, self.workspace.session().turns(), in_flight);
        });

        if send {
            self.try_submit_composer();
        }
        if let Some(citation) = clicked {
            self.open_citation(citation);
        }
    }
}

impl eframe::App for VachanamrutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_reading_panel(ctx);
        self.show_chat_panel(ctx);

        let waiting =
            self.workspace.session().is_in_flight() || self.workspace.reading().is_loading();
        if waiting {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{AskResult, FetchGeneration, ReadingState, LOOKUP_FAILURE_MESSAGE};
    use crossbeam_channel::bounded;
    use shared::{domain::DocumentRecord, protocol::AskResponse};

    use super::*;

    fn app(capacity: usize) -> (VachanamrutApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(capacity);
        let (ui_tx, ui_rx) = bounded(16);
        let app = VachanamrutApp::new(cmd_tx, ui_rx, &ClientSettings::default());
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn submit_queues_ask_and_answer_releases_session() {
        let (mut app, cmd_rx, ui_tx) = app(4);
        app.workspace.session_mut().set_input("What is dharma?");
        app.try_submit_composer();
        assert!(app.workspace().session().is_in_flight());

        let Ok(BackendCommand::Ask(pending)) = cmd_rx.try_recv() else {
            panic!("expected queued ask");
        };
        assert_eq!(pending.request.question, "What is dharma?");

        ui_tx
            .send(UiEvent::AskCompleted(AskResult {
                id: pending.id,
                outcome: Ok(AskResponse {
                    answer: "Dharma is conduct.".to_string(),
                    citations: Vec::new(),
                }),
            }))
            .expect("send event");
        app.process_ui_events();

        assert!(!app.workspace().session().is_in_flight());
        let last = app.workspace().session().turns().last().expect("turn");
        assert_eq!(last.content(), "Dharma is conduct.");
    }

    #[test]
    fn dead_worker_turns_ask_into_error_turn() {
        let (mut app, cmd_rx, _ui_tx) = app(4);
        drop(cmd_rx);
        app.workspace.session_mut().set_input("Anyone there?");
        app.try_submit_composer();

        assert!(!app.workspace().session().is_in_flight());
        let last = app.workspace().session().turns().last().expect("turn");
        assert_eq!(last.content(), client_core::ASK_FAILURE_MESSAGE);
        assert!(app.status_banner.is_some());
    }

    #[test]
    fn citation_click_opens_split_layout_and_ignores_stale_document() {
        let (mut app, cmd_rx, ui_tx) = app(4);
        app.open_citation(Citation::new("Gadhada", "I", 1));
        app.open_citation(Citation::new("Gadhada", "I", 2));
        assert_eq!(app.workspace().layout(), PanelLayout::Split);

        let mut generations = Vec::new();
        while let Ok(BackendCommand::FetchVachanamrut(ticket)) = cmd_rx.try_recv() {
            generations.push(ticket.generation);
        }
        assert_eq!(generations.len(), 2);

        let document = DocumentRecord {
            title_en: "Gadhada I-1".to_string(),
            text_en: "text".to_string(),
            title_gu: String::new(),
            text_gu: String::new(),
        };
        ui_tx
            .send(UiEvent::DocumentFetched(FetchResult {
                generation: generations[0],
                outcome: Ok(document),
            }))
            .expect("send event");
        app.process_ui_events();
        assert!(app.workspace().reading().is_loading());
    }

    #[test]
    fn full_queue_fails_lookup_instead_of_spinning() {
        let (mut app, _cmd_rx, _ui_tx) = app(1);
        app.check_health();
        app.open_citation(Citation::new("Sarangpur", "", 3));

        match app.workspace().reading().state() {
            ReadingState::Failed { message, generation, .. } => {
                assert_eq!(message, LOOKUP_FAILURE_MESSAGE);
                assert_eq!(*generation, FetchGeneration(1));
            }
            other => panic!("expected failed state, got {other:?}"),
        }
    }

    #[test]
    fn close_hides_reading_panel() {
        let (mut app, _cmd_rx, _ui_tx) = app(4);
        app.open_citation(Citation::new("Loya", "", 7));
        app.workspace.on_close();
        assert_eq!(app.workspace().layout(), PanelLayout::ChatOnly);
    }
}
