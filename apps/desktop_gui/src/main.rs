mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::ClientSettings;
use controller::events::UiEvent;
use controller::orchestration::dispatch_backend_command;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::VachanamrutApp;

#[derive(Parser, Debug)]
#[command(about = "Vachanamrut assistant desktop window")]
struct Args {
    /// Backend base url; overrides client.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file to read instead of ./client.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Font file with Gujarati glyphs; falls back to common system locations.
    #[arg(long)]
    gujarati_font: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let gujarati_font = args
        .gujarati_font
        .clone()
        .or_else(|| std::env::var_os(ui::fonts::GUJARATI_FONT_ENV).map(PathBuf::from));

    let mut settings =
        ClientSettings::load_from(args.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url)?;
    }
    tracing::info!(api_url = %settings.api_url, "desktop_gui: using backend");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());
    if let Err((_, reason)) = dispatch_backend_command(&cmd_tx, BackendCommand::CheckHealth) {
        tracing::warn!("desktop_gui: initial health check not queued: {reason}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vachanamrut Assistant")
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Vachanamrut Assistant",
        options,
        Box::new(move |cc| {
            ui::fonts::install_gujarati_font(&cc.egui_ctx, gujarati_font.as_deref());
            Ok(Box::new(VachanamrutApp::new(cmd_tx, ui_rx, &settings)))
        }),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
