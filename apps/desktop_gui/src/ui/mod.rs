//! UI layer for desktop GUI: app shell plus the chat and reading panels.

pub mod app;
pub mod chat_panel;
pub mod fonts;
pub mod reading_panel;

pub use app::VachanamrutApp;
